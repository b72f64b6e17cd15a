//! Session states
//!
//! Every session walks the same path and ends in `ClosingSession`, from
//! which the server returns to waiting for the next control connection.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    WaitingForControlConnection,
    ParsingCommand,
    NegotiatingDataPort,
    EstablishingDataChannel,
    Transferring,
    ClosingSession,
}

impl SessionState {
    /// Whether moving from `self` to `next` is a legal step.
    ///
    /// Any state may jump to `ClosingSession` when the session fails.
    pub fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (WaitingForControlConnection, ParsingCommand)
                | (ParsingCommand, NegotiatingDataPort)
                | (NegotiatingDataPort, EstablishingDataChannel)
                | (EstablishingDataChannel, Transferring)
                | (ClosingSession, WaitingForControlConnection)
                | (_, ClosingSession)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::WaitingForControlConnection => "waiting for control connection",
            SessionState::ParsingCommand => "parsing command",
            SessionState::NegotiatingDataPort => "negotiating data port",
            SessionState::EstablishingDataChannel => "establishing data channel",
            SessionState::Transferring => "transferring",
            SessionState::ClosingSession => "closing session",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState::*;

    #[test]
    fn happy_path_is_linear() {
        let path = [
            WaitingForControlConnection,
            ParsingCommand,
            NegotiatingDataPort,
            EstablishingDataChannel,
            Transferring,
            ClosingSession,
            WaitingForControlConnection,
        ];
        for step in path.windows(2) {
            assert!(step[0].can_advance_to(step[1]), "{} -> {}", step[0], step[1]);
        }
    }

    #[test]
    fn steps_cannot_be_skipped() {
        assert!(!ParsingCommand.can_advance_to(Transferring));
        assert!(!WaitingForControlConnection.can_advance_to(NegotiatingDataPort));
        assert!(!Transferring.can_advance_to(WaitingForControlConnection));
    }

    #[test]
    fn failure_closes_from_anywhere() {
        for state in [ParsingCommand, NegotiatingDataPort, EstablishingDataChannel, Transferring] {
            assert!(state.can_advance_to(ClosingSession));
        }
    }
}

//! Error handlers
//!
//! Maps session errors onto log output and the reply, if any, that the
//! client is owed on its control connection.

use log::{error, warn};
use std::net::SocketAddr;

use crate::error::types::{FtpServerError, ProtocolError, StorageError};
use crate::protocol::responses;

/// Log a failed session at a level matching its cause.
///
/// Protocol and lookup failures are the client's doing and only warrant a
/// warning; everything else points at the server side.
pub fn handle_error(peer: &SocketAddr, err: &FtpServerError) {
    match err {
        FtpServerError::Protocol(_) | FtpServerError::Storage(_) => {
            warn!("Session with {} aborted: {}", peer, err)
        }
        _ => error!("Session with {} failed: {}", peer, err),
    }
}

/// Reply to send on the control connection before closing it.
pub fn error_reply(err: &FtpServerError) -> Option<&'static [u8]> {
    match err {
        FtpServerError::Protocol(ProtocolError::InvalidCommand(_)) => {
            Some(responses::INVALID_COMMAND)
        }
        FtpServerError::Storage(StorageError::FileNotFound(_))
        | FtpServerError::Storage(StorageError::PathTraversal(_)) => {
            Some(responses::FILE_NOT_FOUND)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;

    #[test]
    fn invalid_command_gets_usage_reply() {
        let err = FtpServerError::from(ProtocolError::InvalidCommand("-x".into()));
        assert_eq!(error_reply(&err), Some(responses::INVALID_COMMAND));
    }

    #[test]
    fn missing_and_escaping_files_read_as_not_found() {
        let missing = FtpServerError::from(StorageError::FileNotFound("a.txt".into()));
        let escaping = FtpServerError::from(StorageError::PathTraversal("../a.txt".into()));
        assert_eq!(error_reply(&missing), Some(responses::FILE_NOT_FOUND));
        assert_eq!(error_reply(&escaping), Some(responses::FILE_NOT_FOUND));
    }

    #[test]
    fn transfer_failures_close_silently() {
        let err = FtpServerError::from(TransferError::AcceptFailed(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "timed out",
        )));
        assert_eq!(error_reply(&err), None);

        let err = FtpServerError::from(ProtocolError::InvalidDataPort("abc".into()));
        assert_eq!(error_reply(&err), None);
    }
}

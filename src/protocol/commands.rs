//! Module `commands`
//!
//! Parses the first message of a control connection into a request.

use crate::protocol::responses::{GET_TAG, LIST_TAG, MAX_FILENAME_LENGTH, MESSAGE_LENGTH};

/// Command carried by a control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Get(String), // Retrieve a file from the served directory
    Invalid,
}

/// A parsed control message together with the bytes it came from.
#[derive(Debug, Clone)]
pub struct ControlRequest {
    command: Command,
    raw: Vec<u8>,
}

impl ControlRequest {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The first two bytes of the message, for logging rejected commands.
    pub fn tag(&self) -> String {
        let end = self.raw.len().min(2);
        String::from_utf8_lossy(&self.raw[..end]).into_owned()
    }
}

/// Parses a raw control message received from a client.
///
/// The tag occupies the first two bytes. For `-g` the remainder is the
/// filename, cut at the first NUL (senders pad with them), stripped of a
/// trailing line ending and truncated to [`MAX_FILENAME_LENGTH`]. A `-g`
/// without a filename is invalid.
pub fn parse_control_request(raw: &[u8]) -> ControlRequest {
    let raw = &raw[..raw.len().min(MESSAGE_LENGTH)];

    let command = match raw.get(..2) {
        Some(tag) if tag == LIST_TAG => Command::List,
        Some(tag) if tag == GET_TAG => {
            parse_filename(&raw[2..]).map_or(Command::Invalid, Command::Get)
        }
        _ => Command::Invalid,
    };

    ControlRequest {
        command,
        raw: raw.to_vec(),
    }
}

fn parse_filename(rest: &[u8]) -> Option<String> {
    let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
    let mut name = &rest[..end.min(MAX_FILENAME_LENGTH)];

    while let [head @ .., b'\r' | b'\n'] = name {
        name = head;
    }

    if name.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(name).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_ignores_trailing_bytes() {
        assert_eq!(parse_control_request(b"-l").command(), &Command::List);
        assert_eq!(parse_control_request(b"-lwhatever").command(), &Command::List);
    }

    #[test]
    fn get_takes_rest_of_message_as_filename() {
        let request = parse_control_request(b"-gnotes.txt");
        assert_eq!(request.command(), &Command::Get("notes.txt".into()));
        assert_eq!(request.raw(), b"-gnotes.txt");
    }

    #[test]
    fn get_filename_stops_at_nul_padding() {
        let mut message = b"-greport.txt".to_vec();
        message.resize(MESSAGE_LENGTH, 0);
        assert_eq!(
            parse_control_request(&message).command(),
            &Command::Get("report.txt".into())
        );
    }

    #[test]
    fn get_filename_drops_line_ending() {
        assert_eq!(
            parse_control_request(b"-ga.txt\r\n").command(),
            &Command::Get("a.txt".into())
        );
    }

    #[test]
    fn get_without_filename_is_invalid() {
        assert_eq!(parse_control_request(b"-g").command(), &Command::Invalid);
        assert_eq!(parse_control_request(b"-g\0\0\0").command(), &Command::Invalid);
        assert_eq!(parse_control_request(b"-g\n").command(), &Command::Invalid);
    }

    #[test]
    fn long_filenames_are_truncated() {
        let mut message = b"-g".to_vec();
        message.extend(std::iter::repeat(b'x').take(MESSAGE_LENGTH));
        let request = parse_control_request(&message);

        assert_eq!(request.raw().len(), MESSAGE_LENGTH);
        match request.command() {
            Command::Get(name) => assert_eq!(name.len(), MAX_FILENAME_LENGTH),
            other => panic!("expected Get, got {:?}", other),
        }
    }

    #[test]
    fn unknown_tags_are_invalid() {
        let messages: [&[u8]; 6] = [b"", b"-", b"-x", b"ls", b"-Lfile", b"g-file"];
        for message in messages {
            assert_eq!(parse_control_request(message).command(), &Command::Invalid);
        }
        assert_eq!(parse_control_request(b"-xyz").tag(), "-x");
    }
}

//! Control connection messages
//!
//! Literal byte strings exchanged on the control connection. None of them
//! carries a terminator; the reader relies on message size or on the
//! connection closing.

/// Largest command message the server reads
pub const MESSAGE_LENGTH: usize = 500;

/// Longest filename kept from a `-g` command
pub const MAX_FILENAME_LENGTH: usize = 497;

/// Longest data port announcement the server reads
pub const PORT_ANNOUNCEMENT_LENGTH: usize = 6;

/// Command tags
pub const LIST_TAG: &[u8] = b"-l";
pub const GET_TAG: &[u8] = b"-g";

/// Acknowledgment of a command, and of an existing file
pub const OK: &[u8] = b"OK";

pub const INVALID_COMMAND: &[u8] = b"Invalid Command, Usage: -l || -g <FILENAME>";
pub const FILE_NOT_FOUND: &[u8] = b"File not found";

/// Readiness signal a v2 client writes on the data connection
pub const READY: &[u8] = b"READY";

/// Terminates control messages under protocol v2
pub const V2_DELIMITER: u8 = b'\n';

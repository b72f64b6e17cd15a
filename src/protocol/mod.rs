//! Wire protocol
//!
//! Handles control message parsing, reply literals and data connection
//! framing.

pub mod commands;
pub mod framing;
pub mod parser;
pub mod responses;
pub mod version;

pub use commands::{Command, ControlRequest, parse_control_request};
pub use parser::parse_data_port;
pub use version::ProtocolVersion;

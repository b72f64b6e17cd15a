//! Protocol versions
//!
//! `v1` is the plain wire format. `v2` must be enabled on both ends. In v2
//! the client signals `READY` instead of the server sleeping before it
//! writes, and file payloads carry a length prefix rather than a sentinel.
//! Client messages on the control connection end with `\n`.

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    #[default]
    V1,
    V2,
}

impl ProtocolVersion {
    /// Whether control messages end with a delimiter rather than a single read.
    pub fn is_delimited(self) -> bool {
        matches!(self, ProtocolVersion::V2)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V1 => write!(f, "v1"),
            ProtocolVersion::V2 => write!(f, "v2"),
        }
    }
}

//! Transfer result types
//!
//! Defines what a completed session delivered.

use std::fmt;

/// Payload delivered over a data connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferSummary {
    Listing { entries: usize },
    File { name: String, bytes: u64 },
}

impl fmt::Display for TransferSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferSummary::Listing { entries } => write!(f, "listing of {} entries", entries),
            TransferSummary::File { name, bytes } => write!(f, "file '{}' ({} bytes)", name, bytes),
        }
    }
}

//! Transfer module
//!
//! Handles data channel setup and the two payloads a session can deliver.

pub mod data_channel;
pub mod file_ops;
pub mod listing;
pub mod results;

// Re-export key types and functions
pub use data_channel::{await_client_ready, establish_data_channel};
pub use file_ops::send_file;
pub use listing::send_directory;
pub use results::TransferSummary;

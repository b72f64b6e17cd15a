//! Protocol client
//!
//! Requests listings and files from a running server.

pub mod connection;

pub use connection::FtClient;

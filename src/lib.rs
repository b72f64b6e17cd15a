//! Two-connection file transfer server
//!
//! A client asks on a control connection for a directory listing (`-l`) or
//! a file (`-g<name>`), announces a port, and receives the payload on a
//! separate data connection the server accepts on that port.

pub mod cli;
pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use client::FtClient;
pub use server::{Server, ServerConfig};

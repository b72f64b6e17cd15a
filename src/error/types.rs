//! Error types
//!
//! Defines domain-specific error types for each stage of a session.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid control port {0}: must be between 1024 and 65535")]
    InvalidControlPort(u16),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("server_root cannot be empty")]
    EmptyServerRoot,

    #[error("chunk_size must be greater than 0")]
    ZeroChunkSize,

    #[error("listen_backlog must be greater than 0")]
    ZeroBacklog,

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Control connection errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid command tag {0:?}")]
    InvalidCommand(String),

    #[error("Connection closed before the {0} was received")]
    ConnectionClosed(&'static str),

    #[error("The {0} exceeds {1} bytes without a line ending")]
    MessageTooLong(&'static str, usize),

    #[error("Malformed data port announcement {0:?}")]
    InvalidDataPort(String),

    #[error("Data port {port} is below the minimum of {min}")]
    DataPortOutOfRange { port: u16, min: u16 },

    #[error("Malformed listing stream: {0}")]
    MalformedListing(String),

    #[error("Control connection I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Data channel and payload transfer errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to bind data listener on {0}: {1}")]
    PortBindingFailed(SocketAddr, io::Error),

    #[error("Failed to accept data connection: {0}")]
    AcceptFailed(io::Error),

    #[error("Client never signalled readiness: {0}")]
    NotReady(String),

    #[error("Failed to open {0}: {1}")]
    OpenFailed(PathBuf, io::Error),

    #[error("Failed to read {0}: {1}")]
    ReadFailed(PathBuf, io::Error),

    #[error("{path} changed during transfer: announced {expected} bytes, sent {sent}")]
    LengthMismatch {
        path: PathBuf,
        expected: u64,
        sent: u64,
    },

    #[error("Failed to write to data connection: {0}")]
    WriteFailed(io::Error),
}

/// Served-directory lookups
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Errors surfaced by the protocol client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to {0}: {1}")]
    ConnectFailed(String, io::Error),

    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("File not found on server: {0}")]
    FileNotFound(String),

    #[error("Transfer ended before its completion marker")]
    IncompleteTransfer,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// General server error that encompasses all session error types
#[derive(Debug, Error)]
pub enum FtpServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(#[from] io::Error),
}

//! Server core functionality
//!
//! This module contains the control listener, the session loop and the
//! configuration it runs with.

pub mod config;
pub mod core;

pub use config::ServerConfig;
pub use core::Server;

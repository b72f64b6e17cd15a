//! Utility functions
//!
//! Provides logging setup and socket helpers.

pub mod logging;
pub mod network;

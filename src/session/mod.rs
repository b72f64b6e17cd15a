//! Client sessions
//!
//! Handles one client's control exchange, data channel and teardown.

pub mod control;
pub mod handler;
pub mod state;

pub use handler::Session;
pub use state::SessionState;

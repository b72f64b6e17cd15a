//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::{Builder, Env};
use std::io::Write;

/// Setup logging for the binaries.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn setup_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .init();
}

//! Served directory access
//!
//! Handles directory enumeration, existence checks and path resolution.

pub mod filesystem;
pub mod validation;

pub use filesystem::{DirectoryListing, path_exists};
pub use validation::resolve_file_path;

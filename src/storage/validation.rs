//! Path validation
//!
//! Maps requested filenames onto paths under the served root.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Resolve a requested filename against the served root.
///
/// Unconfined, the name is simply joined to the root, so `..` components and
/// absolute names reach whatever the process may read. Confined, the path is
/// canonicalized and must stay under the canonical root; a name that does not
/// resolve at all is reported as not found.
pub fn resolve_file_path(root: &Path, filename: &str, confine: bool) -> Result<PathBuf, StorageError> {
    let path = root.join(filename);
    if !confine {
        return Ok(path);
    }

    let root = root.canonicalize()?;
    let resolved = path
        .canonicalize()
        .map_err(|_| StorageError::FileNotFound(filename.to_string()))?;

    if !resolved.starts_with(&root) {
        return Err(StorageError::PathTraversal(filename.to_string()));
    }
    Ok(resolved)
}

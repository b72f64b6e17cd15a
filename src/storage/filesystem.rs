//! File system operations
//!
//! Read-only access to the served directory.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use tokio::fs::{self, ReadDir};

/// Lazily enumerated entry names of one directory.
///
/// Yields `.` and `..` first, then whatever the directory holds in the order
/// the operating system returns it. Nothing is sorted or buffered.
pub struct DirectoryListing {
    dot_entries: std::array::IntoIter<&'static str, 2>,
    entries: ReadDir,
}

impl DirectoryListing {
    pub async fn open(dir: &Path) -> io::Result<Self> {
        Ok(Self {
            dot_entries: [".", ".."].into_iter(),
            entries: fs::read_dir(dir).await?,
        })
    }

    /// Next entry name, or `None` once the directory is exhausted.
    pub async fn next_name(&mut self) -> io::Result<Option<OsString>> {
        if let Some(dot) = self.dot_entries.next() {
            return Ok(Some(OsString::from(dot)));
        }
        Ok(self.entries.next_entry().await?.map(|entry| entry.file_name()))
    }
}

/// Check if a path exists, whatever its type
pub async fn path_exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

//! Module `listing`
//!
//! Streams the served directory as fixed-width name records.

use log::{info, warn};
use std::path::Path;
use tokio::io::AsyncWrite;

use crate::error::TransferError;
use crate::protocol::framing::{LISTING_SENTINEL, encode_listing_record};
use crate::server::ServerConfig;
use crate::storage::DirectoryListing;
use crate::utils::network::send;

/// Writes one record per entry of `dir`, then the listing sentinel.
///
/// Records are written as entries are enumerated. A directory that cannot be
/// opened, or that fails part way through, ends the listing early but the
/// sentinel is always sent. A failed write aborts the transfer.
///
/// Returns the number of records written.
pub async fn send_directory<S>(
    stream: &mut S,
    dir: &Path,
    config: &ServerConfig,
) -> Result<usize, TransferError>
where
    S: AsyncWrite + Unpin,
{
    let timeout = config.io_timeout();
    let mut entries = 0;

    match DirectoryListing::open(dir).await {
        Ok(mut listing) => loop {
            let name = match listing.next_name().await {
                Ok(Some(name)) => name,
                Ok(None) => break,
                Err(e) => {
                    warn!("Listing of {} cut short: {}", dir.display(), e);
                    break;
                }
            };

            let record = encode_listing_record(name.as_encoded_bytes());
            send(stream, &record, timeout)
                .await
                .map_err(TransferError::WriteFailed)?;
            entries += 1;
        },
        Err(e) => warn!("Cannot enumerate {}: {}", dir.display(), e),
    }

    send(stream, LISTING_SENTINEL, timeout)
        .await
        .map_err(TransferError::WriteFailed)?;

    info!("Sent {} directory entries from {}", entries, dir.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::framing::{LISTING_RECORD_LENGTH, decode_listing};

    #[tokio::test]
    async fn writes_records_then_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), b"1").unwrap();
        std::fs::write(dir.path().join("two.txt"), b"2").unwrap();

        let mut out = Vec::new();
        let entries = send_directory(&mut out, dir.path(), &ServerConfig::default())
            .await
            .unwrap();

        assert_eq!(entries, 4);
        assert_eq!(out.len(), 4 * LISTING_RECORD_LENGTH + LISTING_SENTINEL.len());
        assert!(out.ends_with(LISTING_SENTINEL));

        let mut names = decode_listing(&out).unwrap();
        names.sort();
        assert_eq!(names, vec![".", "..", "one.txt", "two.txt"]);
    }

    #[tokio::test]
    async fn unreadable_directory_still_gets_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();

        let entries = send_directory(&mut out, &dir.path().join("gone"), &ServerConfig::default())
            .await
            .unwrap();

        assert_eq!(entries, 0);
        assert_eq!(out, LISTING_SENTINEL);
    }

    #[tokio::test]
    async fn more_than_a_hundred_entries_are_all_sent() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..150 {
            std::fs::write(dir.path().join(format!("f{:03}", i)), b"").unwrap();
        }

        let mut out = Vec::new();
        let entries = send_directory(&mut out, dir.path(), &ServerConfig::default())
            .await
            .unwrap();

        assert_eq!(entries, 152);
        assert_eq!(decode_listing(&out).unwrap().len(), 152);
    }
}

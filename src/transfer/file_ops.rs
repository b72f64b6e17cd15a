//! Module `file_ops`
//!
//! Streams a file's bytes over the data connection.

use log::{error, info};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite};

use crate::error::TransferError;
use crate::protocol::ProtocolVersion;
use crate::protocol::framing::{FILE_SENTINEL, encode_length_header};
use crate::server::ServerConfig;
use crate::utils::network::{send, with_timeout};

/// Sends the file at `path` to the client.
///
/// Each chunk written is exactly the bytes read for it. Under v1 the content
/// is followed by the file sentinel; under v2 it is preceded by its length
/// and bounded by it, so a file that grows mid-transfer is cut at the
/// announced size and one that shrinks is an error.
///
/// Returns the number of content bytes sent.
pub async fn send_file<S>(
    stream: &mut S,
    path: &Path,
    config: &ServerConfig,
) -> Result<u64, TransferError>
where
    S: AsyncWrite + Unpin,
{
    let timeout = config.io_timeout();

    // the existence check already passed, so failing here is a real error
    let file = File::open(path).await.map_err(|e| {
        error!("Failed to open file {}: {}", path.display(), e);
        TransferError::OpenFailed(path.to_path_buf(), e)
    })?;

    let announced = match config.protocol {
        ProtocolVersion::V1 => None,
        ProtocolVersion::V2 => {
            let len = file
                .metadata()
                .await
                .map_err(|e| TransferError::ReadFailed(path.to_path_buf(), e))?
                .len();
            send(stream, &encode_length_header(len), timeout)
                .await
                .map_err(TransferError::WriteFailed)?;
            Some(len)
        }
    };

    let mut reader = file.take(announced.unwrap_or(u64::MAX));
    let mut buffer = vec![0u8; config.chunk_size];
    let mut total_bytes_sent = 0u64;

    loop {
        let n = with_timeout(timeout, "reading file", reader.read(&mut buffer))
            .await
            .map_err(|e| TransferError::ReadFailed(path.to_path_buf(), e))?;
        if n == 0 {
            break;
        }

        send(stream, &buffer[..n], timeout)
            .await
            .map_err(TransferError::WriteFailed)?;
        total_bytes_sent += n as u64;
    }

    match announced {
        Some(expected) if expected != total_bytes_sent => {
            return Err(TransferError::LengthMismatch {
                path: path.to_path_buf(),
                expected,
                sent: total_bytes_sent,
            });
        }
        Some(_) => {}
        None => send(stream, FILE_SENTINEL, timeout)
            .await
            .map_err(TransferError::WriteFailed)?,
    }

    info!(
        "File transfer completed: {} ({} bytes)",
        path.display(),
        total_bytes_sent
    );
    Ok(total_bytes_sent)
}

//! Control connection exchanges
//!
//! The three points at which the server talks to the client on the control
//! connection: reading the command, negotiating the data port and reporting
//! whether a requested file exists.

use log::{info, warn};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{FtpServerError, ProtocolError, StorageError};
use crate::protocol::responses::{MESSAGE_LENGTH, OK, PORT_ANNOUNCEMENT_LENGTH, V2_DELIMITER};
use crate::protocol::{ControlRequest, parse_control_request, parse_data_port};
use crate::server::ServerConfig;
use crate::storage::{path_exists, resolve_file_path};
use crate::utils::network::{read_once, read_until, send};

async fn read_message<S>(
    stream: &mut S,
    what: &'static str,
    max: usize,
    config: &ServerConfig,
) -> Result<Vec<u8>, ProtocolError>
where
    S: AsyncRead + Unpin,
{
    if !config.protocol.is_delimited() {
        return Ok(read_once(stream, max, config.io_timeout()).await?);
    }

    read_until(stream, V2_DELIMITER, max, config.io_timeout())
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidData => ProtocolError::MessageTooLong(what, max),
            _ => ProtocolError::Io(e),
        })
}

/// Reads and parses the command message.
///
/// Under v1 this is one read of up to [`MESSAGE_LENGTH`] bytes, so a command
/// that straddles TCP segments is cut short. Under v2 the read continues to
/// the delimiter.
pub async fn read_control_request<S>(
    stream: &mut S,
    config: &ServerConfig,
) -> Result<ControlRequest, ProtocolError>
where
    S: AsyncRead + Unpin,
{
    let raw = read_message(stream, "command", MESSAGE_LENGTH, config).await?;
    if raw.is_empty() {
        return Err(ProtocolError::ConnectionClosed("command"));
    }
    Ok(parse_control_request(&raw))
}

/// Acknowledges the command and reads the data port the client announces.
///
/// Port 0 (what unparsable text yields) and ports below the configured
/// minimum abort the session before anything is bound.
pub async fn negotiate_data_port<S>(stream: &mut S, config: &ServerConfig) -> Result<u16, ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    send(stream, OK, config.io_timeout()).await?;

    let raw = read_message(stream, "data port", PORT_ANNOUNCEMENT_LENGTH, config).await?;
    if raw.is_empty() {
        return Err(ProtocolError::ConnectionClosed("data port"));
    }

    let port = parse_data_port(&raw);
    if port == 0 {
        return Err(ProtocolError::InvalidDataPort(
            String::from_utf8_lossy(&raw).into_owned(),
        ));
    }
    if port < config.min_data_port {
        return Err(ProtocolError::DataPortOutOfRange {
            port,
            min: config.min_data_port,
        });
    }

    Ok(port)
}

/// Reports on the control connection whether `filename` exists.
///
/// Sends `OK` and returns the resolved path when it does. When it does not,
/// the error is returned and the caller owes the client `File not found`.
pub async fn check_file<S>(
    stream: &mut S,
    filename: &str,
    config: &ServerConfig,
) -> Result<PathBuf, FtpServerError>
where
    S: AsyncWrite + Unpin,
{
    let root = config.server_root_path();
    let path = resolve_file_path(&root, filename, config.confine_to_root)?;

    if !path_exists(&path).await {
        warn!("File not found: {}", path.display());
        return Err(StorageError::FileNotFound(filename.to_string()).into());
    }

    send(stream, OK, config.io_timeout())
        .await
        .map_err(ProtocolError::from)?;
    info!("File {} found, confirming to client", path.display());
    Ok(path)
}

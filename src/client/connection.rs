//! Module `connection`
//!
//! Client side of the protocol: one control connection per request, and a
//! data connection to the listener the server opens on the announced port.

use log::{debug, info};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWrite};
use tokio::net::TcpStream;

use crate::error::ClientError;
use crate::protocol::ProtocolVersion;
use crate::protocol::framing::{
    LENGTH_HEADER_LENGTH, decode_length_header, decode_listing, strip_file_sentinel,
};
use crate::protocol::responses::{FILE_NOT_FOUND, GET_TAG, LIST_TAG, OK, READY, V2_DELIMITER};
use crate::utils::network::{read_once, read_to_close, send};

/// Longest control reply read at once
const REPLY_LENGTH: usize = 100;

const CONNECT_ATTEMPTS: u32 = 8;
const INITIAL_RETRY_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct FtClient {
    host: String,
    control_port: u16,
    protocol: ProtocolVersion,
    timeout: Option<Duration>,
}

impl FtClient {
    pub fn new(host: impl Into<String>, control_port: u16) -> Self {
        Self {
            host: host.into(),
            control_port,
            protocol: ProtocolVersion::V1,
            timeout: None,
        }
    }

    pub fn with_protocol(mut self, protocol: ProtocolVersion) -> Self {
        self.protocol = protocol;
        self
    }

    /// Bounds every read and write; without it the client waits indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Requests the server's directory listing.
    pub async fn list(&self, data_port: u16) -> Result<Vec<String>, ClientError> {
        let (_control, mut data) = self.request(LIST_TAG, data_port).await?;

        let received = read_to_close(&mut data, self.timeout).await?;
        let names = decode_listing(&received)?;
        info!("Received {} directory entries", names.len());
        Ok(names)
    }

    /// Retrieves the contents of `filename`.
    pub async fn get(&self, filename: &str, data_port: u16) -> Result<Vec<u8>, ClientError> {
        let mut command = GET_TAG.to_vec();
        command.extend_from_slice(filename.as_bytes());
        let (mut control, mut data) = self.request(&command, data_port).await?;

        let status = read_once(&mut control, REPLY_LENGTH, self.timeout).await?;
        if status == FILE_NOT_FOUND {
            return Err(ClientError::FileNotFound(filename.to_string()));
        }
        if status != OK {
            return Err(ClientError::Rejected(describe_reply(&status)));
        }

        let content = match self.protocol {
            ProtocolVersion::V1 => {
                let received = read_to_close(&mut data, self.timeout).await?;
                strip_file_sentinel(&received)
                    .ok_or(ClientError::IncompleteTransfer)?
                    .to_vec()
            }
            ProtocolVersion::V2 => self.read_length_prefixed(&mut data).await?,
        };

        info!("Received '{}' ({} bytes)", filename, content.len());
        Ok(content)
    }

    /// Sends `message` verbatim as the command and returns everything the
    /// server writes back before closing the control connection.
    pub async fn send_raw_command(&self, message: &[u8]) -> Result<Vec<u8>, ClientError> {
        let mut control = self.open_control().await?;
        send(&mut control, message, self.timeout).await?;
        Ok(read_to_close(&mut control, self.timeout).await?)
    }

    async fn open_control(&self) -> Result<TcpStream, ClientError> {
        let addr = format!("{}:{}", self.host, self.control_port);
        TcpStream::connect(&addr)
            .await
            .map_err(|e| ClientError::ConnectFailed(addr, e))
    }

    async fn send_message<S>(&self, stream: &mut S, message: &[u8]) -> std::io::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        if self.protocol.is_delimited() {
            let mut framed = message.to_vec();
            framed.push(V2_DELIMITER);
            send(stream, &framed, self.timeout).await
        } else {
            send(stream, message, self.timeout).await
        }
    }

    /// Sends the command, announces the data port and connects to it.
    async fn request(
        &self,
        command: &[u8],
        data_port: u16,
    ) -> Result<(TcpStream, TcpStream), ClientError> {
        let mut control = self.open_control().await?;
        self.send_message(&mut control, command).await?;

        let reply = read_once(&mut control, REPLY_LENGTH, self.timeout).await?;
        if reply != OK {
            return Err(ClientError::Rejected(describe_reply(&reply)));
        }

        self.send_message(&mut control, data_port.to_string().as_bytes())
            .await?;

        let mut data = self.connect_data(data_port).await?;
        if self.protocol == ProtocolVersion::V2 {
            send(&mut data, READY, self.timeout).await?;
        }
        Ok((control, data))
    }

    /// The server binds the data port only after reading the announcement,
    /// so early attempts may be refused.
    async fn connect_data(&self, port: u16) -> Result<TcpStream, ClientError> {
        let addr = format!("{}:{}", self.host, port);
        let mut delay = INITIAL_RETRY_MS;
        let mut attempt = 1;

        loop {
            match TcpStream::connect(&addr).await {
                Ok(stream) => return Ok(stream),
                Err(e) if attempt < CONNECT_ATTEMPTS => {
                    debug!("Data connection attempt {} to {} failed: {}", attempt, addr, e);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(ClientError::ConnectFailed(addr, e)),
            }
        }
    }

    async fn read_length_prefixed(&self, data: &mut TcpStream) -> Result<Vec<u8>, ClientError> {
        let mut header = [0u8; LENGTH_HEADER_LENGTH];
        if let Err(e) = data.read_exact(&mut header).await {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => ClientError::IncompleteTransfer,
                _ => ClientError::Io(e),
            });
        }

        let expected = decode_length_header(header);
        let mut limited = data.take(expected);
        let content = read_to_close(&mut limited, self.timeout).await?;
        if content.len() as u64 != expected {
            return Err(ClientError::IncompleteTransfer);
        }
        Ok(content)
    }
}

fn describe_reply(reply: &[u8]) -> String {
    if reply.is_empty() {
        return "connection closed".to_string();
    }
    String::from_utf8_lossy(reply).into_owned()
}

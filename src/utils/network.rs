//! Network utilities
//!
//! Optional deadlines around socket operations. Without a limit an operation
//! blocks for as long as the peer keeps the connection open.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket};

/// Binds and listens on `addr` with an explicit backlog.
pub fn bind_listener(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    // a previous connection on this port may still sit in TIME_WAIT
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

/// Runs `operation`, failing with `TimedOut` if `limit` elapses first.
pub async fn with_timeout<T, F>(limit: Option<Duration>, what: &str, operation: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("timed out after {:?} {}", limit, what),
                )
            })?,
        None => operation.await,
    }
}

/// Writes all of `bytes` and flushes.
pub async fn send<S>(stream: &mut S, bytes: &[u8], limit: Option<Duration>) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    with_timeout(limit, "writing", async {
        stream.write_all(bytes).await?;
        stream.flush().await
    })
    .await
}

/// Reads at most `max` bytes with a single read.
///
/// Whatever the first read returns is the message; a message split across
/// segments arrives truncated.
pub async fn read_once<S>(stream: &mut S, max: usize, limit: Option<Duration>) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = vec![0u8; max];
    let n = with_timeout(limit, "reading", stream.read(&mut buffer)).await?;
    buffer.truncate(n);
    Ok(buffer)
}

/// Reads until `delimiter` or end of stream. The delimiter is consumed but
/// not returned.
///
/// A line longer than `max` bytes fails with `InvalidData` as soon as the
/// first excess byte arrives.
pub async fn read_until<S>(
    stream: &mut S,
    delimiter: u8,
    max: usize,
    limit: Option<Duration>,
) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    with_timeout(limit, "reading", async {
        let mut message = Vec::with_capacity(max);
        let mut byte = [0u8; 1];
        // one byte at a time so nothing past the delimiter is consumed
        loop {
            if stream.read(&mut byte).await? == 0 || byte[0] == delimiter {
                return Ok(message);
            }
            if message.len() == max {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line exceeds {} bytes", max),
                ));
            }
            message.push(byte[0]);
        }
    })
    .await
}

/// Reads until the peer closes its side of the connection.
pub async fn read_to_close<S>(stream: &mut S, limit: Option<Duration>) -> io::Result<Vec<u8>>
where
    S: AsyncRead + Unpin,
{
    let mut received = Vec::new();
    with_timeout(limit, "reading", stream.read_to_end(&mut received)).await?;
    Ok(received)
}

//! Module `data_channel`
//!
//! Opens the per-session data listener on the port the client announced and
//! accepts the single data connection it is used for.

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;

use crate::error::TransferError;
use crate::protocol::ProtocolVersion;
use crate::protocol::responses::READY;
use crate::server::ServerConfig;
use crate::utils::network::{bind_listener, with_timeout};

/// Binds a listener on `port`, accepts exactly one connection and closes the
/// listener again.
///
/// # Returns
///
/// * `Ok(TcpStream)` - the accepted data connection
/// * `Err(TransferError)` - bind, listen or accept failed; only the current
///   session is affected
pub async fn establish_data_channel(
    config: &ServerConfig,
    port: u16,
) -> Result<TcpStream, TransferError> {
    let data_socket = config.data_socket(port);

    let listener = bind_listener(data_socket, config.listen_backlog)
        .map_err(|e| TransferError::PortBindingFailed(data_socket, e))?;

    info!("Waiting for data connection on {}", data_socket);

    let (stream, peer_addr) = with_timeout(
        config.io_timeout(),
        "waiting for data connection",
        listener.accept(),
    )
    .await
    .map_err(TransferError::AcceptFailed)?;

    info!("Data connection accepted from {} on {}", peer_addr, data_socket);
    drop(listener);
    debug!("Closed data listener on {}", data_socket);
    Ok(stream)
}

/// Holds off writing until the client is ready to read.
///
/// Under v1 this is a fixed pause, matching the timing v1 clients
/// expect. Under v2 the client writes `READY` on the data connection.
pub async fn await_client_ready<S>(stream: &mut S, config: &ServerConfig) -> Result<(), TransferError>
where
    S: AsyncRead + Unpin,
{
    match config.protocol {
        ProtocolVersion::V1 => {
            let delay = config.ready_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(())
        }
        ProtocolVersion::V2 => {
            let mut signal = [0u8; READY.len()];
            with_timeout(
                config.io_timeout(),
                "waiting for ready signal",
                stream.read_exact(&mut signal),
            )
            .await
            .map_err(|e| TransferError::NotReady(e.to_string()))?;

            if signal != READY {
                warn!("Unexpected ready signal {:?}", String::from_utf8_lossy(&signal));
                return Err(TransferError::NotReady(format!(
                    "expected READY, got {:?}",
                    String::from_utf8_lossy(&signal)
                )));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    fn v2_config() -> ServerConfig {
        ServerConfig {
            protocol: ProtocolVersion::V2,
            io_timeout_secs: 1,
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn v2_waits_for_ready_signal() {
        let (mut client, mut server) = tokio::io::duplex(16);
        client.write_all(READY).await.unwrap();
        assert!(await_client_ready(&mut server, &v2_config()).await.is_ok());
    }

    #[tokio::test]
    async fn v2_rejects_other_bytes() {
        let (mut client, mut server) = tokio::io::duplex(16);
        client.write_all(b"HELLO").await.unwrap();
        assert!(matches!(
            await_client_ready(&mut server, &v2_config()).await,
            Err(TransferError::NotReady(_))
        ));
    }

    #[tokio::test]
    async fn v2_fails_when_client_hangs_up() {
        let (client, mut server) = tokio::io::duplex(16);
        drop(client);
        assert!(await_client_ready(&mut server, &v2_config()).await.is_err());
    }

    #[tokio::test]
    async fn v1_pauses_for_configured_delay() {
        let (_client, mut server) = tokio::io::duplex(16);
        let config = ServerConfig {
            ready_delay_ms: 50,
            ..ServerConfig::default()
        };

        let started = std::time::Instant::now();
        await_client_ready(&mut server, &config).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = ServerConfig {
            bind_address: "127.0.0.1".into(),
            ..ServerConfig::default()
        };

        assert!(matches!(
            establish_data_channel(&config, port).await,
            Err(TransferError::PortBindingFailed(_, _))
        ));
    }

    #[tokio::test]
    async fn accepts_one_connection() {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let config = ServerConfig {
            bind_address: "127.0.0.1".into(),
            io_timeout_secs: 5,
            ..ServerConfig::default()
        };

        let connector = tokio::spawn(async move {
            for _ in 0..50 {
                if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)).await {
                    return Some(stream);
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            None
        });

        let accepted = establish_data_channel(&config, port).await.unwrap();
        let connected = connector.await.unwrap().expect("client connected");
        assert_eq!(accepted.peer_addr().unwrap(), connected.local_addr().unwrap());
    }
}

use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::error::FtpServerError;
use crate::server::config::ServerConfig;
use crate::session::Session;
use crate::transfer::TransferSummary;
use crate::utils::network::bind_listener;

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Validates `config` and binds the control listener.
    ///
    /// This is the only failure that stops the server; everything after it
    /// is confined to a single session.
    pub async fn bind(config: ServerConfig) -> Result<Self, FtpServerError> {
        config.validate()?;

        let control_socket = config.control_socket();
        let listener = match bind_listener(control_socket, config.listen_backlog) {
            Ok(listener) => {
                info!("Server bound to {}", control_socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", control_socket, e);
                return Err(e.into());
            }
        };

        info!(
            "Serving {} using protocol {}",
            config.server_root_path().display(),
            config.protocol
        );

        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves clients one after another until the process is killed.
    pub async fn start(&self) {
        info!(
            "Starting file transfer server on {} (one client at a time)",
            self.config.control_socket()
        );

        loop {
            self.serve_next().await;
        }
    }

    /// Accepts the next control connection and runs its session to
    /// completion. Nothing else is accepted meanwhile.
    pub async fn serve_next(&self) -> Option<TransferSummary> {
        info!(
            "Waiting for client request on port {}...",
            self.config.control_port
        );

        match self.listener.accept().await {
            Ok((stream, addr)) => {
                info!("Control connection accepted from {}", addr);
                let mut session = Session::new(stream, addr, Arc::clone(&self.config));
                let result = session.run().await;
                session.finish(result).await
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
                None
            }
        }
    }
}

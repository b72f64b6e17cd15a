//! Per-client session
//!
//! A `Session` owns one control connection and, once negotiated, one data
//! connection. It is created at accept, driven through the handshake by
//! [`Session::run`] and consumed by [`Session::finish`], which closes both
//! sockets whatever the outcome.

use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::{FtpServerError, ProtocolError, error_reply, handle_error};
use crate::protocol::Command;
use crate::server::ServerConfig;
use crate::session::control::{check_file, negotiate_data_port, read_control_request};
use crate::session::state::SessionState;
use crate::transfer::{
    TransferSummary, await_client_ready, establish_data_channel, send_directory, send_file,
};
use crate::utils::network::send;

pub struct Session {
    peer: SocketAddr,
    control: TcpStream,
    data: Option<TcpStream>,
    state: SessionState,
    config: Arc<ServerConfig>,
}

impl Session {
    pub fn new(control: TcpStream, peer: SocketAddr, config: Arc<ServerConfig>) -> Self {
        Self {
            peer,
            control,
            data: None,
            state: SessionState::WaitingForControlConnection,
            config,
        }
    }

    fn advance(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal session transition {} -> {}",
            self.state,
            next
        );
        debug!("Session {}: {} -> {}", self.peer, self.state, next);
        self.state = next;
    }

    /// Drives the session from command to completed transfer.
    ///
    /// An invalid command ends the session before any data port is
    /// negotiated. For `Get`, the file check happens on the control
    /// connection after the data connection is up, which is the order
    /// clients expect.
    pub async fn run(&mut self) -> Result<TransferSummary, FtpServerError> {
        self.advance(SessionState::ParsingCommand);
        let request = read_control_request(&mut self.control, &self.config).await?;

        let filename = match request.command() {
            Command::List => {
                info!("List directory requested by {}", self.peer);
                None
            }
            Command::Get(name) => {
                info!("File '{}' requested by {}", name, self.peer);
                Some(name.clone())
            }
            Command::Invalid => {
                return Err(ProtocolError::InvalidCommand(request.tag()).into());
            }
        };

        self.advance(SessionState::NegotiatingDataPort);
        let port = negotiate_data_port(&mut self.control, &self.config).await?;

        self.advance(SessionState::EstablishingDataChannel);
        let data = establish_data_channel(&self.config, port).await?;

        self.advance(SessionState::Transferring);
        let data = self.data.insert(data);

        match filename {
            None => {
                info!("Sending directory listing to {} on port {}", self.peer, port);
                await_client_ready(data, &self.config).await?;
                let entries =
                    send_directory(data, &self.config.server_root_path(), &self.config).await?;
                Ok(TransferSummary::Listing { entries })
            }
            Some(name) => {
                let path = check_file(&mut self.control, &name, &self.config).await?;
                info!("Sending file '{}' to {} on port {}", name, self.peer, port);
                await_client_ready(data, &self.config).await?;
                let bytes = send_file(data, &path, &self.config).await?;
                Ok(TransferSummary::File { name, bytes })
            }
        }
    }

    /// Reports the outcome and closes both connections.
    ///
    /// Errors the protocol has a message for are sent to the client on the
    /// control connection first.
    pub async fn finish(
        mut self,
        result: Result<TransferSummary, FtpServerError>,
    ) -> Option<TransferSummary> {
        self.advance(SessionState::ClosingSession);

        let summary = match result {
            Ok(summary) => {
                info!("Session with {} complete: {}", self.peer, summary);
                Some(summary)
            }
            Err(err) => {
                handle_error(&self.peer, &err);
                if let Some(reply) = error_reply(&err) {
                    if let Err(e) = send(&mut self.control, reply, self.config.io_timeout()).await {
                        warn!("Failed to send error reply to {}: {}", self.peer, e);
                    }
                }
                None
            }
        };

        if let Some(mut data) = self.data.take() {
            if let Err(e) = data.shutdown().await {
                debug!("Data connection with {} already closed: {}", self.peer, e);
            }
        }
        if let Err(e) = self.control.shutdown().await {
            debug!("Control connection with {} already closed: {}", self.peer, e);
        }

        info!("Closed connections with {}", self.peer);
        summary
    }
}

//! Command-line arguments for the server and client binaries

use clap::Parser;
use std::path::PathBuf;

use crate::protocol::ProtocolVersion;

fn port_in_range(raw: &str) -> Result<u16, String> {
    let port: u32 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a port number", raw))?;
    if !(1024..=65535).contains(&port) {
        return Err("valid port numbers are in range 1024 -> 65535".to_string());
    }
    Ok(port as u16)
}

/// Serves directory listings and files over a control + data connection pair.
#[derive(Parser, Debug)]
#[command(name = "ftserver")]
pub struct ServerCli {
    /// Control port to listen on (1024-65535)
    #[arg(value_parser = port_in_range)]
    pub port: u16,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Requests a directory listing or a file from an ftserver.
#[derive(Parser, Debug)]
#[command(name = "ftclient")]
pub struct ClientCli {
    /// Server host name or address
    pub host: String,

    /// Server control port (1024-65535)
    #[arg(value_parser = port_in_range)]
    pub server_port: u16,

    /// List the server's directory
    #[arg(short = 'l', long = "list", conflicts_with = "get", required_unless_present = "get")]
    pub list: bool,

    /// Retrieve FILE from the server
    #[arg(short = 'g', long = "get", value_name = "FILE")]
    pub get: Option<String>,

    /// Port the server should open for the data connection (1024-65535)
    #[arg(value_parser = port_in_range)]
    pub data_port: u16,

    /// Overwrite an existing local file
    #[arg(long)]
    pub force: bool,

    #[arg(long, value_enum, default_value_t = ProtocolVersion::V1)]
    pub protocol: ProtocolVersion,
}

impl ClientCli {
    /// Ports must differ, since the server listens on both at once.
    pub fn validate(&self) -> Result<(), String> {
        if self.server_port == self.data_port {
            return Err("server port and data port must be different".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_takes_one_port() {
        let cli = ServerCli::try_parse_from(["ftserver", "30020"]).unwrap();
        assert_eq!(cli.port, 30020);
        assert!(cli.config.is_none());
    }

    #[test]
    fn server_rejects_out_of_range_ports() {
        for arg in ["80", "1023", "65536", "abc", "-1"] {
            assert!(ServerCli::try_parse_from(["ftserver", arg]).is_err(), "{}", arg);
        }
        assert!(ServerCli::try_parse_from(["ftserver"]).is_err());
        assert!(ServerCli::try_parse_from(["ftserver", "30020", "30021"]).is_err());
    }

    #[test]
    fn client_parses_list_request() {
        let cli = ClientCli::try_parse_from(["ftclient", "localhost", "30020", "-l", "30021"]).unwrap();
        assert!(cli.list);
        assert_eq!(cli.get, None);
        assert_eq!(cli.data_port, 30021);
        assert_eq!(cli.protocol, ProtocolVersion::V1);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn client_parses_get_request() {
        let cli = ClientCli::try_parse_from([
            "ftclient", "localhost", "30020", "-g", "notes.txt", "30021", "--protocol", "v2",
        ])
        .unwrap();
        assert!(!cli.list);
        assert_eq!(cli.get.as_deref(), Some("notes.txt"));
        assert_eq!(cli.protocol, ProtocolVersion::V2);
    }

    #[test]
    fn client_needs_exactly_one_command() {
        assert!(ClientCli::try_parse_from(["ftclient", "localhost", "30020", "30021"]).is_err());
        assert!(
            ClientCli::try_parse_from(["ftclient", "localhost", "30020", "-l", "-g", "a", "30021"])
                .is_err()
        );
    }

    #[test]
    fn client_rejects_shared_port() {
        let cli = ClientCli::try_parse_from(["ftclient", "localhost", "30020", "-l", "30020"]).unwrap();
        assert!(cli.validate().is_err());
    }
}

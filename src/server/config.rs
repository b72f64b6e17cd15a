//! Configuration management for the file transfer server
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `FTSERVER_*` environment variables, in increasing precedence. The control
//! port given on the command line overrides all of them.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::protocol::ProtocolVersion;

/// Lowest control port the server accepts
pub const MIN_CONTROL_PORT: u16 = 1024;

/// Config file looked up in the working directory when none is given
const DEFAULT_CONFIG_NAME: &str = "ftserver";

const ENV_PREFIX: &str = "FTSERVER";

/// Immutable server configuration, loaded once at startup
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address for both the control and data listeners
    pub bind_address: String,

    /// Port for the control listener
    pub control_port: u16,

    /// Directory whose entries are listed and whose files are served
    pub server_root: String,

    pub protocol: ProtocolVersion,

    /// v1 only: pause between accepting the data connection and writing to it
    pub ready_delay_ms: u64,

    /// Bound on every read, write and data accept; 0 blocks forever
    pub io_timeout_secs: u64,

    /// Data port announcements below this abort the session
    pub min_data_port: u16,

    /// Refuse filenames that resolve outside `server_root`
    pub confine_to_root: bool,

    /// Bytes read from a file per write to the data connection
    pub chunk_size: usize,

    pub listen_backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            control_port: 30020,
            server_root: ".".to_string(),
            protocol: ProtocolVersion::V1,
            ready_delay_ms: 2000,
            io_timeout_secs: 0,
            min_data_port: 1024,
            confine_to_root: false,
            chunk_size: 1000,
            listen_backlog: 10,
        }
    }
}

impl ServerConfig {
    /// Load configuration with file and environment overrides.
    ///
    /// Without an explicit `path`, `./ftserver.toml` is used when present.
    /// The result is validated before it is returned.
    pub fn load(path: Option<&Path>, control_port: Option<u16>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let mut builder = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("control_port", i64::from(defaults.control_port))?
            .set_default("server_root", defaults.server_root)?
            .set_default("protocol", defaults.protocol.to_string())?
            .set_default("ready_delay_ms", defaults.ready_delay_ms as i64)?
            .set_default("io_timeout_secs", defaults.io_timeout_secs as i64)?
            .set_default("min_data_port", i64::from(defaults.min_data_port))?
            .set_default("confine_to_root", defaults.confine_to_root)?
            .set_default("chunk_size", defaults.chunk_size as i64)?
            .set_default("listen_backlog", i64::from(defaults.listen_backlog))?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("control_port", control_port.map(i64::from))?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_port < MIN_CONTROL_PORT {
            return Err(ConfigError::InvalidControlPort(self.control_port));
        }

        if self.bind_address.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidBindAddress(self.bind_address.clone()));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::EmptyServerRoot);
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }

        if self.listen_backlog == 0 {
            return Err(ConfigError::ZeroBacklog);
        }

        Ok(())
    }

    fn bind_ip(&self) -> IpAddr {
        self.bind_address
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
    }

    /// Address of the control listener
    pub fn control_socket(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip(), self.control_port)
    }

    /// Address a data listener binds for the announced port
    pub fn data_socket(&self, port: u16) -> SocketAddr {
        SocketAddr::new(self.bind_ip(), port)
    }

    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn io_timeout(&self) -> Option<Duration> {
        (self.io_timeout_secs > 0).then(|| Duration::from_secs(self.io_timeout_secs))
    }

    pub fn ready_delay(&self) -> Duration {
        Duration::from_millis(self.ready_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.protocol, ProtocolVersion::V1);
        assert_eq!(config.io_timeout(), None);
        assert_eq!(config.ready_delay(), Duration::from_secs(2));
    }

    #[test]
    fn control_port_range_is_enforced() {
        for port in [0, 80, 1023] {
            let config = ServerConfig {
                control_port: port,
                ..ServerConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidControlPort(p)) if p == port
            ));
        }

        for port in [1024, 30000, 65535] {
            let config = ServerConfig {
                control_port: port,
                ..ServerConfig::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn rejects_unusable_values() {
        let config = ServerConfig {
            bind_address: "not-an-ip".into(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBindAddress(_))));

        let config = ServerConfig {
            chunk_size: 0,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroChunkSize)));

        let config = ServerConfig {
            server_root: String::new(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyServerRoot)));
    }

    #[test]
    fn socket_addresses_use_bind_address() {
        let config = ServerConfig {
            bind_address: "127.0.0.1".into(),
            control_port: 4000,
            ..ServerConfig::default()
        };
        assert_eq!(config.control_socket().to_string(), "127.0.0.1:4000");
        assert_eq!(config.data_socket(4001).to_string(), "127.0.0.1:4001");
    }

    #[test]
    fn loads_file_and_applies_port_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "bind_address = \"127.0.0.1\"\ncontrol_port = 5000\nprotocol = \"v2\"\nchunk_size = 4096\nio_timeout_secs = 7"
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path), Some(6000)).unwrap();
        assert_eq!(config.control_port, 6000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.protocol, ProtocolVersion::V2);
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.io_timeout(), Some(Duration::from_secs(7)));
        assert_eq!(config.listen_backlog, 10);
    }

    #[test]
    fn load_validates_port_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "control_port = 21\n").unwrap();

        assert!(matches!(
            ServerConfig::load(Some(&path), None),
            Err(ConfigError::InvalidControlPort(21))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            ServerConfig::load(Some(&path), Some(5000)),
            Err(ConfigError::Load(_))
        ));
    }
}

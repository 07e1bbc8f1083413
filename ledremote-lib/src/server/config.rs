//! Server configuration

use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::status::DEFAULT_STATUS_DIR;

/// Configuration for the HTTP front door.
///
/// # Example
///
/// ```
/// use ledremote_lib::server::ServerConfig;
///
/// let config = ServerConfig::default()
///     .with_port(9000)
///     .with_status_dir("/var/lib/ledremote");
/// assert_eq!(config.addr().port(), 9000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    ///
    /// Default: `0.0.0.0`
    pub bind: IpAddr,

    /// Port to listen on.
    ///
    /// Default: 8080
    pub port: u16,

    /// Directory holding the status slot files.
    ///
    /// Default: `status`
    pub status_dir: PathBuf,

    /// Directory static files and `index.html` are served from.
    ///
    /// Default: the working directory
    pub web_root: PathBuf,

    /// Largest accepted request body. Larger bodies drop the connection.
    ///
    /// Default: 1,000,000 bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            status_dir: PathBuf::from(DEFAULT_STATUS_DIR),
            web_root: PathBuf::from("."),
            max_body_bytes: 1_000_000,
        }
    }
}

impl ServerConfig {
    /// Environment variable for the bind address.
    pub const ENV_BIND: &'static str = "LEDREMOTE_BIND";
    /// Environment variable for the port.
    pub const ENV_PORT: &'static str = "LEDREMOTE_PORT";
    /// Environment variable for the status directory.
    pub const ENV_STATUS_DIR: &'static str = "LEDREMOTE_STATUS_DIR";
    /// Environment variable for the web root.
    pub const ENV_WEB_ROOT: &'static str = "LEDREMOTE_WEB_ROOT";
    /// Environment variable for the body limit.
    pub const ENV_MAX_BODY: &'static str = "LEDREMOTE_MAX_BODY";

    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from a variable lookup, e.g. `std::env::var`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup(Self::ENV_BIND) {
            config.bind = bind
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(bind))?;
        }
        if let Some(port) = lookup(Self::ENV_PORT) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(dir) = lookup(Self::ENV_STATUS_DIR) {
            config.status_dir = PathBuf::from(dir);
        }
        if let Some(root) = lookup(Self::ENV_WEB_ROOT) {
            config.web_root = PathBuf::from(root);
        }
        if let Some(limit) = lookup(Self::ENV_MAX_BODY) {
            config.max_body_bytes = match limit.trim().parse::<usize>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => return Err(ConfigError::InvalidBodyLimit(limit)),
            };
        }

        Ok(config)
    }

    /// Returns the socket address to listen on.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Sets the bind address.
    pub fn with_bind(mut self, bind: IpAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Sets the port. `0` picks a free port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the status directory.
    pub fn with_status_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.status_dir = dir.into();
        self
    }

    /// Sets the web root.
    pub fn with_web_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.web_root = root.into();
        self
    }

    /// Sets the request body limit.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }
}

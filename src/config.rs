//! Server settings read from the environment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::foundation::error::{ReelError, ReelResult};

/// Listen host when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;
/// Parent of the per-request directories when `OUTPUT_DIR` is unset.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// HTTP server settings. Environment first, CLI flags override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP literal to bind, v4 or v6.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Parent directory for request output.
    pub output_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `OUTPUT_DIR`, falling back to defaults for unset variables.
    pub fn from_env() -> ReelResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ReelResult<Self> {
        let mut cfg = Self::default();
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            cfg.host = host;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port
                .trim()
                .parse()
                .map_err(|e| ReelError::validation(format!("invalid PORT '{port}': {e}")))?;
        }
        if let Some(dir) = lookup("OUTPUT_DIR").filter(|d| !d.trim().is_empty()) {
            cfg.output_dir = PathBuf::from(dir);
        }
        Ok(cfg)
    }

    /// Replace host and port with a `host:port` override.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.host = addr.ip().to_string();
        self.port = addr.port();
        self
    }

    /// Replace the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Socket address to bind. Fails when `host` is not an IP literal.
    pub fn addr(&self) -> ReelResult<SocketAddr> {
        let ip: IpAddr = self.host.trim().parse().map_err(|e| {
            ReelError::validation(format!("invalid listen host '{}': {e}", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

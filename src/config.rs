//! Configuration for nsdctl
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{ControlError, Result};

/// Default location of the local control socket
pub const DEFAULT_CONTROL_SOCKET: &str = "/var/run/nsd.sock";

/// Default TCP port of the TLS control interface
pub const DEFAULT_CONTROL_PORT: u16 = 8952;

/// Main configuration for a control connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Socket path, or `host[:port]` for the TLS interface
    pub control_interface: String,

    // -------------------------------------------------------------------------
    // TLS Configuration
    // -------------------------------------------------------------------------
    /// CA bundle the server certificate must chain to
    pub server_ca: Option<PathBuf>,

    /// Client certificate presented to the server
    pub client_cert: Option<PathBuf>,

    /// Private key for `client_cert`
    pub client_key: Option<PathBuf>,

    /// Name to verify in the server certificate (defaults to the host)
    pub tls_server_name: Option<String>,

    // -------------------------------------------------------------------------
    // Socket Configuration
    // -------------------------------------------------------------------------
    /// Socket read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

/// Where the control interface lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Local UNIX domain socket
    Unix(PathBuf),

    /// TLS over TCP
    Tcp { host: String, port: u16 },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_interface: DEFAULT_CONTROL_SOCKET.to_string(),
            server_ca: None,
            client_cert: None,
            client_key: None,
            tls_server_name: None,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve `control_interface` into a concrete endpoint
    ///
    /// Absolute paths and anything that exists on the filesystem are UNIX
    /// sockets. Everything else is `host`, `host:port` or `[v6addr]:port`.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let interface = self.control_interface.trim();
        if interface.is_empty() {
            return Err(ControlError::Config("empty control interface".to_string()));
        }

        if interface.starts_with('/') || Path::new(interface).exists() {
            return Ok(Endpoint::Unix(PathBuf::from(interface)));
        }

        let (host, port) = split_host_port(interface)?;
        Ok(Endpoint::Tcp {
            host: host.to_string(),
            port: port.unwrap_or(DEFAULT_CONTROL_PORT),
        })
    }
}

fn split_host_port(interface: &str) -> Result<(&str, Option<u16>)> {
    let parse_port = |port: &str| {
        port.parse::<u16>()
            .map_err(|_| ControlError::Config(format!("invalid port in {:?}", interface)))
    };

    if let Some(rest) = interface.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| ControlError::Config(format!("unterminated '[' in {:?}", interface)))?;
        return match tail.strip_prefix(':') {
            Some(port) => Ok((host, Some(parse_port(port)?))),
            None if tail.is_empty() => Ok((host, None)),
            None => Err(ControlError::Config(format!(
                "unexpected {:?} after address in {:?}",
                tail, interface
            ))),
        };
    }

    // More than one colon is a bare IPv6 address without a port
    match interface.matches(':').count() {
        0 => Ok((interface, None)),
        1 => {
            let (host, port) = interface.split_once(':').unwrap_or((interface, ""));
            Ok((host, Some(parse_port(port)?)))
        }
        _ => Ok((interface, None)),
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the control interface (socket path or `host[:port]`)
    pub fn control_interface(mut self, interface: impl Into<String>) -> Self {
        self.config.control_interface = interface.into();
        self
    }

    /// Set the CA bundle used to verify the server
    pub fn server_ca(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.server_ca = Some(path.into());
        self
    }

    /// Set the client certificate
    pub fn client_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.client_cert = Some(path.into());
        self
    }

    /// Set the client private key
    pub fn client_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.client_key = Some(path.into());
        self
    }

    /// Override the name verified in the server certificate
    pub fn tls_server_name(mut self, name: impl Into<String>) -> Self {
        self.config.tls_server_name = Some(name.into());
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! Connection factories
//!
//! Dial the control interface and hand back an open byte stream. Nothing
//! here knows about the protocol.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
#[cfg(unix)]
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConnection, StreamOwned};

use crate::config::{Config, Endpoint};
use crate::error::{ControlError, Result};
use super::tls;

/// TLS stream over TCP
pub type TlsStream = StreamOwned<ClientConnection, TcpStream>;

/// A bidirectional byte stream to the control interface
pub trait ControlStream: Read + Write {
    /// Shut the stream down. Called once, when the client is done.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

fn ignore_not_connected(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
        other => other,
    }
}

#[cfg(unix)]
impl ControlStream for UnixStream {
    fn close(&mut self) -> io::Result<()> {
        ignore_not_connected(self.shutdown(Shutdown::Both))
    }
}

impl ControlStream for TcpStream {
    fn close(&mut self) -> io::Result<()> {
        ignore_not_connected(self.shutdown(Shutdown::Both))
    }
}

impl ControlStream for TlsStream {
    fn close(&mut self) -> io::Result<()> {
        self.conn.send_close_notify();
        self.flush()?;
        ignore_not_connected(self.sock.shutdown(Shutdown::Both))
    }
}

impl<T: ControlStream + ?Sized> ControlStream for Box<T> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

fn timeout(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Connect to a local control socket
#[cfg(unix)]
pub fn connect_unix(path: &Path, config: &Config) -> Result<UnixStream> {
    tracing::debug!("Connecting to control socket {}", path.display());

    let stream = UnixStream::connect(path)?;
    stream.set_read_timeout(timeout(config.read_timeout_ms))?;
    stream.set_write_timeout(timeout(config.write_timeout_ms))?;
    Ok(stream)
}

/// Connect to the TLS control interface
pub fn connect_tls(host: &str, port: u16, config: &Config) -> Result<TlsStream> {
    let tls_config = tls::client_config(config)?;

    let name = config
        .tls_server_name
        .clone()
        .unwrap_or_else(|| host.to_string());
    let server_name = ServerName::try_from(name.clone())
        .map_err(|_| ControlError::InvalidServerName(name))?;
    let conn = ClientConnection::new(tls_config, server_name)?;

    tracing::debug!("Connecting to control interface {}:{}", host, port);
    let sock = TcpStream::connect((host, port))?;
    sock.set_nodelay(true)?;
    sock.set_read_timeout(timeout(config.read_timeout_ms))?;
    sock.set_write_timeout(timeout(config.write_timeout_ms))?;

    Ok(StreamOwned::new(conn, sock))
}

/// Connect to whatever `config.control_interface` points at
pub fn connect(config: &Config) -> Result<Box<dyn ControlStream + Send>> {
    match config.endpoint()? {
        #[cfg(unix)]
        Endpoint::Unix(path) => Ok(Box::new(connect_unix(&path, config)?)),
        #[cfg(not(unix))]
        Endpoint::Unix(path) => Err(ControlError::Config(format!(
            "UNIX control sockets are not supported on this platform: {}",
            path.display()
        ))),
        Endpoint::Tcp { host, port } => Ok(Box::new(connect_tls(&host, port, config)?)),
    }
}

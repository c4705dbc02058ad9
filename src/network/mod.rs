//! Network Module
//!
//! Byte streams to the control interface and line framing on top of them.
//!
//! ## Architecture
//! - Connection factories dial a UNIX socket or TLS over TCP
//! - `LineChannel` does the handshake, line I/O and reply framing
//! - No locking, no reconnects, no timeouts beyond the socket's own

mod channel;
mod tls;
mod transport;

pub use channel::LineChannel;
pub use tls::{client_config, load_certs, load_private_key};
#[cfg(unix)]
pub use transport::connect_unix;
pub use transport::{connect, connect_tls, ControlStream, TlsStream};

//! Error types for nsdctl
//!
//! Provides a unified error type for all operations. Variants are grouped by
//! where the failure originated so callers can tell a dead socket apart from
//! a confused server and from an error the server reported on purpose.

use thiserror::Error;

use crate::protocol::Verb;

/// Result type alias using ControlError
pub type Result<T> = std::result::Result<T, ControlError>;

/// Unified error type for control operations
#[derive(Debug, Error)]
pub enum ControlError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream before the reply was complete
    #[error("Connection closed after {} reply line(s)", .received.len())]
    ConnectionClosed { received: Vec<String> },

    // -------------------------------------------------------------------------
    // Connection Setup Errors
    // -------------------------------------------------------------------------
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("Invalid TLS server name: {0}")]
    InvalidServerName(String),

    #[error("Failed to load {path}: {reason}")]
    Certificate { path: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument {argument:?}: {reason}")]
    InvalidArgument { argument: String, reason: String },

    // -------------------------------------------------------------------------
    // Protocol Violations
    // -------------------------------------------------------------------------
    #[error("Unexpected reply: {0:?}")]
    UnexpectedReply(Vec<String>),

    #[error("Malformed reply line: {0:?}")]
    MalformedLine(String),

    #[error("Malformed reply, missing {field:?}: {reply:?}")]
    MissingField { field: &'static str, reply: Vec<String> },

    #[error("Expected an integer, got {0:?}")]
    InvalidInteger(String),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    #[error("Server sent error: {0}")]
    Server(String),

    #[error("Invalid cookie secret length: {hint}")]
    InvalidCookieSecretLength { hint: String },

    // -------------------------------------------------------------------------
    // Unsupported Operations
    // -------------------------------------------------------------------------
    #[error("Command {0} is not implemented")]
    Unimplemented(Verb),
}

impl ControlError {
    /// The stream failed or ended underneath us
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Io(_) | Self::ConnectionClosed { .. } | Self::Tls(_))
    }

    /// The reply did not have the shape the decoder expects
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedReply(_)
                | Self::MalformedLine(_)
                | Self::MissingField { .. }
                | Self::InvalidInteger(_)
        )
    }

    /// The server understood the command and refused it
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server(_) | Self::InvalidCookieSecretLength { .. })
    }
}

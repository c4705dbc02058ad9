//! # nsdctl
//!
//! Client for the NSD remote-control protocol:
//! - UNIX domain socket or TLS with mutual certificate authentication
//! - Version handshake and line-based command framing
//! - Per-command reply framing (most replies end in a blank line, the
//!   status and statistics replies just stop)
//! - Typed decoding of replies into results or errors
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ControlClient                           │
//! │               (one method per command verb)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Command   │          │   Reply     │
//!   │   Encoder   │          │  Decoders   │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          ▼                        │
//!   ┌─────────────────────────────────────┐
//!   │   LineChannel (handshake, framing)  │
//!   └─────────────────┬───────────────────┘
//!                     │
//!                     ▼
//!   ┌─────────────────────────────────────┐
//!   │  ControlStream (UNIX socket / TLS)  │
//!   └─────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use nsdctl::{Config, ControlClient};
//!
//! let config = Config::builder().control_interface("/var/run/nsd.sock").build();
//! let mut client = ControlClient::connect(&config)?;
//! let status = client.zone_status("example.org");
//! client.close()?;
//! println!("{}", status?);
//! # Ok::<(), nsdctl::ControlError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ControlError, Result};
pub use config::{Config, Endpoint};
pub use client::{ControlClient, SharedClient};
pub use protocol::{Command, CookieSecrets, Reply, Verb, ZoneStatus};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of nsdctl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

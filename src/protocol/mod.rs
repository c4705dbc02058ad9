//! Protocol Module
//!
//! Defines the NSD remote-control wire protocol.
//!
//! ## Protocol Format (version 1, line based)
//!
//! ### Handshake
//! ```text
//! client -> server   "NSDCT1 "          (no reply)
//! ```
//!
//! ### Request Format
//! ```text
//! <verb> <arg> <arg> ...\n
//! ```
//!
//! ### Response Format
//! ```text
//! <line>\n
//! <line>\n
//! \n                  (missing after status, stats, stats_noreset)
//! ```
//!
//! Success is the line `ok`; failures are a line starting with `error`.

mod command;
mod response;
mod codec;

pub use command::{Command, Framing, Verb, encode_command};
pub use response::{CookieSecrets, Reply, ZoneStatus};
pub use codec::{
    decode_ack, decode_add_cookie_secret, decode_cookie_secrets, decode_pid,
    decode_zone_status, parse_key_value,
};

/// Version handshake written right after connecting
pub const HEADER_VERSION: &str = "NSDCT1 ";

/// Reply line for success
pub const REPLY_OK: &str = "ok";

/// Prefix of every generic error line
pub const REPLY_ERROR: &str = "error";

/// First line of the reply to a cookie secret of the wrong length
pub const INVALID_COOKIE_SECRET_LENGTH: &str = "invalid cookie secret: invalid argument length";

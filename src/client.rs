//! Control Client
//!
//! The public façade: one method per control command.
//!
//! ## Request Cycle
//! 1. Encode the command into a single line
//! 2. Write it to the channel
//! 3. Frame the reply with the rule the command's verb calls for
//! 4. Decode the framed lines into a result or an error
//!
//! ## Concurrency
//! Requests are strictly one at a time; every method takes `&mut self`.
//! Share a client between threads through [`SharedClient`] or give each
//! worker its own connection.

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{ControlError, Result};
use crate::network::{self, ControlStream, LineChannel};
use crate::protocol::{
    decode_ack, decode_add_cookie_secret, decode_cookie_secrets, decode_pid,
    decode_zone_status, encode_command, Command, CookieSecrets, Framing, Reply, ZoneStatus,
};

/// Client for a single control connection
pub struct ControlClient<S: ControlStream> {
    channel: LineChannel<S>,
}

impl ControlClient<Box<dyn ControlStream + Send>> {
    /// Dial the configured control interface and perform the handshake
    pub fn connect(config: &Config) -> Result<Self> {
        let stream = network::connect(config)?;
        Self::open(stream)
    }
}

impl<S: ControlStream> ControlClient<S> {
    /// Wrap an already connected stream and perform the handshake
    pub fn open(stream: S) -> Result<Self> {
        Ok(Self {
            channel: LineChannel::open(stream)?,
        })
    }

    /// Close the connection
    ///
    /// Consumes the client; it cannot be used or closed again.
    pub fn close(self) -> Result<()> {
        tracing::debug!("Closing control connection");
        self.channel.close()
    }

    /// Access the underlying stream (e.g. to adjust socket timeouts)
    pub fn stream(&self) -> &S {
        self.channel.get_ref()
    }

    // =========================================================================
    // Generic Dispatch
    // =========================================================================

    /// Run any command and decode its reply
    ///
    /// Commands without a known reply format fail with
    /// [`ControlError::Unimplemented`] before anything is written.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let reply = self.request(&command)?;
        match command {
            Command::Status | Command::Stats | Command::StatsNoReset => Ok(Reply::Lines(reply)),
            Command::ServerPid => {
                let line = reply.first().map(String::as_str).unwrap_or_default();
                decode_pid(line).map(Reply::Pid)
            }
            Command::ZoneStatus { .. } => decode_zone_status(&reply).map(Reply::ZoneStatus),
            Command::AddCookieSecret { .. } => decode_add_cookie_secret(&reply).map(|()| Reply::Ok),
            Command::PrintCookieSecrets => decode_cookie_secrets(&reply).map(Reply::CookieSecrets),
            _ => decode_ack(&reply).map(|()| Reply::Ok),
        }
    }

    /// Send a command and collect its framed reply
    fn request(&mut self, command: &Command) -> Result<Vec<String>> {
        let verb = command.verb();
        let framing = command
            .framing()
            .ok_or(ControlError::Unimplemented(verb))?;
        let line = encode_command(command)?;

        // Arguments may carry secrets, only the verb is logged
        tracing::debug!("Sending control command {}", verb);
        self.channel.write_line(&line)?;

        let reply = match framing {
            Framing::BlankTerminated => self.channel.read_framed_reply()?,
            Framing::Unterminated => self.channel.read_until_blank_or_close()?,
            Framing::SingleLine => vec![self.channel.read_line()?],
        };
        tracing::trace!("Reply to {}: {} line(s)", verb, reply.len());
        Ok(reply)
    }

    fn expect_ok(&mut self, command: Command) -> Result<()> {
        let reply = self.request(&command)?;
        decode_ack(&reply)
    }

    // =========================================================================
    // Server Control
    // =========================================================================

    /// Ask the daemon to stop
    pub fn stop(&mut self) -> Result<()> {
        self.expect_ok(Command::Stop)
    }

    /// Reopen the log file, for log rotation
    pub fn log_reopen(&mut self) -> Result<()> {
        self.expect_ok(Command::LogReopen)
    }

    /// Change the log verbosity
    pub fn verbosity(&mut self, level: i32) -> Result<()> {
        self.expect_ok(Command::Verbosity { level })
    }

    /// Process id of the daemon
    pub fn server_pid(&mut self) -> Result<u32> {
        let reply = self.request(&Command::ServerPid)?;
        let line = reply.first().map(String::as_str).unwrap_or_default();
        decode_pid(line)
    }

    /// Reload zone files from disk (all zones when `zones` is empty)
    pub fn reload(&mut self, zones: &[String]) -> Result<()> {
        self.expect_ok(Command::Reload { zones: zones.to_vec() })
    }

    /// Reread the configuration file and apply patterns anew
    pub fn repattern(&mut self) -> Result<()> {
        self.expect_ok(Command::Repattern)
    }

    // =========================================================================
    // Status and Statistics
    // =========================================================================

    /// Server status, line by line as the server sent it
    pub fn status(&mut self) -> Result<Vec<String>> {
        self.request(&Command::Status)
    }

    /// Statistics, resetting the counters
    pub fn stats(&mut self) -> Result<Vec<String>> {
        self.request(&Command::Stats)
    }

    /// Statistics, leaving the counters alone
    pub fn stats_noreset(&mut self) -> Result<Vec<String>> {
        self.request(&Command::StatsNoReset)
    }

    // =========================================================================
    // Zones
    // =========================================================================

    /// Add a zone using a configured pattern
    pub fn add_zone(&mut self, zone: &str, pattern: &str) -> Result<()> {
        self.expect_ok(Command::AddZone {
            zone: zone.to_string(),
            pattern: pattern.to_string(),
        })
    }

    /// Remove a zone
    pub fn del_zone(&mut self, zone: &str) -> Result<()> {
        self.expect_ok(Command::DelZone {
            zone: zone.to_string(),
        })
    }

    /// Move a zone to another pattern
    pub fn change_zone(&mut self, zone: &str, pattern: &str) -> Result<()> {
        self.expect_ok(Command::ChangeZone {
            zone: zone.to_string(),
            pattern: pattern.to_string(),
        })
    }

    /// State of a single zone
    pub fn zone_status(&mut self, zone: &str) -> Result<ZoneStatus> {
        let reply = self.request(&Command::ZoneStatus {
            zone: zone.to_string(),
        })?;
        decode_zone_status(&reply)
    }

    /// Write zone files to disk
    pub fn write(&mut self, zones: &[String]) -> Result<()> {
        self.expect_ok(Command::Write { zones: zones.to_vec() })
    }

    /// Send NOTIFY to secondaries
    pub fn notify(&mut self, zones: &[String]) -> Result<()> {
        self.expect_ok(Command::Notify { zones: zones.to_vec() })
    }

    /// Attempt a zone transfer from the primaries
    pub fn transfer(&mut self, zones: &[String]) -> Result<()> {
        self.expect_ok(Command::Transfer { zones: zones.to_vec() })
    }

    /// Full zone transfer, ignoring the serial
    pub fn force_transfer(&mut self, zones: &[String]) -> Result<()> {
        self.expect_ok(Command::ForceTransfer { zones: zones.to_vec() })
    }

    // =========================================================================
    // TSIG Keys
    // =========================================================================

    /// Print a TSIG key, or all of them
    pub fn print_tsig(&mut self, key: Option<&str>) -> Result<()> {
        self.expect_ok(Command::PrintTsig {
            key: key.map(str::to_string),
        })
    }

    /// Change the secret of a TSIG key
    pub fn update_tsig(&mut self, key: &str, secret: &str) -> Result<()> {
        self.expect_ok(Command::UpdateTsig {
            key: key.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Add a TSIG key
    pub fn add_tsig(&mut self, key: &str, secret: &str, algorithm: Option<&str>) -> Result<()> {
        self.expect_ok(Command::AddTsig {
            key: key.to_string(),
            secret: secret.to_string(),
            algorithm: algorithm.map(str::to_string),
        })
    }

    /// Associate a TSIG key with a zone
    pub fn assoc_tsig(&mut self, zone: &str, key: &str) -> Result<()> {
        self.expect_ok(Command::AssocTsig {
            zone: zone.to_string(),
            key: key.to_string(),
        })
    }

    /// Delete a TSIG key
    pub fn del_tsig(&mut self, key: &str) -> Result<()> {
        self.expect_ok(Command::DelTsig {
            key: key.to_string(),
        })
    }

    // =========================================================================
    // Cookie Secrets
    // =========================================================================

    /// Stage a new cookie secret
    ///
    /// A secret of the wrong length fails with
    /// [`ControlError::InvalidCookieSecretLength`].
    pub fn add_cookie_secret(&mut self, secret: &str) -> Result<()> {
        let reply = self.request(&Command::AddCookieSecret {
            secret: secret.to_string(),
        })?;
        decode_add_cookie_secret(&reply)
    }

    /// Drop the staging cookie secret
    pub fn drop_cookie_secret(&mut self) -> Result<()> {
        self.expect_ok(Command::DropCookieSecret)
    }

    /// Promote the staging cookie secret to active
    pub fn activate_cookie_secret(&mut self) -> Result<()> {
        self.expect_ok(Command::ActivateCookieSecret)
    }

    /// Cookie secrets currently in use
    pub fn cookie_secrets(&mut self) -> Result<CookieSecrets> {
        let reply = self.request(&Command::PrintCookieSecrets)?;
        decode_cookie_secrets(&reply)
    }
}

// =============================================================================
// Shared Client
// =============================================================================

/// A client that can be shared between threads
///
/// The lock is held for a whole request/response cycle, so replies can
/// never interleave.
pub struct SharedClient<S: ControlStream> {
    inner: Mutex<ControlClient<S>>,
}

impl<S: ControlStream> SharedClient<S> {
    pub fn new(client: ControlClient<S>) -> Self {
        Self {
            inner: Mutex::new(client),
        }
    }

    /// Lock the client for exclusive use
    pub fn lock(&self) -> MutexGuard<'_, ControlClient<S>> {
        self.inner.lock()
    }

    /// Run `f` with the client locked
    pub fn with<T>(&self, f: impl FnOnce(&mut ControlClient<S>) -> Result<T>) -> Result<T> {
        let mut client = self.inner.lock();
        f(&mut client)
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<()> {
        self.inner.into_inner().close()
    }
}

//! Command definitions
//!
//! Every control command the server knows, the verb it is sent under and the
//! framing rule its reply follows.

use std::fmt;

use crate::error::{ControlError, Result};

/// Command verbs as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Stop,
    Reload,
    Repattern,
    LogReopen,
    Status,
    Stats,
    StatsNoReset,
    AddZone,
    DelZone,
    ChangeZone,
    Write,
    Notify,
    Transfer,
    ForceTransfer,
    ZoneStatus,
    ServerPid,
    Verbosity,
    PrintTsig,
    UpdateTsig,
    AddTsig,
    AssocTsig,
    DelTsig,
    AddCookieSecret,
    DropCookieSecret,
    ActivateCookieSecret,
    PrintCookieSecrets,
}

impl Verb {
    /// The keyword sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Stop => "stop",
            Verb::Reload => "reload",
            Verb::Repattern => "repattern",
            Verb::LogReopen => "log_reopen",
            Verb::Status => "status",
            Verb::Stats => "stats",
            Verb::StatsNoReset => "stats_noreset",
            Verb::AddZone => "addzone",
            Verb::DelZone => "delzone",
            Verb::ChangeZone => "changezone",
            Verb::Write => "write",
            Verb::Notify => "notify",
            Verb::Transfer => "transfer",
            Verb::ForceTransfer => "force_transfer",
            Verb::ZoneStatus => "zonestatus",
            Verb::ServerPid => "serverpid",
            Verb::Verbosity => "verbosity",
            Verb::PrintTsig => "print_tsig",
            Verb::UpdateTsig => "update_tsig",
            Verb::AddTsig => "add_tsig",
            Verb::AssocTsig => "assoc_tsig",
            Verb::DelTsig => "del_tsig",
            Verb::AddCookieSecret => "add_cookie_secret",
            Verb::DropCookieSecret => "drop_cookie_secret",
            Verb::ActivateCookieSecret => "activate_cookie_secret",
            Verb::PrintCookieSecrets => "print_cookie_secrets",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the end of a reply is recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Lines up to an empty line; EOF first is an error
    BlankTerminated,

    /// Lines up to an empty line or EOF, whichever comes first
    Unterminated,

    /// Exactly one line, no terminator
    SingleLine,
}

/// A control command with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stop the daemon
    Stop,

    /// Reload zone files from disk (all zones when empty)
    Reload { zones: Vec<String> },

    /// Reread the configuration and apply patterns anew
    Repattern,

    /// Reopen the log file
    LogReopen,

    /// Server status
    Status,

    /// Statistics, resetting the counters
    Stats,

    /// Statistics, leaving the counters alone
    StatsNoReset,

    /// Add a zone using a configured pattern
    AddZone { zone: String, pattern: String },

    /// Remove a zone
    DelZone { zone: String },

    /// Move a zone to another pattern
    ChangeZone { zone: String, pattern: String },

    /// Write zone files to disk
    Write { zones: Vec<String> },

    /// Send NOTIFY to secondaries
    Notify { zones: Vec<String> },

    /// Attempt a zone transfer
    Transfer { zones: Vec<String> },

    /// Full zone transfer, ignoring the serial
    ForceTransfer { zones: Vec<String> },

    /// State of a single zone
    ZoneStatus { zone: String },

    /// Process id of the daemon
    ServerPid,

    /// Change the log verbosity
    Verbosity { level: i32 },

    /// Print a TSIG key (all keys when `None`)
    PrintTsig { key: Option<String> },

    /// Change the secret of a TSIG key
    UpdateTsig { key: String, secret: String },

    /// Add a TSIG key
    AddTsig { key: String, secret: String, algorithm: Option<String> },

    /// Associate a TSIG key with a zone
    AssocTsig { zone: String, key: String },

    /// Delete a TSIG key
    DelTsig { key: String },

    /// Stage a new cookie secret
    AddCookieSecret { secret: String },

    /// Drop the staging cookie secret
    DropCookieSecret,

    /// Promote the staging cookie secret to active
    ActivateCookieSecret,

    /// Show the cookie secrets in use
    PrintCookieSecrets,
}

impl Command {
    /// The verb this command is sent under
    pub fn verb(&self) -> Verb {
        match self {
            Command::Stop => Verb::Stop,
            Command::Reload { .. } => Verb::Reload,
            Command::Repattern => Verb::Repattern,
            Command::LogReopen => Verb::LogReopen,
            Command::Status => Verb::Status,
            Command::Stats => Verb::Stats,
            Command::StatsNoReset => Verb::StatsNoReset,
            Command::AddZone { .. } => Verb::AddZone,
            Command::DelZone { .. } => Verb::DelZone,
            Command::ChangeZone { .. } => Verb::ChangeZone,
            Command::Write { .. } => Verb::Write,
            Command::Notify { .. } => Verb::Notify,
            Command::Transfer { .. } => Verb::Transfer,
            Command::ForceTransfer { .. } => Verb::ForceTransfer,
            Command::ZoneStatus { .. } => Verb::ZoneStatus,
            Command::ServerPid => Verb::ServerPid,
            Command::Verbosity { .. } => Verb::Verbosity,
            Command::PrintTsig { .. } => Verb::PrintTsig,
            Command::UpdateTsig { .. } => Verb::UpdateTsig,
            Command::AddTsig { .. } => Verb::AddTsig,
            Command::AssocTsig { .. } => Verb::AssocTsig,
            Command::DelTsig { .. } => Verb::DelTsig,
            Command::AddCookieSecret { .. } => Verb::AddCookieSecret,
            Command::DropCookieSecret => Verb::DropCookieSecret,
            Command::ActivateCookieSecret => Verb::ActivateCookieSecret,
            Command::PrintCookieSecrets => Verb::PrintCookieSecrets,
        }
    }

    /// Framing of the reply, or `None` while the reply format is not pinned down
    ///
    /// `status`, `stats` and `stats_noreset` never send the closing blank
    /// line, so they must tolerate the server simply stopping.
    pub fn framing(&self) -> Option<Framing> {
        match self {
            Command::Stop
            | Command::LogReopen
            | Command::AddZone { .. }
            | Command::DelZone { .. }
            | Command::ChangeZone { .. }
            | Command::Verbosity { .. }
            | Command::ZoneStatus { .. }
            | Command::AddCookieSecret { .. }
            | Command::DropCookieSecret
            | Command::ActivateCookieSecret
            | Command::PrintCookieSecrets => Some(Framing::BlankTerminated),

            Command::Status | Command::Stats | Command::StatsNoReset => {
                Some(Framing::Unterminated)
            }

            Command::ServerPid => Some(Framing::SingleLine),

            Command::Reload { .. }
            | Command::Repattern
            | Command::Write { .. }
            | Command::Notify { .. }
            | Command::Transfer { .. }
            | Command::ForceTransfer { .. }
            | Command::PrintTsig { .. }
            | Command::UpdateTsig { .. }
            | Command::AddTsig { .. }
            | Command::AssocTsig { .. }
            | Command::DelTsig { .. } => None,
        }
    }

    /// Whether the client knows how to read the reply to this command
    pub fn is_implemented(&self) -> bool {
        self.framing().is_some()
    }

    /// Arguments in wire order
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Command::Stop
            | Command::Repattern
            | Command::LogReopen
            | Command::Status
            | Command::Stats
            | Command::StatsNoReset
            | Command::ServerPid
            | Command::DropCookieSecret
            | Command::ActivateCookieSecret
            | Command::PrintCookieSecrets => Vec::new(),

            Command::Reload { zones }
            | Command::Write { zones }
            | Command::Notify { zones }
            | Command::Transfer { zones }
            | Command::ForceTransfer { zones } => zones.clone(),

            Command::AddZone { zone, pattern } | Command::ChangeZone { zone, pattern } => {
                vec![zone.clone(), pattern.clone()]
            }
            Command::DelZone { zone } | Command::ZoneStatus { zone } => vec![zone.clone()],
            Command::Verbosity { level } => vec![level.to_string()],
            Command::PrintTsig { key } => key.iter().cloned().collect(),
            Command::UpdateTsig { key, secret } => vec![key.clone(), secret.clone()],
            Command::AddTsig { key, secret, algorithm } => {
                let mut args = vec![key.clone(), secret.clone()];
                args.extend(algorithm.iter().cloned());
                args
            }
            Command::AssocTsig { zone, key } => vec![zone.clone(), key.clone()],
            Command::DelTsig { key } => vec![key.clone()],
            Command::AddCookieSecret { secret } => vec![secret.clone()],
        }
    }
}

/// Render a command as a single wire line, without the terminator
///
/// Arguments are passed through untouched; one containing a newline would
/// split the command in two and is rejected before anything is written.
pub fn encode_command(command: &Command) -> Result<String> {
    let verb = command.verb();
    let arguments = command.arguments();

    let mut line = String::from(verb.as_str());
    for argument in arguments {
        if argument.contains('\n') {
            return Err(ControlError::InvalidArgument {
                argument,
                reason: format!("{} arguments may not contain a newline", verb),
            });
        }
        line.push(' ');
        line.push_str(&argument);
    }

    Ok(line)
}

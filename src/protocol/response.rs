//! Response definitions
//!
//! Structured results decoded from server replies.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Status of a single zone as reported by `zonestatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneStatus {
    /// Zone name, exactly as the server printed it
    pub zone: String,

    /// Zone state (`primary`, `ok`, `refreshing`, ...)
    pub state: String,

    /// Every other attribute the server reported
    pub attributes: BTreeMap<String, String>,
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "zone:\t{}", self.zone)?;
        writeln!(f, "\tstate: {}", self.state)?;
        for (key, value) in &self.attributes {
            writeln!(f, "\t{}: {}", key, value)?;
        }
        Ok(())
    }
}

/// Cookie secrets as reported by `print_cookie_secrets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieSecrets {
    /// Where the secrets come from (file path or `random generated`)
    pub source: String,

    /// Secret currently used to create cookies
    pub active: String,

    /// Secret staged for the next rollover
    pub staging: Option<String>,
}

impl fmt::Display for CookieSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source : {}", self.source)?;
        writeln!(f, "active : {}", self.active)?;
        if let Some(staging) = &self.staging {
            writeln!(f, "staging: {}", staging)?;
        }
        Ok(())
    }
}

/// Decoded reply to any implemented command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Reply {
    /// Plain `ok`
    Ok,

    /// Raw lines (`status`, `stats`, `stats_noreset`)
    Lines(Vec<String>),

    /// Process id (`serverpid`)
    Pid(u32),

    /// `zonestatus`
    ZoneStatus(ZoneStatus),

    /// `print_cookie_secrets`
    CookieSecrets(CookieSecrets),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => writeln!(f, "ok"),
            Reply::Lines(lines) => {
                for line in lines {
                    writeln!(f, "{}", line)?;
                }
                Ok(())
            }
            Reply::Pid(pid) => writeln!(f, "{}", pid),
            Reply::ZoneStatus(status) => fmt::Display::fmt(status, f),
            Reply::CookieSecrets(secrets) => fmt::Display::fmt(secrets, f),
        }
    }
}

//! Reply decoders
//!
//! Pure functions from an already framed reply (the lines before the
//! terminating blank line) to a typed result. Decoders never see the
//! connection, so the same captured reply always decodes the same way.
//!
//! ## Reply Shapes
//! ```text
//! ok                                   acknowledgement
//! error <explanation>                  server error
//! 4242                                 serverpid (single unframed line)
//! zone:  example.org                   zonestatus / print_cookie_secrets
//!     state: refreshing                  (key: value block)
//! invalid cookie secret: invalid ...   add_cookie_secret length error
//! please provide a 128bit hex ...        (two lines)
//! ```

use crate::error::{ControlError, Result};
use super::{CookieSecrets, ZoneStatus, INVALID_COOKIE_SECRET_LENGTH, REPLY_ERROR, REPLY_OK};

// =============================================================================
// Acknowledgement
// =============================================================================

/// Decode a reply that is a single `ok` on success
///
/// Any other single line is taken as the server's error message. A reply
/// with no lines or several lines does not fit the protocol at all.
pub fn decode_ack(reply: &[String]) -> Result<()> {
    match reply {
        [line] if line == REPLY_OK => Ok(()),
        [line] => Err(ControlError::Server(line.clone())),
        _ => Err(ControlError::UnexpectedReply(reply.to_vec())),
    }
}

/// Decode the reply to `add_cookie_secret`
///
/// A secret of the wrong length is answered with a two line explanation
/// instead of an `error` line.
pub fn decode_add_cookie_secret(reply: &[String]) -> Result<()> {
    match reply {
        [first, hint] if first == INVALID_COOKIE_SECRET_LENGTH => {
            Err(ControlError::InvalidCookieSecretLength { hint: hint.clone() })
        }
        [line] if line == REPLY_OK => Ok(()),
        [line] if line.starts_with(REPLY_ERROR) => Err(ControlError::Server(line.clone())),
        _ => Err(ControlError::UnexpectedReply(reply.to_vec())),
    }
}

// =============================================================================
// Integer
// =============================================================================

/// Decode the single line sent in reply to `serverpid`
pub fn decode_pid(line: &str) -> Result<u32> {
    if line.starts_with(REPLY_ERROR) {
        return Err(ControlError::Server(line.to_string()));
    }

    line.parse::<u32>()
        .map_err(|_| ControlError::InvalidInteger(line.to_string()))
}

// =============================================================================
// Key-Value Blocks
// =============================================================================

/// Split a `key: value` line
///
/// Leading whitespace is ignored and the key runs up to the first colon or
/// whitespace. At least one whitespace character must follow the colon.
/// Only ASCII whitespace separates fields.
/// One layer of double quotes around the value is removed.
pub fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let line = trim_ascii_start(line);
    let key_len = line
        .find(|c: char| c == ':' || c.is_ascii_whitespace())
        .unwrap_or(line.len());
    if key_len == 0 {
        return None;
    }

    let (key, rest) = line.split_at(key_len);
    let after_colon = trim_ascii_start(rest).strip_prefix(':')?;
    let value = trim_ascii_start(after_colon);
    if value.len() == after_colon.len() {
        return None;
    }

    let value = value.strip_prefix('"').unwrap_or(value);
    if value.is_empty() || value.starts_with('"') {
        return None;
    }
    let value = value.strip_suffix('"').unwrap_or(value);

    Some((key, value))
}

fn trim_ascii_start(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_whitespace())
}

/// Decode the reply to `zonestatus`
///
/// `zone` and `state` are required; every other key lands in `attributes`.
/// Unlike the cookie decoder this one is strict about line shape.
pub fn decode_zone_status(reply: &[String]) -> Result<ZoneStatus> {
    let mut zone = None;
    let mut state = None;
    let mut attributes = std::collections::BTreeMap::new();

    for line in reply {
        if line.starts_with(REPLY_ERROR) {
            return Err(ControlError::Server(reply.join("\n")));
        }

        let (key, value) =
            parse_key_value(line).ok_or_else(|| ControlError::MalformedLine(line.clone()))?;

        match key {
            "zone" => zone = Some(value.to_string()),
            "state" => state = Some(value.to_string()),
            _ => {
                attributes.insert(key.to_string(), value.to_string());
            }
        }
    }

    let zone = zone.ok_or_else(|| ControlError::MissingField {
        field: "zone",
        reply: reply.to_vec(),
    })?;
    let state = state.ok_or_else(|| ControlError::MissingField {
        field: "state",
        reply: reply.to_vec(),
    })?;

    Ok(ZoneStatus {
        zone,
        state,
        attributes,
    })
}

/// Decode the reply to `print_cookie_secrets`
///
/// Servers differ in what they print after the secrets (some append help
/// text), so the scan stops quietly at the first line that is not a
/// `key: value` pair. `source` and `active` must have been seen by then.
pub fn decode_cookie_secrets(reply: &[String]) -> Result<CookieSecrets> {
    let mut source = None;
    let mut active = None;
    let mut staging = None;

    for line in reply {
        if line.starts_with(REPLY_ERROR) {
            return Err(ControlError::Server(reply.join("\n")));
        }

        let Some((key, value)) = parse_key_value(line) else {
            break;
        };

        match key {
            "source" => source = Some(value.to_string()),
            "active" => active = Some(value.to_string()),
            "staging" => staging = Some(value.to_string()),
            _ => {}
        }
    }

    let source = source.ok_or_else(|| ControlError::MissingField {
        field: "source",
        reply: reply.to_vec(),
    })?;
    let active = active.ok_or_else(|| ControlError::MissingField {
        field: "active",
        reply: reply.to_vec(),
    })?;

    Ok(CookieSecrets {
        source,
        active,
        staging,
    })
}

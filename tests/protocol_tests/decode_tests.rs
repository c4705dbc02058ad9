//! Decode Tests
//!
//! Tests for the reply decoders. Replies are given as already framed lines,
//! exactly as captured from a server.

use std::collections::BTreeMap;

use nsdctl::protocol::{
    decode_ack, decode_add_cookie_secret, decode_cookie_secrets, decode_pid,
    decode_zone_status, parse_key_value,
};
use nsdctl::{ControlError, CookieSecrets, ZoneStatus};

// =============================================================================
// Helper Functions
// =============================================================================

fn reply(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

fn attributes(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Acknowledgement Tests
// =============================================================================

#[test]
fn test_ack_ok() {
    assert!(decode_ack(&reply(&["ok"])).is_ok());
}

#[test]
fn test_ack_server_error() {
    let err = decode_ack(&reply(&["error: missing argument (cookie_secret)"])).unwrap_err();

    match err {
        ControlError::Server(message) => {
            assert_eq!(message, "error: missing argument (cookie_secret)");
        }
        other => panic!("Expected Server error, got {:?}", other),
    }
}

#[test]
fn test_ack_other_single_line_is_server_error() {
    let err = decode_ack(&reply(&["asdf"])).unwrap_err();
    assert!(err.is_server_error());
    assert!(!err.is_protocol_violation());
}

#[test]
fn test_ack_empty_reply_is_protocol_violation() {
    let err = decode_ack(&[]).unwrap_err();
    assert!(matches!(err, ControlError::UnexpectedReply(ref lines) if lines.is_empty()));
    assert!(err.is_protocol_violation());
}

#[test]
fn test_ack_multiple_lines_is_protocol_violation() {
    let err = decode_ack(&reply(&["ok", "ok"])).unwrap_err();

    match err {
        ControlError::UnexpectedReply(lines) => assert_eq!(lines, reply(&["ok", "ok"])),
        other => panic!("Expected UnexpectedReply, got {:?}", other),
    }
}

// =============================================================================
// Integer Tests
// =============================================================================

#[test]
fn test_pid() {
    assert_eq!(decode_pid("4242").unwrap(), 4242);
}

#[test]
fn test_pid_not_a_number() {
    let err = decode_pid("ok").unwrap_err();
    assert!(matches!(err, ControlError::InvalidInteger(ref line) if line == "ok"));
    assert!(err.is_protocol_violation());
}

#[test]
fn test_pid_empty_and_negative() {
    assert!(matches!(decode_pid(""), Err(ControlError::InvalidInteger(_))));
    assert!(matches!(decode_pid("-1"), Err(ControlError::InvalidInteger(_))));
}

#[test]
fn test_pid_server_error() {
    assert!(matches!(
        decode_pid("error could not get pid"),
        Err(ControlError::Server(_))
    ));
}

// =============================================================================
// Key-Value Line Tests
// =============================================================================

#[test]
fn test_key_value_shapes() {
    assert_eq!(parse_key_value("zone:\texample.org"), Some(("zone", "example.org")));
    assert_eq!(parse_key_value("\tstate: refreshing"), Some(("state", "refreshing")));
    assert_eq!(
        parse_key_value("source : \"/var/db/nsd/cookiesecrets.txt\""),
        Some(("source", "/var/db/nsd/cookiesecrets.txt"))
    );
    assert_eq!(
        parse_key_value("wait: \"99 sec between attempts\""),
        Some(("wait", "99 sec between attempts"))
    );
    assert_eq!(
        parse_key_value("source : random generated"),
        Some(("source", "random generated"))
    );
}

#[test]
fn test_key_value_rejects() {
    // No whitespace after the colon
    assert_eq!(parse_key_value("zone:example.org"), None);
    // No colon at all
    assert_eq!(parse_key_value("please provide a 128bit hex encoded secret"), None);
    // No key
    assert_eq!(parse_key_value(": value"), None);
    // No value
    assert_eq!(parse_key_value("zone: "), None);
    assert_eq!(parse_key_value(""), None);
}

#[test]
fn test_key_value_unicode_whitespace_is_not_a_separator() {
    // No-break space after the colon
    assert_eq!(parse_key_value("zone:\u{a0}example.org"), None);
    // Ideographic space before the key stays part of it
    assert_eq!(
        parse_key_value("\u{3000}zone: example.org"),
        Some(("\u{3000}zone", "example.org"))
    );
}

// =============================================================================
// Zone Status Tests
// =============================================================================

#[test]
fn test_zone_status_refreshing_secondary() {
    let lines = reply(&[
        "zone:\texample.org",
        "state: refreshing",
        "served-serial: none",
        "commit-serial: none",
        "wait: \"99 sec between attempts\"",
    ]);

    let status = decode_zone_status(&lines).unwrap();

    assert_eq!(
        status,
        ZoneStatus {
            zone: "example.org".to_string(),
            state: "refreshing".to_string(),
            attributes: attributes(&[
                ("served-serial", "none"),
                ("commit-serial", "none"),
                ("wait", "99 sec between attempts"),
            ]),
        }
    );
}

#[test]
fn test_zone_status_indented_lines() {
    let lines = reply(&["zone:\texample.dk.", "\tpattern: replica", "\tstate: primary"]);

    let status = decode_zone_status(&lines).unwrap();

    assert_eq!(status.zone, "example.dk.");
    assert_eq!(status.state, "primary");
    assert_eq!(status.attributes, attributes(&[("pattern", "replica")]));
}

#[test]
fn test_zone_status_no_attributes() {
    let lines = reply(&["zone:\texample.com", "\tstate: primary"]);

    let status = decode_zone_status(&lines).unwrap();

    assert_eq!(status.zone, "example.com");
    assert!(status.attributes.is_empty());
}

#[test]
fn test_zone_status_empty_reply() {
    let err = decode_zone_status(&[]).unwrap_err();
    assert!(matches!(err, ControlError::MissingField { field: "zone", .. }));
    assert!(err.is_protocol_violation());
}

#[test]
fn test_zone_status_missing_state() {
    let err = decode_zone_status(&reply(&["zone:\texample.com"])).unwrap_err();
    assert!(matches!(err, ControlError::MissingField { field: "state", .. }));
}

#[test]
fn test_zone_status_server_error() {
    let lines = reply(&["error zone example.net not configured"]);

    match decode_zone_status(&lines).unwrap_err() {
        ControlError::Server(message) => {
            assert_eq!(message, "error zone example.net not configured");
        }
        other => panic!("Expected Server error, got {:?}", other),
    }
}

#[test]
fn test_zone_status_malformed_line() {
    let lines = reply(&["zone:\texample.com", "garbage", "state: primary"]);

    match decode_zone_status(&lines).unwrap_err() {
        ControlError::MalformedLine(line) => assert_eq!(line, "garbage"),
        other => panic!("Expected MalformedLine, got {:?}", other),
    }
}

// =============================================================================
// Cookie Secrets Tests
// =============================================================================

#[test]
fn test_cookie_secrets_no_staging() {
    let lines = reply(&[
        "source : \"/var/db/nsd/cookiesecrets.txt\"",
        "active : cd0636b6a5f8b9b1004b2450155ffca1",
    ]);

    let secrets = decode_cookie_secrets(&lines).unwrap();

    assert_eq!(
        secrets,
        CookieSecrets {
            source: "/var/db/nsd/cookiesecrets.txt".to_string(),
            active: "cd0636b6a5f8b9b1004b2450155ffca1".to_string(),
            staging: None,
        }
    );
}

#[test]
fn test_cookie_secrets_with_staging() {
    let lines = reply(&[
        "source : \"/var/db/nsd/cookiesecrets.txt\"",
        "active : 4f08019819f6b945e03b6e91aafa0e8e",
        "staging: cd0636b6a5f8b9b1004b2450155ffca1",
    ]);

    let secrets = decode_cookie_secrets(&lines).unwrap();

    assert_eq!(secrets.active, "4f08019819f6b945e03b6e91aafa0e8e");
    assert_eq!(
        secrets.staging.as_deref(),
        Some("cd0636b6a5f8b9b1004b2450155ffca1")
    );
}

#[test]
fn test_cookie_secrets_random_source() {
    let lines = reply(&[
        "source : random generated",
        "active : 8234dff32ace962428c8da3d22da0d49",
    ]);

    let secrets = decode_cookie_secrets(&lines).unwrap();

    assert_eq!(secrets.source, "random generated");
    assert_eq!(secrets.staging, None);
}

#[test]
fn test_cookie_secrets_stops_at_trailing_text() {
    let lines = reply(&[
        "source : random generated",
        "active : 8234dff32ace962428c8da3d22da0d49",
        "use add_cookie_secret to stage a new secret",
        "staging: this line is never reached",
    ]);

    let secrets = decode_cookie_secrets(&lines).unwrap();

    assert_eq!(secrets.staging, None);
}

#[test]
fn test_cookie_secrets_server_error() {
    let lines = reply(&["error: cookies are disabled"]);
    assert!(matches!(
        decode_cookie_secrets(&lines),
        Err(ControlError::Server(_))
    ));
}

#[test]
fn test_cookie_secrets_missing_active() {
    let lines = reply(&["source : random generated"]);
    assert!(matches!(
        decode_cookie_secrets(&lines),
        Err(ControlError::MissingField { field: "active", .. })
    ));
}

// =============================================================================
// Add Cookie Secret Tests
// =============================================================================

#[test]
fn test_add_cookie_secret_ok() {
    assert!(decode_add_cookie_secret(&reply(&["ok"])).is_ok());
}

#[test]
fn test_add_cookie_secret_wrong_length() {
    let lines = reply(&[
        "invalid cookie secret: invalid argument length",
        "please provide a 128bit hex encoded secret",
    ]);

    match decode_add_cookie_secret(&lines).unwrap_err() {
        ControlError::InvalidCookieSecretLength { hint } => {
            assert_eq!(hint, "please provide a 128bit hex encoded secret");
        }
        other => panic!("Expected InvalidCookieSecretLength, got {:?}", other),
    }
}

#[test]
fn test_add_cookie_secret_missing_argument() {
    let lines = reply(&["error: missing argument (cookie_secret)"]);

    let err = decode_add_cookie_secret(&lines).unwrap_err();

    assert!(matches!(err, ControlError::Server(_)));
    assert!(err.is_server_error());
}

#[test]
fn test_add_cookie_secret_unexpected() {
    assert!(matches!(
        decode_add_cookie_secret(&reply(&["maybe"])),
        Err(ControlError::UnexpectedReply(_))
    ));
    assert!(matches!(
        decode_add_cookie_secret(&[]),
        Err(ControlError::UnexpectedReply(_))
    ));
    assert!(matches!(
        decode_add_cookie_secret(&reply(&["error: one", "error: two"])),
        Err(ControlError::UnexpectedReply(_))
    ));
}

// =============================================================================
// Purity Tests
// =============================================================================

#[test]
fn test_decoding_twice_gives_same_result() {
    let zone = reply(&["zone:\texample.org", "state: ok", "served-serial: \"2024010101\""]);
    assert_eq!(
        decode_zone_status(&zone).unwrap(),
        decode_zone_status(&zone).unwrap()
    );

    let cookies = reply(&["source : random generated", "active : 00"]);
    assert_eq!(
        decode_cookie_secrets(&cookies).unwrap(),
        decode_cookie_secrets(&cookies).unwrap()
    );
}

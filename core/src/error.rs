//! Error types for the request engine.
//!
//! # Design
//! `DispatchError` is the failure half of every `Dispatcher::send` call. Each
//! variant maps to one cause a user can act on, and its `Display` output is
//! the message shown verbatim by the desktop shell. Underlying causes from the
//! JSON parser or the transport are truncated to `MAX_CAUSE_CHARS` so a hostile
//! server cannot blow up the status bar or the log.
//!
//! `TransportError` is the narrower vocabulary a `Transport` speaks; the
//! dispatcher widens it into `DispatchError` together with the configured
//! timeout.

use thiserror::Error;

/// Upper bound on the length of an embedded cause, in characters.
pub const MAX_CAUSE_CHARS: usize = 512;

/// Errors returned by `Dispatcher::send` and `Dispatcher::prepare`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The URL failed the safety check. No network call was made.
    #[error("Invalid or unsafe URL. Only http:// and https:// are allowed.")]
    InvalidUrl,

    /// The request body was not valid JSON. No network call was made.
    #[error("Invalid JSON in request body: {0}")]
    InvalidJson(String),

    /// The exchange did not complete within the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A connection to the host could not be established (DNS, refused,
    /// unreachable).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other transport failure (TLS, malformed response, ...).
    #[error("Request failed: {0}")]
    Transport(String),
}

impl DispatchError {
    /// True when the error was raised before any network I/O happened.
    pub fn is_pre_flight(&self) -> bool {
        matches!(self, DispatchError::InvalidUrl | DispatchError::InvalidJson(_))
    }

    pub(crate) fn from_transport(err: TransportError, timeout_secs: u64) -> Self {
        match err {
            TransportError::Timeout => DispatchError::Timeout(timeout_secs),
            TransportError::Connect(cause) => DispatchError::Connection(bounded(&cause)),
            TransportError::Other(cause) => DispatchError::Transport(bounded(&cause)),
        }
    }
}

/// Failures reported by a `Transport` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out")]
    Timeout,

    #[error("connect: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Return at most `max` characters of `s`, never splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub(crate) fn bounded(cause: &str) -> String {
    truncate_chars(cause, MAX_CAUSE_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_what_the_shell_displays() {
        assert_eq!(
            DispatchError::InvalidUrl.to_string(),
            "Invalid or unsafe URL. Only http:// and https:// are allowed."
        );
        assert_eq!(
            DispatchError::Timeout(7).to_string(),
            "Request timed out after 7 seconds"
        );
        assert_eq!(
            DispatchError::Connection("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
    }

    #[test]
    fn transport_timeout_carries_configured_value() {
        let err = DispatchError::from_transport(TransportError::Timeout, 3);
        assert_eq!(err, DispatchError::Timeout(3));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn long_causes_are_truncated() {
        let cause = "x".repeat(MAX_CAUSE_CHARS * 4);
        let err = DispatchError::from_transport(TransportError::Other(cause), 10);
        match err {
            DispatchError::Transport(msg) => assert_eq!(msg.chars().count(), MAX_CAUSE_CHARS),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn pre_flight_errors_are_flagged() {
        assert!(DispatchError::InvalidUrl.is_pre_flight());
        assert!(DispatchError::InvalidJson("eof".to_string()).is_pre_flight());
        assert!(!DispatchError::Timeout(10).is_pre_flight());
    }
}

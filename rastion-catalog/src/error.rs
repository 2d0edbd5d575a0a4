//! Error handling for hub API operations.
//!
//! Every failure mode funnels into [`HubClientError`], whose `Display` is a
//! message suitable for showing to a user as-is. Nothing here retries;
//! each failed call surfaces once and the client remains usable.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Common error type for hub API operations.
#[derive(Debug, Error)]
pub enum HubClientError {
    /// The request exceeded the configured time bound.
    #[error("Request timed out after {} seconds.", .bound.as_secs())]
    Timeout { bound: Duration },

    /// The service could not be reached at all (connection refused, DNS
    /// failure, broken transport).
    #[error(
        "Could not reach the hub at {base_url}. Check that the backend is running and reachable."
    )]
    Unreachable { base_url: String },

    /// The service answered with a non-2xx status. `message` is the body's
    /// `detail`/`message` field when one was present, otherwise a fixed
    /// per-operation fallback.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("{message}")]
    Malformed { message: String },

    /// The request was rejected before it was sent.
    #[error("{0}")]
    InvalidRequest(String),

    /// Client construction failures and other local errors.
    #[error("{0}")]
    Other(String),
}

impl HubClientError {
    /// Status code of the response, for callers that branch on it.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HubClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Map a non-2xx response into [`HubClientError::Status`], preferring a
/// `detail` or `message` string from the body over `fallback`.
///
/// Body read or parse failures never propagate past this point.
pub(crate) async fn error_from_response(
    response: reqwest::Response,
    fallback: &str,
) -> HubClientError {
    let status = response.status();
    let message = match response.bytes().await {
        Ok(body) => detail_message(&body).unwrap_or_else(|| fallback.to_string()),
        Err(_) => fallback.to_string(),
    };
    HubClientError::Status { status, message }
}

/// Pull a human-readable `detail` or `message` string out of a JSON error
/// body, if one is present and non-blank.
pub(crate) fn detail_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_field_is_preferred() {
        let body = br#"{"detail": "not found", "message": "ignored"}"#;
        assert_eq!(detail_message(body).as_deref(), Some("not found"));
    }

    #[test]
    fn message_field_is_a_fallback() {
        let body = br#"{"message": "server is on fire"}"#;
        assert_eq!(detail_message(body).as_deref(), Some("server is on fire"));
    }

    #[test]
    fn non_string_detail_is_ignored() {
        let body = br#"{"detail": {"nested": true}, "message": "usable"}"#;
        assert_eq!(detail_message(body).as_deref(), Some("usable"));
    }

    #[test]
    fn unparsable_or_blank_bodies_yield_nothing() {
        assert_eq!(detail_message(b"<html>garbage</html>"), None);
        assert_eq!(detail_message(br#"{"detail": "   "}"#), None);
        assert_eq!(detail_message(br#"{"other": "field"}"#), None);
    }

    #[test]
    fn timeout_message_names_the_bound_in_seconds() {
        let err = HubClientError::Timeout {
            bound: Duration::from_millis(25_000),
        };
        assert_eq!(err.to_string(), "Request timed out after 25 seconds.");
    }
}

//! Orchestration failure taxonomy.
//!
//! Every orchestration entry point resolves to either a value or one of
//! these variants. Remote faults are captured and classified here rather
//! than escaping as transport errors, so a caller can always tell a
//! rejected submission from a timeout from a partially failed batch.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use fleetline::domain::error::OrchestrationError;
//!
//! let err = OrchestrationError::Timeout { after: Duration::from_secs(10) };
//! assert_eq!(err.status_code(), 504);
//! assert!(err.is_timeout());
//! ```

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::provisioning::ItemFailure;

/// Errors produced by the work poller, provisioning workflows and the
/// dashboard aggregator.
#[derive(Error, Debug, Clone)]
pub enum OrchestrationError {
    /// The manager refused the submission outright.
    #[error("remote manager rejected the request: {message}")]
    RemoteRejected {
        /// Error payload rendered as text.
        message: String,
    },

    /// The deadline elapsed before the remote side reported completion.
    ///
    /// The remote operation is not cancelled; its outcome is unknown.
    #[error("manager request timed out after {after:?}")]
    Timeout {
        /// Deadline that elapsed.
        after: Duration,
    },

    /// The remote operation completed but its payload carries an error.
    #[error("remote operation failed: {message}")]
    RemoteOperationFailed {
        /// Status code reported by the remote side, if any.
        code: Option<u16>,
        /// Human-readable message.
        message: String,
        /// The raw error payload.
        payload: Value,
    },

    /// A step could not run because something it needs is absent.
    #[error("dependency missing: {what}")]
    DependencyMissing {
        /// What was missing.
        what: String,
    },

    /// Some items of a bulk operation failed.
    #[error("failed to process {count} item(s)")]
    PartialBatchFailure {
        /// Number of failed items.
        count: usize,
        /// One entry per failed item.
        failures: Vec<ItemFailure>,
    },

    /// Caller input was rejected before any network call.
    #[error("invalid input: {reason}")]
    InputInvalid {
        /// Why the input was rejected.
        reason: String,
    },

    /// A remote reply could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The remote endpoint could not be reached.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl OrchestrationError {
    /// Build a [`RemoteOperationFailed`](Self::RemoteOperationFailed) from a
    /// payload carrying `code` and/or `message` fields.
    #[must_use]
    pub fn from_payload(payload: Value) -> Self {
        let code = payload
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok());
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| payload.to_string(), str::to_string);
        Self::RemoteOperationFailed {
            code,
            message,
            payload,
        }
    }

    /// HTTP-style status code for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::RemoteRejected { .. } | Self::MalformedResponse(_) => 502,
            Self::Timeout { .. } => 504,
            Self::RemoteOperationFailed { code, .. } => code.unwrap_or(500),
            Self::DependencyMissing { .. } => 400,
            Self::PartialBatchFailure { .. } | Self::InputInvalid { .. } => 500,
            Self::Transport(_) => 503,
        }
    }

    /// Whether this failure is a client-side deadline expiry.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<crate::error::Error> for OrchestrationError {
    fn from(err: crate::error::Error) -> Self {
        match err {
            crate::error::Error::Orchestration(inner) => inner,
            crate::error::Error::Json(e) => Self::MalformedResponse(e.to_string()),
            crate::error::Error::Parse(msg) => Self::MalformedResponse(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_payload_extracts_code_and_message() {
        let err = OrchestrationError::from_payload(json!({"code": 404, "message": "not found"}));
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "remote operation failed: not found");
    }

    #[test]
    fn from_payload_without_code_maps_to_500() {
        let err = OrchestrationError::from_payload(json!({"message": "boom"}));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn parse_failures_become_malformed_response() {
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        let err: OrchestrationError = crate::error::Error::from(json_err).into();
        assert!(matches!(err, OrchestrationError::MalformedResponse(_)));
    }
}

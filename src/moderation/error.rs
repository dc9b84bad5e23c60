// Error kinds for the moderation pipeline.
//
// ValidationError is the only error a caller ever sees, and only from request
// construction. SignalFailure never leaves the Moderator: it is logged and
// turned into the fail-safe result.

use thiserror::Error;

/// Rejected request content. The HTTP layer maps this to 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Content field is required and cannot be empty")]
    EmptyContent,

    #[error("Content too long. Maximum 10,000 characters allowed.")]
    ContentTooLong { len: usize, max: usize },
}

/// Returned by a producer when the upstream answered but the payload could
/// not be interpreted. Producers wrap it in `anyhow::Error`; the Moderator
/// downcasts to tell it apart from transport failures.
#[derive(Debug, Error)]
#[error("malformed response from {provider}: {message}")]
pub struct MalformedResponse {
    pub provider: &'static str,
    pub message: String,
}

impl MalformedResponse {
    pub fn new(provider: &'static str, message: impl Into<String>) -> Self {
        Self {
            provider,
            message: message.into(),
        }
    }
}

/// Why a signal producer could not contribute scores.
///
/// The Display text names the failure mode only; upstream error bodies stay
/// in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalFailure {
    #[error("Signal producer '{producer}' timed out after {after_ms}ms")]
    Timeout { producer: String, after_ms: u64 },

    #[error("Signal producer '{producer}' returned a malformed response")]
    Malformed { producer: String },

    #[error("Signal producer '{producer}' is unavailable")]
    Unavailable { producer: String },

    #[error("No signal producers are configured")]
    NoSignals,
}

impl SignalFailure {
    /// Classify a producer error without exposing its message.
    pub fn from_producer_error(producer: &str, err: &anyhow::Error) -> Self {
        if err.downcast_ref::<MalformedResponse>().is_some() {
            SignalFailure::Malformed {
                producer: producer.to_string(),
            }
        } else {
            SignalFailure::Unavailable {
                producer: producer.to_string(),
            }
        }
    }
}

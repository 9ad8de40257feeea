//! Error types for text-generation calls.

use thiserror::Error;

/// Failures crossing the text-generation service boundary.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Rate limited by the service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The service reported a server-side failure.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Request could not reach the service.
    #[error("network error: {0}")]
    Network(String),

    /// The round-trip exceeded the configured deadline.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// The service rejected the request body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response lacked expected fields.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl LlmError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. }
                | LlmError::Unavailable(_)
                | LlmError::Network(_)
                | LlmError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(LlmError::RateLimited {
            retry_after_secs: 30
        }
        .is_retryable());
        assert!(LlmError::Unavailable("down".into()).is_retryable());
        assert!(LlmError::Network("reset".into()).is_retryable());
        assert!(LlmError::Timeout { timeout_secs: 60 }.is_retryable());

        assert!(!LlmError::AuthenticationFailed.is_retryable());
        assert!(!LlmError::InvalidRequest("bad".into()).is_retryable());
        assert!(!LlmError::Parse("no choices".into()).is_retryable());
    }

    #[test]
    fn display_includes_details() {
        let err = LlmError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 30s");
    }
}

//! Error types for the Stepwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; the agent crate wraps
//! the ones that can abort a query.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool '{0}' not found.")]
    NotFound(String),

    #[error("Invalid input for {tool_name}: {reason}")]
    InvalidInput { tool_name: String, reason: String },
}

/// Failures to turn raw model text into a [`crate::reply::ReplyStep`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// The text is not a JSON object at all.
    #[error("Model returned non-JSON response: {0}")]
    Decode(String),

    /// Valid JSON that does not satisfy the step contract.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_not_found_names_the_tool() {
        let err = ToolError::NotFound("teleport".into());
        assert_eq!(err.to_string(), "Tool 'teleport' not found.");
    }

    #[test]
    fn reply_errors_name_their_kind() {
        let err = ReplyError::Protocol("missing 'function'".into());
        assert_eq!(err.to_string(), "Protocol error: missing 'function'");
        let err = ReplyError::Decode("expected value".into());
        assert!(err.to_string().starts_with("Model returned non-JSON response"));
    }
}

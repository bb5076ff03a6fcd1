//! Error types for the Parley domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! The dispatch pipeline itself is total; only the boundary checks and the
//! direct responder can fail.

use thiserror::Error;

/// Errors surfaced by the message dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The input text or the user id was missing at the dispatcher boundary.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The direct responder failed. Carried through unchanged.
    #[error(transparent)]
    RemoteService(#[from] RemoteServiceError),
}

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// A failure of the remote completion service behind the direct responder.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteServiceError {
    pub message: String,

    #[source]
    pub source: Option<ProviderError>,
}

impl RemoteServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: ProviderError) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }
}

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

    #[error("No response received from provider")]
    EmptyResponse,

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel connection lost: {0}")]
    ConnectionLost(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_argument_displays_reason() {
        let err = DispatchError::InvalidArgument("input cannot be absent".into());
        assert_eq!(err.to_string(), "Invalid argument: input cannot be absent");
    }

    #[test]
    fn remote_service_error_is_transparent() {
        let err: DispatchError = RemoteServiceError::new("API error").into();
        assert_eq!(err.to_string(), "API error");
        assert!(matches!(err, DispatchError::RemoteService(_)));
    }

    #[test]
    fn remote_service_error_keeps_cause() {
        let err = RemoteServiceError::with_source(
            "Error during remote completion request",
            ProviderError::ApiError {
                status_code: 500,
                message: "upstream exploded".into(),
            },
        );
        let cause = err.source().expect("cause should be attached");
        assert!(cause.to_string().contains("500"));
        assert!(cause.to_string().contains("upstream exploded"));
    }
}

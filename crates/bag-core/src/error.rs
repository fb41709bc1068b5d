//! Common error types for address providers

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while querying an address registry
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No address exists for the given id or tuple
    #[error("Address not found: {0}")]
    NotFound(String),

    /// The registry rejected the query parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The registry refused our credentials (missing or wrong API key)
    #[error("Registry rejected credentials: {0}")]
    Unauthorized(String),

    /// Registry answered with an unexpected status
    #[error("Upstream error {status}: {message}")]
    Upstream {
        /// HTTP status returned by the registry
        status: u16,
        /// Message extracted from the upstream body, if any
        message: String,
    },

    /// Response body could not be mapped to an address
    #[error("Malformed registry response: {0}")]
    Malformed(String),

    /// Transport/communication error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Timeout waiting for the registry
    #[error("Registry timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Returns the HTTP status code the gateway should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ProviderError::NotFound(_) => 404,
            ProviderError::InvalidRequest(_) => 400,
            ProviderError::Unauthorized(_) => 502,
            ProviderError::Upstream { .. } => 502,
            ProviderError::Malformed(_) => 502,
            ProviderError::Transport(_) => 503,
            ProviderError::Timeout(_) => 504,
        }
    }

    /// Whether the failure is attributable to the caller's query
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_client_error() {
        let err = ProviderError::NotFound("0363200000123456".into());
        assert_eq!(err.status_code(), 404);
        assert!(err.is_client_error());
    }

    #[test]
    fn transport_failures_are_server_errors() {
        assert_eq!(ProviderError::Transport("refused".into()).status_code(), 503);
        assert_eq!(ProviderError::Timeout("30s".into()).status_code(), 504);
        assert!(!ProviderError::Malformed("no _embedded".into()).is_client_error());
    }

    #[test]
    fn message_carries_context() {
        let err = ProviderError::NotFound("huisnummer 12, postcode 1234AB".into());
        assert_eq!(
            err.to_string(),
            "Address not found: huisnummer 12, postcode 1234AB"
        );
    }
}

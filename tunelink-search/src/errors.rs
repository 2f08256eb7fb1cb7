//! Error types for song lookup.

use std::time::Duration;

use thiserror::Error;

/// Message returned to callers when the query is incomplete.
pub const MISSING_QUERY_MESSAGE: &str = "artist and track are required";

/// Errors that can occur during song lookup operations.
///
/// Only `Validation` and `Configuration` ever reach a caller. Provider
/// failures are logged and degrade to "no data for this provider".
#[derive(Debug, Error)]
pub enum LookupError {
    /// Artist or track is missing or blank.
    #[error("Invalid query: {reason}")]
    Validation {
        /// Why the query was rejected
        reason: String,
    },

    /// Provider could not be reached or answered with a failure status.
    #[error("Provider '{provider}' unavailable: {reason}")]
    ProviderUnavailable {
        /// Name of the provider that failed
        provider: &'static str,
        /// The reason for the failure
        reason: String,
    },

    /// Provider answered with a payload we could not interpret.
    #[error("Provider '{provider}' returned an unexpected payload: {reason}")]
    UpstreamFormat {
        /// Name of the provider that failed
        provider: &'static str,
        /// The reason for the parse failure
        reason: String,
    },

    /// Provider did not answer within the configured bound.
    #[error("Provider '{provider}' timed out after {timeout:?}")]
    Timeout {
        /// Name of the provider that timed out
        provider: &'static str,
        /// The bound that was exceeded
        timeout: Duration,
    },

    /// Invalid configuration detected while building the service.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// The reason the configuration was rejected
        reason: String,
    },
}

impl LookupError {
    /// Builds the validation error for an incomplete query.
    pub fn missing_query() -> Self {
        LookupError::Validation {
            reason: MISSING_QUERY_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_message() {
        let error = LookupError::missing_query();
        assert!(matches!(
            &error,
            LookupError::Validation { reason } if reason == MISSING_QUERY_MESSAGE
        ));
        assert_eq!(
            error.to_string(),
            "Invalid query: artist and track are required"
        );
    }

    #[test]
    fn test_timeout_names_provider() {
        let error = LookupError::Timeout {
            provider: "deezer",
            timeout: Duration::from_secs(5),
        };
        assert_eq!(error.to_string(), "Provider 'deezer' timed out after 5s");
    }
}

//! Provider implementations for song lookup.

use async_trait::async_trait;

use crate::config::SearchConfig;
use crate::errors::LookupError;
use crate::types::ProviderResult;

pub mod deezer;
pub mod duckduckgo;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod song_link;

pub use deezer::DeezerProvider;
pub use duckduckgo::DuckDuckGoProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockProvider;
pub use song_link::SongLinkProvider;

/// Trait for services that know where a song lives.
///
/// Implementations wrap official APIs, cross-platform resolvers or
/// search-engine scrapes behind one call so the lookup pipeline can
/// enable, disable or replace them independently.
#[async_trait]
pub trait LinkProvider: Send + Sync + std::fmt::Debug {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fetch provider data for `input`.
    ///
    /// `input` is the built query for search providers and the seed URL
    /// for resolvers.
    ///
    /// # Errors
    /// - `LookupError::ProviderUnavailable` - Network failure or error status
    /// - `LookupError::UpstreamFormat` - Response could not be interpreted
    async fn fetch(&self, input: &str) -> Result<ProviderResult, LookupError>;
}

/// Builds the HTTP client shared by all providers of one service.
///
/// # Errors
/// - `LookupError::Configuration` - TLS backend or client setup failed
pub fn build_http_client(config: &SearchConfig) -> Result<reqwest::Client, LookupError> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.provider_timeout)
        .build()
        .map_err(|e| LookupError::Configuration {
            reason: format!("HTTP client setup failed: {e}"),
        })
}

/// Joins a base URL and a path without doubling the separator.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("https://api.deezer.com/", "/search"),
            "https://api.deezer.com/search"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:8080", "html/"),
            "http://127.0.0.1:8080/html/"
        );
    }

    #[test]
    fn test_build_http_client_with_defaults() {
        assert!(build_http_client(&SearchConfig::default()).is_ok());
    }
}

//! Lookup configuration.
//!
//! Provider endpoints, timeouts and toggles live here so tests and
//! deployments can redirect or disable providers without code changes.

use std::time::Duration;

/// Configuration for the lookup service and its providers.
///
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Upper bound for a single provider call
    pub provider_timeout: Duration,
    /// User agent sent to every provider
    pub user_agent: String,
    /// Country code passed to song.link
    pub user_country: String,
    /// Deezer API base URL
    pub deezer_base_url: String,
    /// song.link API base URL
    pub song_link_base_url: String,
    /// DuckDuckGo HTML endpoint base URL
    pub duckduckgo_base_url: String,
    /// Whether to resolve the Deezer link through song.link
    pub enable_song_link: bool,
    /// Whether to scrape DuckDuckGo for links
    pub enable_scrape: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(5),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            user_country: "FR".to_string(),
            deezer_base_url: "https://api.deezer.com".to_string(),
            song_link_base_url: "https://api.song.link".to_string(),
            duckduckgo_base_url: "https://html.duckduckgo.com".to_string(),
            enable_song_link: true,
            enable_scrape: true,
        }
    }
}

impl SearchConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("TUNELINK_PROVIDER_TIMEOUT_SECS") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                config.provider_timeout = Duration::from_secs(seconds);
            }
        }

        if let Ok(country) = std::env::var("TUNELINK_USER_COUNTRY") {
            if !country.trim().is_empty() {
                config.user_country = country.trim().to_uppercase();
            }
        }

        if let Ok(enabled) = std::env::var("TUNELINK_ENABLE_SCRAPE") {
            config.enable_scrape = enabled.parse().unwrap_or(config.enable_scrape);
        }

        if let Ok(enabled) = std::env::var("TUNELINK_ENABLE_SONG_LINK") {
            config.enable_song_link = enabled.parse().unwrap_or(config.enable_song_link);
        }

        if let Ok(url) = std::env::var("TUNELINK_DEEZER_URL") {
            config.deezer_base_url = url;
        }

        if let Ok(url) = std::env::var("TUNELINK_SONG_LINK_URL") {
            config.song_link_base_url = url;
        }

        if let Ok(url) = std::env::var("TUNELINK_DUCKDUCKGO_URL") {
            config.duckduckgo_base_url = url;
        }

        config
    }

    /// Points every provider at `base_url`, as used by tests with a local upstream.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            deezer_base_url: base_url.to_string(),
            song_link_base_url: base_url.to_string(),
            duckduckgo_base_url: base_url.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = SearchConfig::default();

        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert_eq!(config.user_country, "FR");
        assert_eq!(config.deezer_base_url, "https://api.deezer.com");
        assert_eq!(config.song_link_base_url, "https://api.song.link");
        assert_eq!(config.duckduckgo_base_url, "https://html.duckduckgo.com");
        assert!(config.enable_song_link);
        assert!(config.enable_scrape);
    }

    #[test]
    fn test_with_base_url_redirects_all_providers() {
        let config = SearchConfig::with_base_url("http://127.0.0.1:9999");

        assert_eq!(config.deezer_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.song_link_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.duckduckgo_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.user_country, "FR");
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("TUNELINK_PROVIDER_TIMEOUT_SECS", "2");
            std::env::set_var("TUNELINK_USER_COUNTRY", " us ");
            std::env::set_var("TUNELINK_ENABLE_SCRAPE", "false");
            std::env::set_var("TUNELINK_ENABLE_SONG_LINK", "not-a-bool");
        }

        let config = SearchConfig::from_env();

        assert_eq!(config.provider_timeout, Duration::from_secs(2));
        assert_eq!(config.user_country, "US");
        assert!(!config.enable_scrape);
        assert!(config.enable_song_link);

        // Cleanup
        unsafe {
            std::env::remove_var("TUNELINK_PROVIDER_TIMEOUT_SECS");
            std::env::remove_var("TUNELINK_USER_COUNTRY");
            std::env::remove_var("TUNELINK_ENABLE_SCRAPE");
            std::env::remove_var("TUNELINK_ENABLE_SONG_LINK");
        }
    }
}

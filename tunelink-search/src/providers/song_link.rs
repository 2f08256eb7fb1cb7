//! song.link cross-platform resolver.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{LinkProvider, endpoint};
use crate::errors::LookupError;
use crate::types::{ProviderPayload, ProviderResult, SongLinkPayload};

const PROVIDER_NAME: &str = "song.link";

/// Resolves one platform URL into its equivalents on other platforms.
///
/// The input to [`LinkProvider::fetch`] is the seed URL, not a text query.
#[derive(Debug, Clone)]
pub struct SongLinkProvider {
    client: reqwest::Client,
    base_url: String,
    user_country: String,
}

/// Response from the song.link `links` endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongLinkResponse {
    entities_by_unique_id: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    links_by_platform: BTreeMap<String, PlatformLink>,
}

#[derive(Debug, Deserialize)]
struct PlatformLink {
    #[serde(default)]
    url: Option<String>,
}

impl SongLinkProvider {
    /// Creates a resolver against `base_url`, localised to `user_country`.
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        user_country: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            user_country: user_country.into(),
        }
    }

    /// Interprets a song.link response body.
    fn parse_response(body: &str) -> Result<ProviderResult, LookupError> {
        let response: SongLinkResponse =
            serde_json::from_str(body).map_err(|e| LookupError::UpstreamFormat {
                provider: PROVIDER_NAME,
                reason: format!("song.link JSON parsing failed: {e}"),
            })?;

        let platform_urls: BTreeMap<String, String> = response
            .links_by_platform
            .into_iter()
            .filter_map(|(platform, link)| link.url.map(|url| (platform, url)))
            .collect();

        if response.entities_by_unique_id.is_empty() && platform_urls.is_empty() {
            return Ok(ProviderResult::NotFound);
        }

        Ok(ProviderResult::Found(ProviderPayload::SongLink(
            SongLinkPayload {
                entity_keys: response.entities_by_unique_id.into_keys().collect(),
                platform_urls,
            },
        )))
    }
}

#[async_trait]
impl LinkProvider for SongLinkProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(&self, input: &str) -> Result<ProviderResult, LookupError> {
        let url = endpoint(&self.base_url, "v1-alpha.1/links");
        debug!(seed = %input, country = %self.user_country, "Resolving via song.link");

        let response = self
            .client
            .get(&url)
            .query(&[("url", input), ("userCountry", self.user_country.as_str())])
            .send()
            .await
            .map_err(|e| LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("song.link request failed: {e}"),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ProviderResult::NotFound);
        }

        if !response.status().is_success() {
            return Err(LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("song.link HTTP {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("song.link body read failed: {e}"),
            })?;

        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entities_and_platform_links() {
        let body = r#"{
            "entityUniqueId": "DEEZER_SONG::3135556",
            "entitiesByUniqueId": {
                "DEEZER_SONG::3135556": {"id": "3135556"},
                "SPOTIFY_SONG::abc123": {"id": "abc123"},
                "YOUTUBE_VIDEO::dQw4w9WgXcQ": {"id": "dQw4w9WgXcQ"}
            },
            "linksByPlatform": {
                "appleMusic": {"url": "https://music.apple.com/fr/album/x/1?i=2"},
                "soundcloud": {"url": "https://soundcloud.com/a/b"},
                "napster": {}
            }
        }"#;

        let ProviderResult::Found(ProviderPayload::SongLink(payload)) =
            SongLinkProvider::parse_response(body).unwrap()
        else {
            panic!("expected song.link payload");
        };

        assert_eq!(
            payload.entity_keys,
            vec![
                "DEEZER_SONG::3135556",
                "SPOTIFY_SONG::abc123",
                "YOUTUBE_VIDEO::dQw4w9WgXcQ"
            ]
        );
        assert_eq!(payload.platform_urls.len(), 2);
        assert_eq!(
            payload.platform_urls["soundcloud"],
            "https://soundcloud.com/a/b"
        );
    }

    #[test]
    fn test_parse_empty_entities_is_not_found() {
        let body = r#"{"entitiesByUniqueId": {}, "linksByPlatform": {}}"#;
        assert_eq!(
            SongLinkProvider::parse_response(body).unwrap(),
            ProviderResult::NotFound
        );
    }

    #[test]
    fn test_parse_missing_entities_is_format_error() {
        let error = SongLinkProvider::parse_response(r#"{"statusCode": 500}"#).unwrap_err();
        assert!(matches!(
            error,
            LookupError::UpstreamFormat {
                provider: "song.link",
                ..
            }
        ));
    }
}

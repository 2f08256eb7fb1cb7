//! Deezer search provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{LinkProvider, endpoint};
use crate::errors::LookupError;
use crate::types::{ProviderPayload, ProviderResult};

const PROVIDER_NAME: &str = "deezer";

/// Deezer public search API.
///
/// Anchor provider of the pipeline: its first hit seeds song.link.
#[derive(Debug, Clone)]
pub struct DeezerProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Response from Deezer search endpoint.
#[derive(Debug, Deserialize)]
struct DeezerResponse {
    #[serde(default)]
    data: Option<Vec<DeezerTrack>>,
    #[serde(default)]
    error: Option<DeezerApiError>,
}

/// Single track from Deezer search.
#[derive(Debug, Deserialize)]
struct DeezerTrack {
    #[serde(default)]
    link: Option<String>,
}

/// Deezer reports errors in-band with a 200 status.
#[derive(Debug, Deserialize)]
struct DeezerApiError {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl DeezerProvider {
    /// Creates a provider against `base_url` using a shared client.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Interprets a Deezer search response body.
    fn parse_response(body: &str) -> Result<ProviderResult, LookupError> {
        let response: DeezerResponse =
            serde_json::from_str(body).map_err(|e| LookupError::UpstreamFormat {
                provider: PROVIDER_NAME,
                reason: format!("Deezer JSON parsing failed: {e}"),
            })?;

        if let Some(error) = response.error {
            return Err(LookupError::UpstreamFormat {
                provider: PROVIDER_NAME,
                reason: format!(
                    "Deezer API error {}: {}",
                    error.kind.unwrap_or_default(),
                    error.message.unwrap_or_default()
                ),
            });
        }

        let link = response
            .data
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|track| track.link)
            .filter(|link| !link.trim().is_empty());

        Ok(match link {
            Some(link) => ProviderResult::Found(ProviderPayload::WebUrl(link)),
            None => ProviderResult::NotFound,
        })
    }
}

#[async_trait]
impl LinkProvider for DeezerProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(&self, input: &str) -> Result<ProviderResult, LookupError> {
        let url = endpoint(&self.base_url, "search");
        debug!(query = %input, "Querying Deezer search");

        let response = self
            .client
            .get(&url)
            .query(&[("q", input)])
            .send()
            .await
            .map_err(|e| LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("Deezer request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("Deezer HTTP {}", response.status()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("Deezer body read failed: {e}"),
            })?;

        Self::parse_response(&body)
    }
}

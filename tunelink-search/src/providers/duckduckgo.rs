//! DuckDuckGo HTML scrape provider.
//!
//! Best-effort fallback: the HTML layout is not a stable API, so every
//! failure here degrades to an empty result instead of an error.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::{LinkProvider, endpoint};
use crate::errors::LookupError;
use crate::types::{Platform, ProviderPayload, ProviderResult};

const PROVIDER_NAME: &str = "duckduckgo";
const REDIRECT_PARAM: &str = "uddg";

/// Scrapes DuckDuckGo's HTML results page for platform links.
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoProvider {
    /// Creates a scraper against `base_url`.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Extracts platform links from a results page, deduplicated in page order.
    pub fn parse_results(html: &str) -> Vec<String> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        let Ok(page_base) = Url::parse("https://duckduckgo.com/") else {
            return Vec::new();
        };

        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in document.select(&selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(target) = Self::decode_target(&page_base, href) else {
                continue;
            };
            if !Self::is_platform_link(&target) {
                continue;
            }
            if seen.insert(target.clone()) {
                links.push(target);
            }
        }

        links
    }

    /// Resolves an anchor href to the page it points at.
    ///
    /// Redirect links carry the target in the `uddg` parameter; plain
    /// absolute links outside DuckDuckGo are taken as they are.
    fn decode_target(page_base: &Url, href: &str) -> Option<String> {
        let url = page_base.join(href).ok()?;

        if let Some((_, target)) = url.query_pairs().find(|(key, _)| key == REDIRECT_PARAM) {
            return Some(target.into_owned());
        }

        let host = url.host_str()?;
        if host.ends_with("duckduckgo.com") {
            return None;
        }
        matches!(url.scheme(), "http" | "https").then(|| url.to_string())
    }

    fn is_platform_link(url: &str) -> bool {
        Platform::ALL
            .iter()
            .filter_map(|platform| platform.scrape_domain())
            .any(|domain| url.contains(domain))
    }

    async fn fetch_page(&self, query: &str) -> Result<String, LookupError> {
        let url = endpoint(&self.base_url, "html/");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("DuckDuckGo request failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("DuckDuckGo HTTP {}", response.status()),
            });
        }

        response
            .text()
            .await
            .map_err(|e| LookupError::ProviderUnavailable {
                provider: PROVIDER_NAME,
                reason: format!("DuckDuckGo body read failed: {e}"),
            })
    }
}

#[async_trait]
impl LinkProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch(&self, input: &str) -> Result<ProviderResult, LookupError> {
        debug!(query = %input, "Scraping DuckDuckGo");

        let links = match self.fetch_page(input).await {
            Ok(html) => Self::parse_results(&html),
            Err(e) => {
                warn!(error = %e, "DuckDuckGo scrape failed, continuing without it");
                Vec::new()
            }
        };

        debug!(count = links.len(), "DuckDuckGo scrape finished");
        Ok(ProviderResult::Found(ProviderPayload::Scraped(links)))
    }
}

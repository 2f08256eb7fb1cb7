//! Song lookup pipeline.
//!
//! Query → providers → extraction → normalization → assembly. Deezer search
//! and the scrape run concurrently; song.link runs after Deezer because it
//! needs Deezer's link as its seed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use url::Url;

use crate::assemble::assemble;
use crate::config::SearchConfig;
use crate::errors::LookupError;
use crate::extract::extract;
use crate::normalize::normalize;
use crate::providers::{
    DeezerProvider, DuckDuckGoProvider, LinkProvider, SongLinkProvider, build_http_client,
};
use crate::query::SearchQuery;
use crate::types::{LinkResponse, PlatformLinkSet, ProviderPayload, ProviderResult};

/// Song lookup service aggregating every configured provider.
///
/// Holds only shared, immutable provider handles, so clones are cheap and
/// concurrent lookups never observe each other.
#[derive(Debug, Clone)]
pub struct SongSearchService {
    deezer: Arc<dyn LinkProvider>,
    song_link: Option<Arc<dyn LinkProvider>>,
    scraper: Option<Arc<dyn LinkProvider>>,
    provider_timeout: Duration,
}

impl SongSearchService {
    /// Creates a service with only the anchor provider.
    pub fn new(deezer: Arc<dyn LinkProvider>) -> Self {
        Self {
            deezer,
            song_link: None,
            scraper: None,
            provider_timeout: SearchConfig::default().provider_timeout,
        }
    }

    /// Creates the production service described by `config`.
    ///
    /// # Errors
    /// - `LookupError::Configuration` - HTTP client could not be built
    pub fn from_config(config: &SearchConfig) -> Result<Self, LookupError> {
        let client = build_http_client(config)?;

        let mut service = Self::new(Arc::new(DeezerProvider::new(
            client.clone(),
            config.deezer_base_url.clone(),
        )))
        .with_timeout(config.provider_timeout);

        if config.enable_song_link {
            service = service.with_song_link(Arc::new(SongLinkProvider::new(
                client.clone(),
                config.song_link_base_url.clone(),
                config.user_country.clone(),
            )));
        }

        if config.enable_scrape {
            service = service.with_scraper(Arc::new(DuckDuckGoProvider::new(
                client,
                config.duckduckgo_base_url.clone(),
            )));
        }

        Ok(service)
    }

    /// Adds the cross-platform resolver seeded by the anchor's link.
    pub fn with_song_link(mut self, provider: Arc<dyn LinkProvider>) -> Self {
        self.song_link = Some(provider);
        self
    }

    /// Adds the search-engine scraper.
    pub fn with_scraper(mut self, provider: Arc<dyn LinkProvider>) -> Self {
        self.scraper = Some(provider);
        self
    }

    /// Bounds every provider call by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Names of the enabled providers, anchor first.
    pub fn provider_names(&self) -> Vec<&'static str> {
        let mut names = vec![self.deezer.name()];
        names.extend(self.song_link.as_ref().map(|provider| provider.name()));
        names.extend(self.scraper.as_ref().map(|provider| provider.name()));
        names
    }

    /// Looks up links for `query` across all providers.
    ///
    /// Provider failures never fail the lookup; the response holds whatever
    /// subset of platforms was found. For each platform a scraped track link
    /// wins over song.link, which wins over Deezer search.
    pub async fn lookup(&self, query: &SearchQuery) -> LinkResponse {
        info!(artist = %query.artist(), track = %query.track(), "Looking up song");

        let search_query = query.build();
        let scrape_query = query.build_scrape();

        let (anchor, scraped) = tokio::join!(
            self.fetch_degraded(self.deezer.as_ref(), &search_query),
            async {
                match &self.scraper {
                    Some(scraper) => self.fetch_degraded(scraper.as_ref(), &scrape_query).await,
                    None => None,
                }
            }
        );

        let resolved = match (&self.song_link, anchor.as_ref().and_then(seed_url)) {
            (Some(resolver), Some(seed)) => self.fetch_degraded(resolver.as_ref(), &seed).await,
            (Some(resolver), None) => {
                debug!(provider = resolver.name(), "No usable seed URL, skipping resolver");
                None
            }
            (None, _) => None,
        };

        let mut links = PlatformLinkSet::new();
        for payload in [&scraped, &resolved, &anchor].into_iter().flatten() {
            links.fill_from(&extract(payload));
        }

        let uris = normalize(&links);
        let response = assemble(&links, &uris);

        if response.is_empty() {
            info!(query = %search_query, "No platform links found");
        } else {
            info!(
                query = %search_query,
                platforms = ?response.found_platforms(),
                "Lookup finished"
            );
        }

        response
    }

    /// Calls `provider` under the timeout, turning every failure into `None`.
    async fn fetch_degraded(
        &self,
        provider: &dyn LinkProvider,
        input: &str,
    ) -> Option<ProviderPayload> {
        let result = tokio::time::timeout(self.provider_timeout, provider.fetch(input))
            .await
            .unwrap_or(Err(LookupError::Timeout {
                provider: provider.name(),
                timeout: self.provider_timeout,
            }));

        match result {
            Ok(ProviderResult::Found(payload)) => Some(payload),
            Ok(ProviderResult::NotFound) => {
                debug!(provider = provider.name(), "Provider found nothing");
                None
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Provider failed, continuing without it");
                None
            }
        }
    }
}

/// Seed for the resolver: the anchor's web URL, if it is an absolute http(s) URL.
fn seed_url(payload: &ProviderPayload) -> Option<String> {
    let ProviderPayload::WebUrl(url) = payload else {
        return None;
    };
    let parsed = Url::parse(url).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| url.clone())
}

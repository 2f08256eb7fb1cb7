//! Search query construction.

use crate::errors::LookupError;
use crate::types::Platform;

/// Artist and track to look up, both trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    artist: String,
    track: String,
}

impl SearchQuery {
    /// Validates and trims the request inputs.
    ///
    /// # Errors
    /// - `LookupError::Validation` - Artist or track is empty after trimming
    pub fn new(artist: &str, track: &str) -> Result<Self, LookupError> {
        let artist = artist.trim();
        let track = track.trim();

        if artist.is_empty() || track.is_empty() {
            return Err(LookupError::missing_query());
        }

        Ok(Self {
            artist: artist.to_string(),
            track: track.to_string(),
        })
    }

    /// Builds a query from optional request parameters.
    ///
    /// # Errors
    /// - `LookupError::Validation` - Either parameter is missing or blank
    pub fn from_params(artist: Option<&str>, track: Option<&str>) -> Result<Self, LookupError> {
        match (artist, track) {
            (Some(artist), Some(track)) => Self::new(artist, track),
            _ => Err(LookupError::missing_query()),
        }
    }

    /// Trimmed artist name.
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Trimmed track title.
    pub fn track(&self) -> &str {
        &self.track
    }

    /// Free-text query for metadata APIs: `"<artist> <track>"`.
    pub fn build(&self) -> String {
        format!("{} {}", self.artist, self.track)
    }

    /// Query for search-engine scraping, restricted to the scraped platforms.
    pub fn build_scrape(&self) -> String {
        let filter = Platform::ALL
            .iter()
            .filter_map(|platform| platform.scrape_domain())
            .map(|domain| format!("site:{domain}"))
            .collect::<Vec<_>>()
            .join(" OR ");

        format!("{} {filter}", self.build())
    }
}

//! Data types for song lookup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Music platforms a lookup can report links for.
///
/// The set is closed; every response carries one entry per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    /// Spotify
    Spotify,
    /// Deezer
    Deezer,
    /// YouTube, including YouTube Music
    #[serde(rename = "youtube")]
    YouTube,
    /// Apple Music
    AppleMusic,
    /// SoundCloud
    #[serde(rename = "soundcloud")]
    SoundCloud,
}

impl Platform {
    /// Every platform, in response order.
    pub const ALL: [Platform; 5] = [
        Platform::Spotify,
        Platform::Deezer,
        Platform::YouTube,
        Platform::AppleMusic,
        Platform::SoundCloud,
    ];

    /// Key used for this platform in responses and in song.link's `linksByPlatform`.
    pub fn key(self) -> &'static str {
        match self {
            Platform::Spotify => "spotify",
            Platform::Deezer => "deezer",
            Platform::YouTube => "youtube",
            Platform::AppleMusic => "appleMusic",
            Platform::SoundCloud => "soundcloud",
        }
    }

    /// Domain used to recognise scraped links, for platforms the scraper targets.
    pub fn scrape_domain(self) -> Option<&'static str> {
        match self {
            Platform::Spotify => Some("spotify.com"),
            Platform::Deezer => Some("deezer.com"),
            Platform::YouTube => Some("youtube.com"),
            Platform::AppleMusic | Platform::SoundCloud => None,
        }
    }

    /// Prefix of song.link entity keys that identify a track on this platform.
    pub fn entity_prefix(self) -> Option<&'static str> {
        match self {
            Platform::Spotify => Some("SPOTIFY_SONG::"),
            Platform::Deezer => Some("DEEZER_SONG::"),
            Platform::YouTube => Some("YOUTUBE_VIDEO::"),
            Platform::AppleMusic | Platform::SoundCloud => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Outcome of a successful provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    /// Provider answered with usable data.
    Found(ProviderPayload),
    /// Provider answered but knows nothing about the song.
    NotFound,
}

/// Provider-specific data, before link extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    /// A single canonical web URL (Deezer search).
    WebUrl(String),
    /// Cross-platform resolution from song.link.
    SongLink(SongLinkPayload),
    /// Deduplicated URLs scraped from a search engine, in page order.
    Scraped(Vec<String>),
}

/// The parts of a song.link response the extractor reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongLinkPayload {
    /// Keys of `entitiesByUniqueId`, such as `SPOTIFY_SONG::<id>`.
    pub entity_keys: Vec<String>,
    /// `linksByPlatform` flattened to platform key → web URL.
    pub platform_urls: BTreeMap<String, String>,
}

/// Web URL per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformLinkSet {
    links: BTreeMap<Platform, String>,
}

impl PlatformLinkSet {
    /// Creates an empty link set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Web URL for `platform`, if known.
    pub fn get(&self, platform: Platform) -> Option<&str> {
        self.links.get(&platform).map(String::as_str)
    }

    /// Records `url` unless the platform already has one.
    ///
    /// Returns whether the URL was stored.
    pub fn insert_if_absent(&mut self, platform: Platform, url: impl Into<String>) -> bool {
        if self.links.contains_key(&platform) {
            return false;
        }
        self.links.insert(platform, url.into());
        true
    }

    /// Copies every platform from `other` that this set does not have yet.
    pub fn fill_from(&mut self, other: &PlatformLinkSet) {
        for (platform, url) in &other.links {
            self.insert_if_absent(*platform, url.clone());
        }
    }

    /// Whether no platform has a link.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of platforms with a link.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Iterates known links in platform order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &str)> {
        self.links.iter().map(|(platform, url)| (*platform, url.as_str()))
    }
}

/// Deep-link URI per platform, derived from a [`PlatformLinkSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformUriSet {
    uris: BTreeMap<Platform, String>,
}

impl PlatformUriSet {
    /// Creates an empty URI set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-link URI for `platform`, if one was derived.
    pub fn get(&self, platform: Platform) -> Option<&str> {
        self.uris.get(&platform).map(String::as_str)
    }

    pub(crate) fn insert(&mut self, platform: Platform, uri: String) {
        self.uris.insert(platform, uri);
    }

    /// Whether no URI was derived.
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

/// Links for one platform as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEntry {
    /// Browser-friendly URL
    pub web_url: String,
    /// Native app URI, when the web URL carried a recognisable identifier
    pub deep_uri: Option<String>,
}

/// Lookup response: one entry per [`Platform`], `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkResponse {
    entries: BTreeMap<Platform, Option<PlatformEntry>>,
}

impl LinkResponse {
    /// Response with every platform set to `null`.
    pub fn empty() -> Self {
        Self {
            entries: Platform::ALL.iter().map(|p| (*p, None)).collect(),
        }
    }

    /// Entry for `platform`.
    pub fn get(&self, platform: Platform) -> Option<&PlatformEntry> {
        self.entries.get(&platform).and_then(Option::as_ref)
    }

    pub(crate) fn set(&mut self, platform: Platform, entry: PlatformEntry) {
        self.entries.insert(platform, Some(entry));
    }

    /// Whether no platform was found.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Option::is_none)
    }

    /// Platforms that have an entry.
    pub fn found_platforms(&self) -> Vec<Platform> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_some())
            .map(|(platform, _)| *platform)
            .collect()
    }
}

impl Default for LinkResponse {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_keys_match_serde_names() {
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.key()));
        }
    }

    #[test]
    fn test_link_set_keeps_first_link() {
        let mut links = PlatformLinkSet::new();
        assert!(links.insert_if_absent(Platform::Spotify, "https://open.spotify.com/track/a"));
        assert!(!links.insert_if_absent(Platform::Spotify, "https://open.spotify.com/track/b"));
        assert_eq!(
            links.get(Platform::Spotify),
            Some("https://open.spotify.com/track/a")
        );
    }

    #[test]
    fn test_fill_from_does_not_overwrite() {
        let mut preferred = PlatformLinkSet::new();
        preferred.insert_if_absent(Platform::Deezer, "https://www.deezer.com/track/1");

        let mut fallback = PlatformLinkSet::new();
        fallback.insert_if_absent(Platform::Deezer, "https://www.deezer.com/track/2");
        fallback.insert_if_absent(Platform::YouTube, "https://www.youtube.com/watch?v=x");

        preferred.fill_from(&fallback);

        assert_eq!(preferred.get(Platform::Deezer), Some("https://www.deezer.com/track/1"));
        assert_eq!(
            preferred.get(Platform::YouTube),
            Some("https://www.youtube.com/watch?v=x")
        );
        assert_eq!(preferred.len(), 2);
    }

    #[test]
    fn test_empty_response_serializes_every_platform_as_null() {
        let json = serde_json::to_value(LinkResponse::empty()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 5);
        for key in ["spotify", "deezer", "youtube", "appleMusic", "soundcloud"] {
            assert!(object[key].is_null(), "{key} should be null");
        }
    }

    #[test]
    fn test_entry_uses_camel_case_fields() {
        let mut response = LinkResponse::empty();
        response.set(
            Platform::Spotify,
            PlatformEntry {
                web_url: "https://open.spotify.com/track/abc".to_string(),
                deep_uri: Some("spotify:track:abc".to_string()),
            },
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["spotify"]["webUrl"], "https://open.spotify.com/track/abc");
        assert_eq!(json["spotify"]["deepUri"], "spotify:track:abc");
        assert!(!response.is_empty());
        assert_eq!(response.found_platforms(), vec![Platform::Spotify]);
    }
}

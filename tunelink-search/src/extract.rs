//! Link extraction from provider payloads.

use tracing::trace;

use crate::normalize::deep_uri;
use crate::types::{Platform, PlatformLinkSet, ProviderPayload, SongLinkPayload};

/// Turns any provider payload into per-platform web links.
pub fn extract(payload: &ProviderPayload) -> PlatformLinkSet {
    match payload {
        ProviderPayload::WebUrl(url) => extract_web_url(url),
        ProviderPayload::SongLink(payload) => extract_song_link(payload),
        ProviderPayload::Scraped(urls) => extract_scraped(urls),
    }
}

/// Classifies a single web URL.
pub fn extract_web_url(url: &str) -> PlatformLinkSet {
    let mut links = PlatformLinkSet::new();
    if let Some(platform) = classify(url) {
        links.insert_if_absent(platform, url);
    }
    links
}

/// Reads song.link entity keys, then fills gaps from its per-platform links.
///
/// Keys with an unknown prefix are skipped. The first key per platform wins.
pub fn extract_song_link(payload: &SongLinkPayload) -> PlatformLinkSet {
    let mut links = PlatformLinkSet::new();

    for key in &payload.entity_keys {
        let Some((platform, url)) = split_entity_key(key)
            .and_then(|(platform, id)| Some((platform, canonical_web_url(platform, id)?)))
        else {
            trace!(key = %key, "Ignoring song.link entity");
            continue;
        };
        links.insert_if_absent(platform, url);
    }

    for platform in Platform::ALL {
        if let Some(url) = payload.platform_urls.get(platform.key()) {
            links.insert_if_absent(platform, url.clone());
        }
    }

    links
}

/// Classifies scraped URLs by platform domain, keeping the first track link
/// per platform.
///
/// Artist, album and search pages are skipped: only a link that carries a
/// track identifier counts as found, so it cannot shadow a resolved track.
pub fn extract_scraped(urls: &[String]) -> PlatformLinkSet {
    let mut links = PlatformLinkSet::new();

    for url in urls {
        let Some(platform) = classify(url) else {
            continue;
        };
        if deep_uri(platform, url).is_none() {
            trace!(url = %url, %platform, "Ignoring scraped non-track link");
            continue;
        }
        links.insert_if_absent(platform, url.clone());
    }

    links
}

/// Platform whose scrape domain appears in `url`.
fn classify(url: &str) -> Option<Platform> {
    Platform::ALL.into_iter().find(|platform| {
        platform
            .scrape_domain()
            .is_some_and(|domain| url.contains(domain))
    })
}

/// Splits `SPOTIFY_SONG::<id>` into its platform and non-empty id.
fn split_entity_key(key: &str) -> Option<(Platform, &str)> {
    Platform::ALL.into_iter().find_map(|platform| {
        let id = key.strip_prefix(platform.entity_prefix()?)?;
        (!id.is_empty()).then_some((platform, id))
    })
}

/// Web URL for a platform-native track id, for platforms whose ids map to one.
fn canonical_web_url(platform: Platform, id: &str) -> Option<String> {
    match platform {
        Platform::Spotify => Some(format!("https://open.spotify.com/track/{id}")),
        Platform::Deezer => Some(format!("https://www.deezer.com/track/{id}")),
        Platform::YouTube => Some(format!("https://music.youtube.com/watch?v={id}")),
        Platform::AppleMusic | Platform::SoundCloud => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn song_link(keys: &[&str]) -> SongLinkPayload {
        SongLinkPayload {
            entity_keys: keys.iter().map(|key| key.to_string()).collect(),
            platform_urls: BTreeMap::new(),
        }
    }

    #[test]
    fn test_song_link_keys_become_web_urls() {
        let links = extract_song_link(&song_link(&[
            "DEEZER_SONG::3135556",
            "SPOTIFY_SONG::abc123",
            "YOUTUBE_VIDEO::oiKj0Z_Xnjc",
        ]));

        assert_eq!(links.get(Platform::Spotify), Some("https://open.spotify.com/track/abc123"));
        assert_eq!(links.get(Platform::Deezer), Some("https://www.deezer.com/track/3135556"));
        assert_eq!(
            links.get(Platform::YouTube),
            Some("https://music.youtube.com/watch?v=oiKj0Z_Xnjc")
        );
        assert_eq!(links.get(Platform::AppleMusic), None);
    }

    #[test]
    fn test_song_link_ignores_unknown_and_empty_keys() {
        let links = extract_song_link(&song_link(&[
            "ITUNES_SONG::1",
            "TIDAL_SONG::2",
            "SPOTIFY_SONG::",
            "garbage",
        ]));
        assert!(links.is_empty());
    }

    #[test]
    fn test_song_link_first_key_wins() {
        let links = extract_song_link(&song_link(&["SPOTIFY_SONG::first", "SPOTIFY_SONG::second"]));
        assert_eq!(links.get(Platform::Spotify), Some("https://open.spotify.com/track/first"));
    }

    #[test]
    fn test_song_link_platform_urls_fill_gaps_only() {
        let mut payload = song_link(&["SPOTIFY_SONG::abc123"]);
        payload.platform_urls.insert(
            "spotify".to_string(),
            "https://open.spotify.com/track/other".to_string(),
        );
        payload.platform_urls.insert(
            "appleMusic".to_string(),
            "https://music.apple.com/fr/album/papaoutai/1?i=2".to_string(),
        );
        payload.platform_urls.insert(
            "soundcloud".to_string(),
            "https://soundcloud.com/stromae/papaoutai".to_string(),
        );
        payload
            .platform_urls
            .insert("tidal".to_string(), "https://listen.tidal.com/track/1".to_string());

        let links = extract_song_link(&payload);

        assert_eq!(links.get(Platform::Spotify), Some("https://open.spotify.com/track/abc123"));
        assert_eq!(
            links.get(Platform::AppleMusic),
            Some("https://music.apple.com/fr/album/papaoutai/1?i=2")
        );
        assert_eq!(
            links.get(Platform::SoundCloud),
            Some("https://soundcloud.com/stromae/papaoutai")
        );
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_scraped_first_match_per_platform() {
        let urls = vec![
            "https://open.spotify.com/track/first".to_string(),
            "https://www.deezer.com/track/1".to_string(),
            "https://open.spotify.com/track/second".to_string(),
            "https://example.com/spotify".to_string(),
        ];

        let links = extract_scraped(&urls);

        assert_eq!(links.get(Platform::Spotify), Some("https://open.spotify.com/track/first"));
        assert_eq!(links.get(Platform::Deezer), Some("https://www.deezer.com/track/1"));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_scraped_pages_without_track_id_are_skipped() {
        let urls = vec![
            "https://open.spotify.com/artist/5j4HeCoUlzhfWtjAfM1acR".to_string(),
            "https://www.youtube.com/channel/UCXF0YCBWewAj3RytJUAivGA".to_string(),
            "https://open.spotify.com/track/realTrack".to_string(),
        ];

        let links = extract_scraped(&urls);

        assert_eq!(links.get(Platform::Spotify), Some("https://open.spotify.com/track/realTrack"));
        assert_eq!(links.get(Platform::YouTube), None);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_scraped_empty_is_empty() {
        assert!(extract(&ProviderPayload::Scraped(Vec::new())).is_empty());
    }

    #[test]
    fn test_web_url_is_classified() {
        let links = extract(&ProviderPayload::WebUrl(
            "https://www.deezer.com/track/3135556".to_string(),
        ));
        assert_eq!(links.get(Platform::Deezer), Some("https://www.deezer.com/track/3135556"));
        assert_eq!(links.len(), 1);
    }
}

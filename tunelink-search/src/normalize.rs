//! Deep-link URI normalization.
//!
//! Each platform has one identifier pattern and one canonical deep-link form.
//! A web URL that does not match its pattern yields no URI.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::types::{Platform, PlatformLinkSet, PlatformUriSet};

static SPOTIFY_TRACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"track/([A-Za-z0-9]+)").expect("valid Spotify track pattern"));

static DEEZER_TRACK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"track/(\d+)").expect("valid Deezer track pattern"));

static YOUTUBE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid YouTube id pattern"));

/// Derives deep-link URIs for every link in `links`.
pub fn normalize(links: &PlatformLinkSet) -> PlatformUriSet {
    let mut uris = PlatformUriSet::new();

    for (platform, url) in links.iter() {
        if let Some(uri) = deep_uri(platform, url) {
            uris.insert(platform, uri);
        }
    }

    uris
}

/// Deep-link URI for one web URL, if it carries a recognisable identifier.
///
/// Deezer uses the `dzr.page.link` form, which opens the app when installed
/// and falls back to the web player otherwise.
pub fn deep_uri(platform: Platform, url: &str) -> Option<String> {
    match platform {
        Platform::Spotify => capture(&SPOTIFY_TRACK, url).map(|id| format!("spotify:track:{id}")),
        Platform::Deezer => capture(&DEEZER_TRACK, url).map(|id| format!("https://dzr.page.link/{id}")),
        Platform::YouTube => youtube_video_id(url).map(|id| format!("vnd.youtube:{id}")),
        Platform::AppleMusic | Platform::SoundCloud => None,
    }
}

fn capture<'a>(pattern: &Regex, url: &'a str) -> Option<&'a str> {
    pattern
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Video id from a `watch?v=` URL or a `youtu.be/<id>` short link.
fn youtube_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    let id = if parsed.host_str()?.ends_with("youtu.be") {
        parsed.path_segments()?.next()?.to_string()
    } else {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?
    };

    YOUTUBE_ID.is_match(&id).then_some(id)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_spotify_track_uri() {
        assert_eq!(
            deep_uri(
                Platform::Spotify,
                "https://open.spotify.com/intl-fr/track/0Nyh5fOCNv3ybUdVAsBx3g?si=12ab"
            ),
            Some("spotify:track:0Nyh5fOCNv3ybUdVAsBx3g".to_string())
        );
        assert_eq!(
            deep_uri(Platform::Spotify, "https://open.spotify.com/track/abc123"),
            Some("spotify:track:abc123".to_string())
        );
    }

    #[test]
    fn test_spotify_non_track_has_no_uri() {
        assert_eq!(
            deep_uri(Platform::Spotify, "https://open.spotify.com/artist/5j4HeCoUlzhfWtjAfM1acR"),
            None
        );
    }

    #[test]
    fn test_deezer_page_link_uri() {
        assert_eq!(
            deep_uri(Platform::Deezer, "https://www.deezer.com/track/3135556"),
            Some("https://dzr.page.link/3135556".to_string())
        );
        assert_eq!(
            deep_uri(Platform::Deezer, "https://www.deezer.com/fr/album/302127"),
            None
        );
    }

    #[test]
    fn test_youtube_intent_uri() {
        assert_eq!(
            deep_uri(Platform::YouTube, "https://www.youtube.com/watch?v=oiKj0Z_Xnjc&t=10"),
            Some("vnd.youtube:oiKj0Z_Xnjc".to_string())
        );
        assert_eq!(
            deep_uri(Platform::YouTube, "https://music.youtube.com/watch?v=oiKj0Z_Xnjc"),
            Some("vnd.youtube:oiKj0Z_Xnjc".to_string())
        );
        assert_eq!(
            deep_uri(Platform::YouTube, "https://youtu.be/oiKj0Z_Xnjc"),
            Some("vnd.youtube:oiKj0Z_Xnjc".to_string())
        );
    }

    #[test]
    fn test_youtube_without_video_id() {
        assert_eq!(deep_uri(Platform::YouTube, "https://www.youtube.com/@stromae"), None);
        assert_eq!(deep_uri(Platform::YouTube, "https://www.youtube.com/watch?v="), None);
        assert_eq!(deep_uri(Platform::YouTube, "not a url"), None);
    }

    #[test]
    fn test_platforms_without_pattern() {
        assert_eq!(
            deep_uri(Platform::AppleMusic, "https://music.apple.com/fr/album/x/1?i=2"),
            None
        );
        assert_eq!(deep_uri(Platform::SoundCloud, "https://soundcloud.com/a/b"), None);
    }

    #[test]
    fn test_normalize_only_matching_links() {
        let mut links = PlatformLinkSet::new();
        links.insert_if_absent(Platform::Spotify, "https://open.spotify.com/track/abc123");
        links.insert_if_absent(Platform::Deezer, "https://www.deezer.com/playlist/9");
        links.insert_if_absent(Platform::SoundCloud, "https://soundcloud.com/a/b");

        let uris = normalize(&links);

        assert_eq!(uris.get(Platform::Spotify), Some("spotify:track:abc123"));
        assert_eq!(uris.get(Platform::Deezer), None);
        assert_eq!(uris.get(Platform::SoundCloud), None);
        assert_eq!(uris.get(Platform::YouTube), None);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&PlatformLinkSet::new()).is_empty());
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(id in "[A-Za-z0-9]{1,22}", digits in "[0-9]{1,12}") {
            let mut links = PlatformLinkSet::new();
            links.insert_if_absent(Platform::Spotify, format!("https://open.spotify.com/track/{id}"));
            links.insert_if_absent(Platform::Deezer, format!("https://www.deezer.com/track/{digits}"));
            links.insert_if_absent(Platform::YouTube, format!("https://www.youtube.com/watch?v={id}"));

            let first = normalize(&links);
            let second = normalize(&links);

            let spotify = format!("spotify:track:{id}");
            let deezer = format!("https://dzr.page.link/{digits}");

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.get(Platform::Spotify), Some(spotify.as_str()));
            prop_assert_eq!(first.get(Platform::Deezer), Some(deezer.as_str()));
        }

        #[test]
        fn test_deep_uri_never_panics(url in ".{0,80}") {
            for platform in Platform::ALL {
                let _ = deep_uri(platform, &url);
            }
        }
    }
}

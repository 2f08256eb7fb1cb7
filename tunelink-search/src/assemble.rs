//! Response assembly.

use crate::types::{LinkResponse, Platform, PlatformEntry, PlatformLinkSet, PlatformUriSet};

/// Merges web links and deep-link URIs into the response shape.
///
/// Platforms without a web link stay `null`; a URI never appears without one.
pub fn assemble(links: &PlatformLinkSet, uris: &PlatformUriSet) -> LinkResponse {
    let mut response = LinkResponse::empty();

    for platform in Platform::ALL {
        let Some(web_url) = links.get(platform) else {
            continue;
        };
        response.set(
            platform,
            PlatformEntry {
                web_url: web_url.to_string(),
                deep_uri: uris.get(platform).map(str::to_string),
            },
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn test_assemble_pairs_links_and_uris() {
        let mut links = PlatformLinkSet::new();
        links.insert_if_absent(Platform::Deezer, "https://www.deezer.com/track/3135556");
        links.insert_if_absent(Platform::SoundCloud, "https://soundcloud.com/stromae/papaoutai");

        let response = assemble(&links, &normalize(&links));

        assert_eq!(
            response.get(Platform::Deezer),
            Some(&PlatformEntry {
                web_url: "https://www.deezer.com/track/3135556".to_string(),
                deep_uri: Some("https://dzr.page.link/3135556".to_string()),
            })
        );
        assert_eq!(
            response.get(Platform::SoundCloud).map(|entry| entry.deep_uri.clone()),
            Some(None)
        );
        assert_eq!(response.get(Platform::Spotify), None);
    }

    #[test]
    fn test_assemble_ignores_orphan_uris() {
        let links = PlatformLinkSet::new();
        let mut uris = PlatformUriSet::new();
        uris.insert(Platform::Spotify, "spotify:track:abc".to_string());

        let response = assemble(&links, &uris);

        assert!(response.is_empty());
    }

    #[test]
    fn test_assemble_always_has_every_key() {
        let json = serde_json::to_value(assemble(&PlatformLinkSet::new(), &PlatformUriSet::new()))
            .unwrap();
        assert_eq!(json.as_object().map(|object| object.len()), Some(Platform::ALL.len()));
    }
}

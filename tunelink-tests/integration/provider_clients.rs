//! Real provider clients against a local upstream stand-in.

use axum::http::StatusCode;
use serde_json::json;
use tunelink_search::{Platform, PlatformEntry, SearchConfig, SearchQuery, SongSearchService};
use url::form_urlencoded::byte_serialize;

use crate::support::{Reply, Upstream, UpstreamReplies};

fn deezer_hit(id: u64) -> Reply {
    Reply::Json(json!({
        "data": [{
            "id": id,
            "title": "Papaoutai",
            "link": format!("https://www.deezer.com/track/{id}"),
            "artist": {"name": "Stromae"}
        }],
        "total": 1
    }))
}

fn song_link_hit() -> Reply {
    Reply::Json(json!({
        "entityUniqueId": "DEEZER_SONG::3135556",
        "userCountry": "FR",
        "pageUrl": "https://song.link/d/3135556",
        "entitiesByUniqueId": {
            "DEEZER_SONG::3135556": {"id": "3135556", "type": "song"},
            "SPOTIFY_SONG::0Nyh5fOCNv3ybUdVAsBx3g": {"id": "0Nyh5fOCNv3ybUdVAsBx3g", "type": "song"},
            "YOUTUBE_VIDEO::resolvedVid1": {"id": "resolvedVid1", "type": "song"},
            "ITUNES_SONG::1445883510": {"id": "1445883510", "type": "song"}
        },
        "linksByPlatform": {
            "appleMusic": {"url": "https://geo.music.apple.com/fr/album/_/1445883491?i=1445883510"},
            "soundcloud": {"url": "https://soundcloud.com/stromae/papaoutai"},
            "spotify": {"url": "https://open.spotify.com/track/0Nyh5fOCNv3ybUdVAsBx3g"}
        }
    }))
}

fn duckduckgo_page(targets: &[&str]) -> Reply {
    let anchors: String = targets
        .iter()
        .map(|target| {
            format!(
                r#"<div class="result"><a class="result__a" href="//duckduckgo.com/l/?uddg={}&amp;rut=x">hit</a></div>"#,
                byte_serialize(target.as_bytes()).collect::<String>()
            )
        })
        .collect();
    Reply::Html(format!("<html><body>{anchors}</body></html>"))
}

fn service_for(upstream: &Upstream) -> SongSearchService {
    SongSearchService::from_config(&SearchConfig::with_base_url(&upstream.base_url)).unwrap()
}

fn query() -> SearchQuery {
    SearchQuery::new("Stromae", "Papaoutai").unwrap()
}

#[tokio::test]
async fn test_end_to_end_lookup_through_http_clients() {
    let upstream = Upstream::spawn(UpstreamReplies {
        deezer: deezer_hit(3135556),
        song_link: song_link_hit(),
        duckduckgo: duckduckgo_page(&[
            "https://www.youtube.com/watch?v=scrapedVid1",
            "https://en.wikipedia.org/wiki/Papaoutai",
        ]),
    })
    .await;

    let response = service_for(&upstream).lookup(&query()).await;

    let deezer_requests = upstream.requests("deezer");
    assert_eq!(deezer_requests.len(), 1);
    assert_eq!(deezer_requests[0]["q"], "Stromae Papaoutai");

    let song_link_requests = upstream.requests("song.link");
    assert_eq!(song_link_requests.len(), 1);
    assert_eq!(song_link_requests[0]["url"], "https://www.deezer.com/track/3135556");
    assert_eq!(song_link_requests[0]["userCountry"], "FR");

    let scrape_requests = upstream.requests("duckduckgo");
    assert_eq!(
        scrape_requests[0]["q"],
        "Stromae Papaoutai site:spotify.com OR site:deezer.com OR site:youtube.com"
    );

    let entry = |platform| response.get(platform).cloned();
    assert_eq!(
        entry(Platform::Spotify).and_then(|e| e.deep_uri),
        Some("spotify:track:0Nyh5fOCNv3ybUdVAsBx3g".to_string())
    );
    assert_eq!(
        entry(Platform::Deezer).and_then(|e| e.deep_uri),
        Some("https://dzr.page.link/3135556".to_string())
    );
    // Scraped YouTube link wins over the resolved one.
    assert_eq!(
        entry(Platform::YouTube).map(|e| (e.web_url, e.deep_uri)),
        Some((
            "https://www.youtube.com/watch?v=scrapedVid1".to_string(),
            Some("vnd.youtube:scrapedVid1".to_string())
        ))
    );
    assert_eq!(
        entry(Platform::AppleMusic).map(|e| (e.web_url, e.deep_uri)),
        Some((
            "https://geo.music.apple.com/fr/album/_/1445883491?i=1445883510".to_string(),
            None
        ))
    );
    assert_eq!(
        entry(Platform::SoundCloud).map(|e| e.web_url),
        Some("https://soundcloud.com/stromae/papaoutai".to_string())
    );
}

#[tokio::test]
async fn test_empty_deezer_result_never_calls_song_link() {
    let upstream = Upstream::spawn(UpstreamReplies {
        deezer: Reply::Json(json!({"data": [], "total": 0})),
        song_link: song_link_hit(),
        duckduckgo: duckduckgo_page(&["https://open.spotify.com/track/scrapedTrack"]),
    })
    .await;

    let response = service_for(&upstream).lookup(&query()).await;

    assert!(upstream.requests("song.link").is_empty());
    assert_eq!(response.found_platforms(), vec![Platform::Spotify]);
    assert_eq!(
        response.get(Platform::Spotify).and_then(|e| e.deep_uri.clone()),
        Some("spotify:track:scrapedTrack".to_string())
    );
}

#[tokio::test]
async fn test_upstream_errors_degrade() {
    let upstream = Upstream::spawn(UpstreamReplies {
        deezer: deezer_hit(42),
        song_link: Reply::Status(StatusCode::INTERNAL_SERVER_ERROR),
        duckduckgo: Reply::Status(StatusCode::FORBIDDEN),
    })
    .await;

    let response = service_for(&upstream).lookup(&query()).await;

    assert_eq!(upstream.requests("song.link").len(), 1);
    assert_eq!(response.found_platforms(), vec![Platform::Deezer]);
    assert_eq!(
        response.get(Platform::Deezer).and_then(|e| e.deep_uri.clone()),
        Some("https://dzr.page.link/42".to_string())
    );
}

#[tokio::test]
async fn test_song_link_not_found_keeps_deezer_entry() {
    let upstream = Upstream::spawn(UpstreamReplies {
        deezer: deezer_hit(3135556),
        song_link: Reply::Status(StatusCode::NOT_FOUND),
        duckduckgo: duckduckgo_page(&[]),
    })
    .await;

    let response = service_for(&upstream).lookup(&query()).await;

    assert_eq!(upstream.requests("song.link").len(), 1);
    assert_eq!(response.found_platforms(), vec![Platform::Deezer]);
    assert_eq!(
        response.get(Platform::Deezer).cloned(),
        Some(PlatformEntry {
            web_url: "https://www.deezer.com/track/3135556".to_string(),
            deep_uri: Some("https://dzr.page.link/3135556".to_string()),
        })
    );
}

#[tokio::test]
async fn test_malformed_deezer_payload_skips_song_link() {
    let upstream = Upstream::spawn(UpstreamReplies {
        deezer: Reply::Json(json!({"error": {"type": "Exception", "message": "Quota limit exceeded", "code": 4}})),
        song_link: song_link_hit(),
        duckduckgo: duckduckgo_page(&[]),
    })
    .await;

    let response = service_for(&upstream).lookup(&query()).await;

    assert!(response.is_empty());
    assert!(upstream.requests("song.link").is_empty());
}

#[tokio::test]
async fn test_disabled_providers_are_not_contacted() {
    let upstream = Upstream::spawn(UpstreamReplies {
        deezer: deezer_hit(3135556),
        song_link: song_link_hit(),
        duckduckgo: duckduckgo_page(&["https://www.youtube.com/watch?v=scrapedVid1"]),
    })
    .await;
    let config = SearchConfig {
        enable_scrape: false,
        enable_song_link: false,
        ..SearchConfig::with_base_url(&upstream.base_url)
    };

    let response = SongSearchService::from_config(&config)
        .unwrap()
        .lookup(&query())
        .await;

    assert!(upstream.requests("song.link").is_empty());
    assert!(upstream.requests("duckduckgo").is_empty());
    assert_eq!(response.found_platforms(), vec![Platform::Deezer]);
}

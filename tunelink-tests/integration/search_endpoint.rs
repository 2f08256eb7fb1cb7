//! HTTP boundary tests for `GET /search` with mock providers.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::future::join_all;
use serde_json::{Value, json};
use tunelink_search::providers::MockProvider;
use tunelink_search::{ProviderPayload, ProviderResult, SongSearchService};

use crate::support::{get_json, router_with, send};

const PLATFORM_KEYS: [&str; 5] = ["spotify", "deezer", "youtube", "appleMusic", "soundcloud"];

fn assert_well_formed(body: &Value) {
    let object = body.as_object().expect("response should be an object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = PLATFORM_KEYS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    for (platform, entry) in object {
        if entry.is_null() {
            continue;
        }
        assert!(entry["webUrl"].is_string(), "{platform} webUrl must be a string");
        assert!(
            entry["deepUri"].is_string() || entry["deepUri"].is_null(),
            "{platform} deepUri must be a string or null"
        );
        assert_eq!(entry.as_object().map(|e| e.len()), Some(2));
    }
}

struct Mocks {
    deezer: MockProvider,
    song_link: MockProvider,
    scraper: MockProvider,
}

impl Mocks {
    fn service(&self) -> SongSearchService {
        SongSearchService::new(Arc::new(self.deezer.clone()))
            .with_song_link(Arc::new(self.song_link.clone()))
            .with_scraper(Arc::new(self.scraper.clone()))
    }

    fn total_calls(&self) -> usize {
        self.deezer.call_count() + self.song_link.call_count() + self.scraper.call_count()
    }
}

fn default_mocks() -> Mocks {
    Mocks {
        deezer: MockProvider::web_url("deezer", "https://www.deezer.com/track/3135556"),
        song_link: MockProvider::returning(
            "song.link",
            ProviderResult::Found(ProviderPayload::SongLink(tunelink_search::SongLinkPayload {
                entity_keys: vec![
                    "DEEZER_SONG::3135556".to_string(),
                    "SPOTIFY_SONG::abc123".to_string(),
                ],
                platform_urls: Default::default(),
            })),
        ),
        scraper: MockProvider::scraped(
            "duckduckgo",
            &["https://www.youtube.com/watch?v=oiKj0Z_Xnjc"],
        ),
    }
}

#[tokio::test]
async fn test_well_formed_request_returns_every_platform() {
    let mocks = default_mocks();
    let (status, body) = get_json(
        router_with(mocks.service()),
        "/search?artist=Stromae&track=Papaoutai",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_well_formed(&body);
    assert_eq!(
        body["spotify"],
        json!({"webUrl": "https://open.spotify.com/track/abc123", "deepUri": "spotify:track:abc123"})
    );
    assert_eq!(body["deezer"]["deepUri"], "https://dzr.page.link/3135556");
    assert_eq!(body["youtube"]["deepUri"], "vnd.youtube:oiKj0Z_Xnjc");
    assert!(body["appleMusic"].is_null());
    assert!(body["soundcloud"].is_null());
}

#[tokio::test]
async fn test_query_params_are_url_decoded_and_trimmed() {
    let mocks = default_mocks();
    let (status, _) = get_json(
        router_with(mocks.service()),
        "/search?artist=%20Daft%20Punk%20&track=One+More+Time",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(mocks.deezer.inputs(), vec!["Daft Punk One More Time"]);
    assert_eq!(
        mocks.scraper.inputs(),
        vec!["Daft Punk One More Time site:spotify.com OR site:deezer.com OR site:youtube.com"]
    );
}

#[tokio::test]
async fn test_malformed_requests_are_rejected_without_provider_calls() {
    let uris = [
        "/search",
        "/search?artist=Stromae",
        "/search?track=Papaoutai",
        "/search?artist=&track=Papaoutai",
        "/search?artist=Stromae&track=%20%20",
    ];

    for uri in uris {
        let mocks = default_mocks();
        let (status, body) = get_json(router_with(mocks.service()), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({"error": "artist and track are required"}), "{uri}");
        assert_eq!(mocks.total_calls(), 0, "{uri}");
    }
}

#[tokio::test]
async fn test_no_results_is_all_null_not_an_error() {
    let mocks = Mocks {
        deezer: MockProvider::not_found("deezer"),
        song_link: MockProvider::not_found("song.link"),
        scraper: MockProvider::scraped("duckduckgo", &[]),
    };

    let (status, body) = get_json(
        router_with(mocks.service()),
        "/search?artist=Nobody&track=Nothing",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_well_formed(&body);
    for key in PLATFORM_KEYS {
        assert!(body[key].is_null(), "{key} should be null");
    }
    assert_eq!(mocks.song_link.call_count(), 0);
}

#[tokio::test]
async fn test_missing_seed_falls_back_to_scrape_only() {
    let mocks = Mocks {
        deezer: MockProvider::not_found("deezer"),
        ..default_mocks()
    };

    let (status, body) = get_json(
        router_with(mocks.service()),
        "/search?artist=Stromae&track=Papaoutai",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(mocks.song_link.call_count(), 0);
    assert!(body["spotify"].is_null());
    assert!(body["deezer"].is_null());
    assert_eq!(
        body["youtube"]["webUrl"],
        "https://www.youtube.com/watch?v=oiKj0Z_Xnjc"
    );
}

#[tokio::test]
async fn test_provider_failures_degrade_to_partial_response() {
    let mocks = Mocks {
        song_link: MockProvider::failing("song.link"),
        scraper: MockProvider::failing("duckduckgo"),
        ..default_mocks()
    };

    let (status, body) = get_json(
        router_with(mocks.service()),
        "/search?artist=Stromae&track=Papaoutai",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_well_formed(&body);
    assert_eq!(body["deezer"]["webUrl"], "https://www.deezer.com/track/3135556");
    assert!(body["spotify"].is_null());
}

#[tokio::test]
async fn test_slow_provider_is_cut_off() {
    let mocks = Mocks {
        song_link: MockProvider::not_found("song.link").with_delay(Duration::from_secs(10)),
        ..default_mocks()
    };
    let service = mocks.service().with_timeout(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let (status, body) = get_json(
        router_with(service),
        "/search?artist=Stromae&track=Papaoutai",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(body["deezer"]["webUrl"], "https://www.deezer.com/track/3135556");
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interfere() {
    let deezer = MockProvider::with_handler("deezer", |query| {
        let id = query
            .strip_prefix("Artist")
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap_or("0")
            .to_string();
        Ok(ProviderResult::Found(ProviderPayload::WebUrl(format!(
            "https://www.deezer.com/track/{id}"
        ))))
    })
    .with_delay(Duration::from_millis(20));
    let app = router_with(SongSearchService::new(Arc::new(deezer.clone())));

    let requests = (1..=20).map(|i| {
        let app = app.clone();
        async move {
            let (status, body) =
                get_json(app, &format!("/search?artist=Artist{i}&track=Track{i}")).await;
            (i, status, body)
        }
    });

    for (i, status, body) in join_all(requests).await {
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deezer"]["deepUri"], format!("https://dzr.page.link/{i}"));
    }
    assert_eq!(deezer.call_count(), 20);
}

#[tokio::test]
async fn test_cors_allows_front_end_origin() {
    let request = Request::builder()
        .uri("/search?artist=Stromae&track=Papaoutai")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(router_with(default_mocks().service()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:5173")
    );
}

#[tokio::test]
async fn test_health_reports_providers() {
    let (status, body) = get_json(router_with(default_mocks().service()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["providers"], json!(["deezer", "song.link", "duckduckgo"]));
}

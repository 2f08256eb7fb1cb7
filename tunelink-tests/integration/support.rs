//! Shared helpers: routers, request helpers and a local upstream stand-in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Query, State};
use axum::http::{Request, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::Value;
use tower::ServiceExt;
use tunelink_search::SongSearchService;
use tunelink_web::{AppState, ServerConfig, build_router};

pub fn router_with(service: SongSearchService) -> Router {
    build_router(AppState::new(service), &ServerConfig::default()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, headers, json)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, request).await;
    (status, body)
}

/// Canned answer for one upstream endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Html(String),
    Status(StatusCode),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(value) => Json(value).into_response(),
            Reply::Html(html) => Html(html).into_response(),
            Reply::Status(status) => status.into_response(),
        }
    }
}

/// What the local upstream answers on each provider endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamReplies {
    pub deezer: Reply,
    pub song_link: Reply,
    pub duckduckgo: Reply,
}

#[derive(Debug)]
struct StubState {
    replies: UpstreamReplies,
    requests: Mutex<Vec<(&'static str, HashMap<String, String>)>>,
}

impl StubState {
    fn answer(&self, endpoint: &'static str, params: HashMap<String, String>, reply: &Reply) -> Response {
        self.requests.lock().unwrap().push((endpoint, params));
        reply.clone().into_response()
    }
}

/// Local HTTP server standing in for Deezer, song.link and DuckDuckGo.
pub struct Upstream {
    pub base_url: String,
    state: Arc<StubState>,
}

impl Upstream {
    pub async fn spawn(replies: UpstreamReplies) -> Self {
        let state = Arc::new(StubState {
            replies,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/search", get(deezer_search))
            .route("/v1-alpha.1/links", get(song_link_links))
            .route("/html/", get(duckduckgo_html))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{address}"),
            state,
        }
    }

    /// Query parameters received on `endpoint`, in arrival order.
    pub fn requests(&self, endpoint: &str) -> Vec<HashMap<String, String>> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == endpoint)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

async fn deezer_search(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let reply = state.replies.deezer.clone();
    state.answer("deezer", params, &reply)
}

async fn song_link_links(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let reply = state.replies.song_link.clone();
    state.answer("song.link", params, &reply)
}

async fn duckduckgo_html(
    State(state): State<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let reply = state.replies.duckduckgo.clone();
    state.answer("duckduckgo", params, &reply)
}

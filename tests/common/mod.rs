#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use moodlist::{
    config::{DEFAULT_SPOTIFY_SCOPE, OpenAiConfig, SpotifyConfig},
    types::{AuthSession, Song},
};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn temp_token_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "moodlist-test-{}-{}/token.json",
        std::process::id(),
        name
    ))
}

pub fn spotify_config(base: &str) -> SpotifyConfig {
    SpotifyConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        auth_url: format!("{base}/authorize"),
        token_url: format!("{base}/api/token"),
        api_url: format!("{base}/v1"),
        scope: DEFAULT_SPOTIFY_SCOPE.to_string(),
    }
}

pub fn openai_config(base: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_key: "sk-test".to_string(),
        api_url: base.to_string(),
        model: "gpt-4o".to_string(),
    }
}

pub fn fresh_session(access_token: &str) -> AuthSession {
    AuthSession {
        access_token: access_token.to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: DEFAULT_SPOTIFY_SCOPE.to_string(),
        expires_at: Utc::now() + TimeDelta::hours(1),
    }
}

pub fn expired_session(access_token: &str) -> AuthSession {
    AuthSession {
        expires_at: Utc::now() - TimeDelta::minutes(5),
        ..fresh_session(access_token)
    }
}

pub fn query_for(song: &Song) -> String {
    format!("track:{} artist:{}", song.title, song.artist)
}

#[derive(Debug, Default)]
pub struct SpotifyCalls {
    pub token_requests: Vec<(HashMap<String, String>, String)>,
    pub searches: Vec<(HashMap<String, String>, String)>,
    pub me_calls: usize,
    pub created: Vec<(String, Value)>,
    pub added: Vec<(String, Vec<String>)>,
}

/// In-process stand-in for the Spotify accounts service and Web API.
#[derive(Clone)]
pub struct MockSpotify {
    /// search query -> track URI
    pub catalog: Arc<HashMap<String, String>>,
    pub broken_queries: Arc<Vec<String>>,
    pub fail_create: bool,
    pub token_status: StatusCode,
    pub rotate_refresh_token: bool,
    /// Number of add-items requests that succeed before the rest fail.
    pub fail_add_after: Option<usize>,
    pub calls: Arc<Mutex<SpotifyCalls>>,
}

impl MockSpotify {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(HashMap::new()),
            broken_queries: Arc::new(Vec::new()),
            fail_create: false,
            token_status: StatusCode::OK,
            rotate_refresh_token: false,
            fail_add_after: None,
            calls: Arc::new(Mutex::new(SpotifyCalls::default())),
        }
    }

    pub fn with_tracks(mut self, tracks: &[(&Song, &str)]) -> Self {
        self.catalog = Arc::new(
            tracks
                .iter()
                .map(|(song, uri)| (query_for(song), uri.to_string()))
                .collect(),
        );
        self
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/token", post(token))
            .route("/v1/me", get(me))
            .route("/v1/search", get(search))
            .route("/v1/users/{user_id}/playlists", post(create_playlist))
            .route("/v1/playlists/{playlist_id}/tracks", post(add_tracks))
            .with_state(self.clone())
    }

    pub async fn start(&self) -> String {
        serve(self.router()).await
    }
}

fn auth_header(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn token(
    State(mock): State<MockSpotify>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let grant_type = form.get("grant_type").cloned().unwrap_or_default();
    mock.calls
        .lock()
        .unwrap()
        .token_requests
        .push((form, auth_header(&headers)));

    if mock.token_status != StatusCode::OK {
        return (mock.token_status, r#"{"error":"invalid_grant"}"#).into_response();
    }

    let access_token = if grant_type == "refresh_token" {
        "refreshed-token"
    } else {
        "access-1"
    };
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": DEFAULT_SPOTIFY_SCOPE,
    });
    if grant_type == "authorization_code" {
        body["refresh_token"] = json!("refresh-1");
    } else if mock.rotate_refresh_token {
        body["refresh_token"] = json!("refresh-2");
    }

    Json(body).into_response()
}

async fn me(State(mock): State<MockSpotify>) -> Json<Value> {
    mock.calls.lock().unwrap().me_calls += 1;
    Json(json!({ "id": "mood-user", "display_name": "Mood User" }))
}

async fn search(
    State(mock): State<MockSpotify>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    mock.calls
        .lock()
        .unwrap()
        .searches
        .push((params, auth_header(&headers)));

    if mock.broken_queries.contains(&q) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "search exploded").into_response();
    }

    let items: Vec<Value> = mock
        .catalog
        .get(&q)
        .map(|uri| {
            vec![json!({
                "id": uri.trim_start_matches("spotify:track:"),
                "name": q,
                "uri": uri,
            })]
        })
        .unwrap_or_default();

    Json(json!({ "tracks": { "items": items, "total": items.len() } })).into_response()
}

async fn create_playlist(
    State(mock): State<MockSpotify>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    mock.calls.lock().unwrap().created.push((user_id, body));

    if mock.fail_create {
        return (StatusCode::FORBIDDEN, "insufficient client scope").into_response();
    }

    Json(json!({
        "id": "pl123",
        "name": "ignored",
        "external_urls": { "spotify": "https://open.spotify.com/playlist/pl123" },
    }))
    .into_response()
}

async fn add_tracks(
    State(mock): State<MockSpotify>,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut calls = mock.calls.lock().unwrap();
    if mock.fail_add_after.is_some_and(|n| calls.added.len() >= n) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "add failed").into_response();
    }

    let uris = body["uris"]
        .as_array()
        .map(|uris| {
            uris.iter()
                .filter_map(|u| u.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    calls.added.push((playlist_id, uris));
    Json(json!({ "snapshot_id": "snap-1" })).into_response()
}

#[derive(Debug, Default)]
pub struct ChatCalls {
    pub requests: Vec<(Value, String)>,
}

/// In-process stand-in for a chat-completion endpoint.
#[derive(Clone)]
pub struct MockChat {
    pub status: StatusCode,
    /// Body returned verbatim when set, instead of a completion envelope.
    pub raw_body: Option<String>,
    pub content: String,
    pub calls: Arc<Mutex<ChatCalls>>,
}

impl MockChat {
    pub fn replying(content: &str) -> Self {
        Self {
            status: StatusCode::OK,
            raw_body: None,
            content: content.to_string(),
            calls: Arc::new(Mutex::new(ChatCalls::default())),
        }
    }

    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/chat/completions", post(chat_completion))
            .with_state(self.clone());
        serve(app).await
    }
}

async fn chat_completion(
    State(mock): State<MockChat>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.calls
        .lock()
        .unwrap()
        .requests
        .push((body, auth_header(&headers)));

    if mock.status != StatusCode::OK {
        return (mock.status, r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .into_response();
    }

    if let Some(raw) = mock.raw_body {
        return raw.into_response();
    }

    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": mock.content },
            "finish_reason": "stop",
        }],
    }))
    .into_response()
}

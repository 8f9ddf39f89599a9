use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::spotify::{AuthState, SharedSession};

pub async fn health(Extension(session): Extension<SharedSession>) -> Json<Value> {
    let authenticated = session.lock().await.state() == AuthState::Authenticated;

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": authenticated,
    }))
}

use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{Error, Result, api, spotify::SharedSession};

/// Routes of the local callback server. `callback_path` is the path of the
/// configured redirect URI.
pub fn router(session: SharedSession, callback_path: &str) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(callback_path, get(api::callback))
        .layer(Extension(session))
}

pub async fn start_api_server(
    listener: TcpListener,
    session: SharedSession,
    callback_path: &str,
) -> Result<()> {
    axum::serve(listener, router(session, callback_path))
        .await
        .map_err(|e| Error::AuthFailure(format!("callback server stopped: {e}")))
}

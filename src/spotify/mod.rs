//! # Spotify Integration Module
//!
//! Everything moodlist does against the Spotify Web API:
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow with PKCE, held per session
//!   by [`SessionManager`], including transparent token refresh
//! - [`search`] - resolves a song to the single best-matching track URI
//! - [`playlist`] - creates a playlist for the current user and fills it
//!
//! All authenticated calls go through [`SessionManager::authorized`], which
//! refreshes an expired access token before the request is built. Calls run
//! strictly one after another; track resolution in particular is sequential
//! so warnings stay in playlist order and the API's rate limits are respected.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user id
//! - `GET /search` - track lookup (`type=track`, `limit=1`)
//! - `POST /users/{user_id}/playlists` - create playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks
//! - `POST /api/token` - code exchange and refresh

use reqwest::Response;

use crate::{Error, Result};

pub mod auth;
pub mod playlist;
pub mod search;

pub use auth::{AuthState, SessionManager, SharedSession};

/// Turns a non-success response into [`Error::UpstreamUnavailable`], keeping
/// the status and body for the message.
async fn ensure_success(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::UpstreamUnavailable(format!(
        "{action} failed with {status}: {body}"
    )))
}

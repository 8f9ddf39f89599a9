//! Configuration management for moodlist.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Variables already present in the
//! process environment take precedence over the file.
//!
//! Credentials are never read lazily in the middle of an operation: the
//! command layer calls [`openai`] or [`spotify`] up front, so a missing value
//! surfaces as [`Error::Configuration`] before any network call is made.

use std::{env, net::SocketAddr, path::PathBuf};

use reqwest::Url;

use crate::{Error, Result};

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_SCOPE: &str =
    "playlist-modify-public playlist-modify-private user-read-private";

/// Loads environment variables from `<data_local_dir>/moodlist/.env`.
///
/// The directory is created if needed. A missing `.env` file is not an error,
/// since every value can also come from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/moodlist/.env`
/// - macOS: `~/Library/Application Support/moodlist/.env`
/// - Windows: `%LOCALAPPDATA%/moodlist/.env`
pub async fn load_env() -> std::result::Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodlist/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Settings for the chat-completion API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl OpenAiConfig {
    /// Reads `OPENAI_API_KEY` (required), `OPENAI_API_URL` and `OPENAI_MODEL`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_key: required(&lookup, "OPENAI_API_KEY")?,
            api_url: optional(&lookup, "OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            model: optional(&lookup, "OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        })
    }
}

/// Spotify application credentials and endpoints.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
}

impl SpotifyConfig {
    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_REDIRECT_URI` (all required) plus the optional endpoint and
    /// scope overrides.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            client_id: required(&lookup, "SPOTIFY_CLIENT_ID")?,
            client_secret: required(&lookup, "SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required(&lookup, "SPOTIFY_REDIRECT_URI")?,
            auth_url: optional(&lookup, "SPOTIFY_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            token_url: optional(&lookup, "SPOTIFY_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            api_url: optional(&lookup, "SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
            scope: optional(&lookup, "SPOTIFY_SCOPE", DEFAULT_SPOTIFY_SCOPE),
        };
        config.redirect_url()?;
        Ok(config)
    }

    pub fn redirect_url(&self) -> Result<Url> {
        Url::parse(&self.redirect_uri).map_err(|e| {
            Error::Configuration(format!(
                "SPOTIFY_REDIRECT_URI '{}' is not a valid URL: {}",
                self.redirect_uri, e
            ))
        })
    }

    /// Socket address the callback server binds to, taken from the host and
    /// port of the redirect URI.
    pub fn callback_addr(&self) -> Result<SocketAddr> {
        let url = self.redirect_url()?;
        let host = match url.host_str() {
            Some("localhost") => "127.0.0.1",
            Some(host) => host,
            None => {
                return Err(Error::Configuration(
                    "SPOTIFY_REDIRECT_URI has no host".to_string(),
                ));
            }
        };
        let port = url.port_or_known_default().unwrap_or(80);
        format!("{host}:{port}").parse().map_err(|e| {
            Error::Configuration(format!("Cannot bind callback server to {host}:{port}: {e}"))
        })
    }

    /// Path component of the redirect URI, e.g. `/callback`.
    pub fn callback_path(&self) -> Result<String> {
        Ok(self.redirect_url()?.path().to_string())
    }
}

/// Chat API settings from the process environment.
pub fn openai() -> Result<OpenAiConfig> {
    OpenAiConfig::from_vars(|key| env::var(key).ok())
}

/// Spotify settings from the process environment.
pub fn spotify() -> Result<SpotifyConfig> {
    SpotifyConfig::from_vars(|key| env::var(key).ok())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::Configuration(format!("{key} must be set"))),
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

use thiserror::Error;

/// Classified failures of the moodlist core.
///
/// Library code never panics on bad input or unreachable services; every
/// operation returns either a usable value or one of these variants.
#[derive(Debug, Error)]
pub enum Error {
    /// The chat API or Spotify was unreachable or rejected the request.
    #[error("Upstream service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Model output could not be turned into a playlist. `raw` is the text
    /// exactly as it was received.
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String, raw: String },

    /// A single song had no search match.
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Authorization failed: {0}")]
    AuthFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        Error::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }

    /// Raw model output attached to a `MalformedResponse`, for display.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Error::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::UpstreamUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

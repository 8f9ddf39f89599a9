//! Prompt construction and playlist generation.

use crate::{
    Result, extract,
    openai::ChatClient,
    types::{ChatMessage, Generation, Playlist},
};

pub const SYSTEM_PROMPT: &str = "You create short music playlists. Respond strictly in JSON with \
the keys 'title', 'description' and 'songs'. 'songs' must be a list of objects containing \
'title' and 'artist'. Include 10 to 15 songs. Do not add any explanation or extra text.";

/// Sampling temperature for generation. Output differs from run to run for
/// the same mood.
pub const TEMPERATURE: f32 = 0.7;

/// System instruction followed by the user's mood, embedded verbatim.
pub fn build_messages(mood: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("Generate a playlist for the mood: {mood}")),
    ]
}

/// Asks the model for a playlist matching `mood`.
///
/// `mood` must be non-empty; the CLI enforces this through
/// [`crate::utils::parse_mood`].
pub async fn request_playlist(client: &ChatClient, mood: &str) -> Result<Playlist> {
    let content = client.complete(build_messages(mood), TEMPERATURE).await?;
    extract::extract_playlist(&content)
}

/// Like [`request_playlist`] but never fails: upstream and parse errors are
/// returned alongside an empty playlist so the caller can show both.
pub async fn generate_playlist(client: &ChatClient, mood: &str) -> Generation {
    match request_playlist(client, mood).await {
        Ok(playlist) => Generation {
            playlist,
            failure: None,
        },
        Err(e) => Generation {
            playlist: Playlist::default(),
            failure: Some(e),
        },
    }
}

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{Playlist, SongTableRow};

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value echoed back by the authorization server to tie a callback to
/// the request that started it.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Clap value parser for the mood argument. Rejects blank input so the
/// generator is never called without a mood.
pub fn parse_mood(s: &str) -> Result<String, String> {
    let mood = s.trim();
    if mood.is_empty() {
        return Err("mood cannot be empty; describe how you feel or the vibe you want".into());
    }
    Ok(mood.to_string())
}

pub fn song_rows(playlist: &Playlist) -> Vec<SongTableRow> {
    playlist
        .songs
        .iter()
        .enumerate()
        .map(|(i, song)| SongTableRow {
            position: i + 1,
            title: song.title.clone(),
            artist: song.artist.clone(),
        })
        .collect()
}

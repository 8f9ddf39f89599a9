use reqwest::Method;

use crate::{
    Error, Result,
    spotify::{SessionManager, ensure_success},
    types::{ResolvedTrack, SearchResponse, Song},
    warning,
};

/// Search query with field filters for title and artist.
pub fn build_query(song: &Song) -> String {
    format!("track:{} artist:{}", song.title.trim(), song.artist.trim())
}

/// Looks up the best match for `song` and returns its track URI.
pub async fn search_track(session: &mut SessionManager, song: &Song) -> Result<String> {
    let query = build_query(song);

    let response = session
        .authorized(Method::GET, "search")
        .await?
        .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
        .send()
        .await?;

    let results: SearchResponse = ensure_success(response, "Track search")
        .await?
        .json()
        .await?;

    results
        .tracks
        .items
        .into_iter()
        .next()
        .map(|track| track.uri)
        .ok_or(Error::TrackNotFound(query))
}

/// Resolves one song, treating every failure as "not found".
///
/// Nothing here aborts a publish: search errors, auth errors and empty
/// results are reported as a warning and yield `remote_id: None`.
pub async fn resolve_track(session: &mut SessionManager, song: &Song) -> ResolvedTrack {
    let remote_id = match search_track(session, song).await {
        Ok(uri) => Some(uri),
        Err(e) => {
            warning!(
                "Skipping \"{}\" by {}: {}",
                song.title,
                song.artist,
                e
            );
            None
        }
    };

    ResolvedTrack {
        song: song.clone(),
        remote_id,
    }
}

use reqwest::Method;

use crate::{
    Error, Result, info,
    spotify::{SessionManager, ensure_success, search},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUserResponse, Playlist, PublishReport, RemotePlaylist,
    },
    warning,
};

/// Name used when the model returned a blank title.
pub const DEFAULT_PLAYLIST_NAME: &str = "Mood Playlist";

/// Spotify accepts at most this many URIs per add-items request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

pub async fn current_user_id(session: &mut SessionManager) -> Result<String> {
    let response = session.authorized(Method::GET, "me").await?.send().await?;
    let user: CurrentUserResponse = ensure_success(response, "Fetching current user")
        .await?
        .json()
        .await?;

    Ok(user.id)
}

/// Creates a public playlist for `user_id` named after `playlist`.
pub async fn create(
    session: &mut SessionManager,
    user_id: &str,
    playlist: &Playlist,
) -> Result<RemotePlaylist> {
    let name = match playlist.title.trim() {
        "" => DEFAULT_PLAYLIST_NAME.to_string(),
        title => title.to_string(),
    };

    let request = CreatePlaylistRequest {
        name,
        description: playlist.description.clone(),
        public: true,
        collaborative: false,
    };

    let response = session
        .authorized(Method::POST, &format!("users/{user_id}/playlists"))
        .await?
        .json(&request)
        .send()
        .await?;

    let created: CreatePlaylistResponse = ensure_success(response, "Creating playlist")
        .await?
        .json()
        .await?;

    Ok(RemotePlaylist {
        id: created.id,
        external_url: created.external_urls.spotify,
    })
}

/// Result of [`add_tracks`]. `added` counts the URIs in the requests that
/// succeeded before `failure` stopped the run.
#[derive(Debug)]
pub struct TrackAddition {
    pub added: usize,
    pub failure: Option<Error>,
}

/// Adds `uris` to the playlist in order, at most
/// [`MAX_TRACKS_PER_REQUEST`] per request. Stops at the first failed request.
pub async fn add_tracks(
    session: &mut SessionManager,
    playlist_id: &str,
    uris: &[String],
) -> TrackAddition {
    let mut added = 0;

    for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
        if let Err(e) = add_chunk(session, playlist_id, chunk).await {
            return TrackAddition {
                added,
                failure: Some(e),
            };
        }
        added += chunk.len();
    }

    TrackAddition {
        added,
        failure: None,
    }
}

async fn add_chunk(session: &mut SessionManager, playlist_id: &str, uris: &[String]) -> Result<()> {
    let request = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
    };

    let response = session
        .authorized(Method::POST, &format!("playlists/{playlist_id}/tracks"))
        .await?
        .json(&request)
        .send()
        .await?;

    let _: AddTrackToPlaylistResponse = ensure_success(response, "Adding tracks")
        .await?
        .json()
        .await?;

    Ok(())
}

/// Creates `playlist` on Spotify for the session's user.
///
/// Only the user lookup and playlist creation are fatal. Songs that cannot be
/// resolved are skipped with a warning, and a failure while adding tracks
/// still returns the playlist with the tracks added up to that point.
pub async fn publish(session: &mut SessionManager, playlist: &Playlist) -> Result<PublishReport> {
    let user_id = current_user_id(session).await?;
    let remote = create(session, &user_id, playlist).await?;

    info!("Resolving {} songs on Spotify", playlist.songs.len());

    let mut tracks = Vec::with_capacity(playlist.songs.len());
    for song in &playlist.songs {
        tracks.push(search::resolve_track(session, song).await);
    }

    let uris: Vec<String> = tracks
        .iter()
        .filter_map(|t| t.remote_id.clone())
        .collect();

    let added = if uris.is_empty() {
        warning!("No songs could be found on Spotify; the playlist is empty.");
        0
    } else {
        let addition = add_tracks(session, &remote.id, &uris).await;
        if let Some(e) = addition.failure {
            warning!(
                "Failed to add tracks to playlist after {} of {}: {}",
                addition.added,
                uris.len(),
                e
            );
        }
        addition.added
    };

    Ok(PublishReport {
        playlist: remote,
        tracks,
        added,
    })
}

use chrono::{TimeDelta, Utc};

use moodlist::{
    Error,
    types::{AuthSession, PublishReport, RemotePlaylist, ResolvedTrack, Song},
};

fn session_expiring_in(delta: TimeDelta) -> AuthSession {
    AuthSession {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        scope: String::new(),
        expires_at: Utc::now() + delta,
    }
}

#[test]
fn test_auth_session_expiry_margin() {
    let now = Utc::now();

    assert!(!session_expiring_in(TimeDelta::hours(1)).is_expired(now));
    assert!(session_expiring_in(TimeDelta::seconds(30)).is_expired(now));
    assert!(session_expiring_in(TimeDelta::seconds(-10)).is_expired(now));
}

#[test]
fn test_auth_session_round_trips_through_json() {
    let session = session_expiring_in(TimeDelta::hours(1));
    let json = serde_json::to_string(&session).unwrap();
    assert_eq!(serde_json::from_str::<AuthSession>(&json).unwrap(), session);
}

#[test]
fn test_publish_report() {
    let report = PublishReport {
        playlist: RemotePlaylist {
            id: "pl".to_string(),
            external_url: "https://open.spotify.com/playlist/pl".to_string(),
        },
        tracks: vec![
            ResolvedTrack {
                song: Song::new("A", "B"),
                remote_id: Some("spotify:track:a".to_string()),
            },
            ResolvedTrack {
                song: Song::new("C", "D"),
                remote_id: None,
            },
        ],
        added: 1,
    };

    assert_eq!(report.url(), "https://open.spotify.com/playlist/pl");
    assert_eq!(report.skipped(), vec![&Song::new("C", "D")]);
}

#[test]
fn test_error_messages() {
    let err = Error::malformed("no valid JSON object found", "raw text");
    assert_eq!(err.to_string(), "Malformed response: no valid JSON object found");
    assert_eq!(err.raw_text(), Some("raw text"));

    let err = Error::Configuration("OPENAI_API_KEY must be set".to_string());
    assert_eq!(
        err.to_string(),
        "Configuration error: OPENAI_API_KEY must be set"
    );
    assert!(err.raw_text().is_none());
}

use crate::{
    Result, config, error,
    management::TokenStore,
    spotify::{self, AuthState, SessionManager, SharedSession},
    success, warning,
};

pub async fn auth() {
    let config = match config::spotify() {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let session = SessionManager::new(config)
        .with_store(TokenStore::default())
        .shared();

    match spotify::auth::login(session).await {
        Ok(()) => success!("Authentication successful!"),
        Err(e) => error!("{}", e),
    }
}

pub async fn logout() {
    let config = match config::spotify() {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let mut session = SessionManager::restore(config, TokenStore::default()).await;
    if session.state() == AuthState::Unauthenticated {
        warning!("No stored Spotify session.");
    }

    match session.sign_out().await {
        Ok(()) => success!("Signed out of Spotify."),
        Err(e) => error!("Failed to remove stored token: {}", e),
    }
}

/// Runs the browser login when the session holds no token yet.
pub(crate) async fn login_if_needed(session: &SharedSession) -> Result<()> {
    if session.lock().await.state() == AuthState::Authenticated {
        return Ok(());
    }

    warning!("Not authorized with Spotify yet, starting login.");
    spotify::auth::login(session.clone()).await
}

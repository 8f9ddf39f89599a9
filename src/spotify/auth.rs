use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, Method, RequestBuilder, Url};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    Error, Result,
    config::SpotifyConfig,
    info,
    management::TokenStore,
    server::start_api_server,
    types::{AuthSession, TokenResponse},
    utils, warning,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);
const LOGIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Session manager shared between a command and its callback server.
pub type SharedSession = Arc<Mutex<SessionManager>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    PendingExchange,
    Authenticated,
}

#[derive(Debug)]
enum Phase {
    Unauthenticated,
    PendingExchange,
    Authenticated(AuthSession),
}

#[derive(Debug)]
struct PendingAuthorization {
    code_verifier: String,
    state: String,
}

/// Owns the OAuth token pair for one user session.
///
/// The manager is a small state machine:
///
/// - `Unauthenticated`: no token. [`authorize_url`](Self::authorize_url)
///   produces the URL the user has to visit.
/// - `PendingExchange`: an authorization code is being exchanged.
/// - `Authenticated`: a token pair is held. [`ensure_valid_token`](Self::ensure_valid_token)
///   refreshes an expired access token in place before handing it out.
///
/// A failed exchange falls back to `Unauthenticated`; a failed refresh leaves
/// the session as it was and fails the dependent call.
#[derive(Debug)]
pub struct SessionManager {
    config: SpotifyConfig,
    client: Client,
    store: Option<TokenStore>,
    phase: Phase,
    pending: Option<PendingAuthorization>,
    failure: Option<Error>,
}

impl SessionManager {
    pub fn new(config: SpotifyConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            store: None,
            phase: Phase::Unauthenticated,
            pending: None,
            failure: None,
        }
    }

    /// Starts from an already obtained token pair.
    pub fn with_session(config: SpotifyConfig, session: AuthSession) -> Self {
        Self {
            phase: Phase::Authenticated(session),
            ..Self::new(config)
        }
    }

    /// Persists every newly obtained or refreshed token pair to `store`.
    pub fn with_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds a manager from the token persisted in `store`, or an
    /// unauthenticated one if nothing usable is stored.
    pub async fn restore(config: SpotifyConfig, store: TokenStore) -> Self {
        let phase = match store.load().await {
            Ok(session) => Phase::Authenticated(session),
            Err(_) => Phase::Unauthenticated,
        };

        Self {
            phase,
            store: Some(store),
            ..Self::new(config)
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn config(&self) -> &SpotifyConfig {
        &self.config
    }

    pub fn state(&self) -> AuthState {
        match self.phase {
            Phase::Unauthenticated => AuthState::Unauthenticated,
            Phase::PendingExchange => AuthState::PendingExchange,
            Phase::Authenticated(_) => AuthState::Authenticated,
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match &self.phase {
            Phase::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Creates the authorization URL for a new login attempt.
    ///
    /// Each call generates a fresh PKCE verifier and `state` value; only the
    /// most recent pair is accepted by the callback.
    pub fn authorize_url(&mut self) -> Result<String> {
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        let state = utils::generate_state();

        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", self.config.scope.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| Error::Configuration(format!("SPOTIFY_AUTH_URL is not a valid URL: {e}")))?;

        self.pending = Some(PendingAuthorization {
            code_verifier,
            state,
        });
        self.failure = None;

        Ok(url.to_string())
    }

    /// Checks the `state` echoed by the callback against the one issued by
    /// [`authorize_url`](Self::authorize_url).
    pub fn verify_state(&self, returned: Option<&str>) -> Result<()> {
        match (&self.pending, returned) {
            (Some(pending), Some(state)) if pending.state == state => Ok(()),
            (Some(_), _) => Err(Error::AuthFailure(
                "state mismatch in authorization callback".to_string(),
            )),
            (None, _) => Err(Error::AuthFailure(
                "no authorization request in progress".to_string(),
            )),
        }
    }

    /// Records why the callback could not complete the login in progress.
    /// [`login`] returns this error instead of waiting for its timeout.
    pub fn fail_login(&mut self, error: Error) {
        self.failure = Some(error);
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// A session that is already authenticated ignores further codes.
    pub async fn exchange_code(&mut self, code: &str) -> Result<()> {
        if matches!(self.phase, Phase::Authenticated(_)) {
            info!("Session already authorized, ignoring authorization code.");
            return Ok(());
        }

        self.phase = Phase::PendingExchange;

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        if let Some(pending) = &self.pending {
            form.push(("code_verifier", pending.code_verifier.as_str()));
        }

        let result = request_token(&self.client, &self.config, &form)
            .await
            .and_then(|token| {
                let refresh_token = token.refresh_token.ok_or_else(|| {
                    Error::AuthFailure("token response has no refresh token".to_string())
                })?;

                Ok(AuthSession {
                    access_token: token.access_token,
                    refresh_token,
                    scope: token.scope.unwrap_or_default(),
                    expires_at: expires_at(token.expires_in),
                })
            });

        match result {
            Ok(session) => {
                persist(&self.store, &session).await;
                self.phase = Phase::Authenticated(session);
                self.pending = None;
                Ok(())
            }
            Err(e) => {
                self.phase = Phase::Unauthenticated;
                Err(e)
            }
        }
    }

    /// Returns an access token that is not known to be expired, refreshing
    /// it first when necessary.
    pub async fn ensure_valid_token(&mut self) -> Result<String> {
        let Phase::Authenticated(session) = &mut self.phase else {
            return Err(Error::AuthFailure(
                "not authorized with Spotify, run `moodlist auth` first".to_string(),
            ));
        };

        if session.is_expired(Utc::now()) {
            let token = request_token(
                &self.client,
                &self.config,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", session.refresh_token.as_str()),
                ],
            )
            .await?;

            session.access_token = token.access_token;
            // Spotify only rotates the refresh token sometimes
            if let Some(refresh_token) = token.refresh_token {
                session.refresh_token = refresh_token;
            }
            if let Some(scope) = token.scope {
                session.scope = scope;
            }
            session.expires_at = expires_at(token.expires_in);

            persist(&self.store, session).await;
        }

        Ok(session.access_token.clone())
    }

    /// Request builder for `{api_url}/{path}` carrying a valid bearer token.
    pub async fn authorized(&mut self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.ensure_valid_token().await?;
        let url = format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Forgets the session and removes the persisted token.
    pub async fn sign_out(&mut self) -> std::result::Result<(), String> {
        self.phase = Phase::Unauthenticated;
        self.pending = None;
        match &self.store {
            Some(store) => store.clear().await,
            None => Ok(()),
        }
    }
}

/// Runs the interactive authorization-code flow.
///
/// Binds the callback server on the redirect URI's address, opens the
/// authorization URL in the browser and waits until the callback has
/// authenticated `session`. A callback that fails the login ends the wait
/// with its error.
pub async fn login(session: SharedSession) -> Result<()> {
    login_with(session, |url| webbrowser::open(url).is_ok()).await
}

/// [`login`] with a custom way of presenting the authorization URL.
/// `open_browser` returns false when the URL could not be opened.
pub async fn login_with<F>(session: SharedSession, open_browser: F) -> Result<()>
where
    F: FnOnce(&str) -> bool,
{
    let mut guard = session.lock().await;
    let addr = guard.config().callback_addr()?;
    let callback_path = guard.config().callback_path()?;
    let auth_url = guard.authorize_url()?;
    drop(guard);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        Error::Configuration(format!("Cannot bind callback server to {addr}: {e}"))
    })?;

    let server_session = Arc::clone(&session);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, server_session, &callback_path).await {
            warning!("{}", e);
        }
    });

    if open_browser(&auth_url) {
        info!("Waiting for authorization in your browser...");
    } else {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        );
    }

    let result = wait_for_authorization(&session).await;
    server.abort();

    result
}

async fn wait_for_authorization(session: &SharedSession) -> Result<()> {
    let start = Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        {
            let mut guard = session.lock().await;
            if guard.state() == AuthState::Authenticated {
                return Ok(());
            }
            if let Some(failure) = guard.failure.take() {
                return Err(failure);
            }
        }
        tokio::time::sleep(LOGIN_POLL_INTERVAL).await;
    }

    Err(Error::AuthFailure(
        "timed out waiting for the authorization callback".to_string(),
    ))
}

async fn request_token(
    client: &Client,
    config: &SpotifyConfig,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = client
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(form)
        .send()
        .await
        .map_err(|e| Error::AuthFailure(format!("token endpoint unreachable: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::AuthFailure(format!("cannot read token response: {e}")))?;

    if !status.is_success() {
        return Err(Error::AuthFailure(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| Error::AuthFailure(format!("unexpected token response ({e})")))
}

fn expires_at(expires_in: i64) -> DateTime<Utc> {
    Utc::now() + TimeDelta::try_seconds(expires_in).unwrap_or(TimeDelta::hours(1))
}

async fn persist(store: &Option<TokenStore>, session: &AuthSession) {
    if let Some(store) = store {
        if let Err(e) = store.persist(session).await {
            warning!("Failed to save token to cache: {}", e);
        }
    }
}

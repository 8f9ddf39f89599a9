use axum::{Extension, extract::Query, response::Html};
use serde::Deserialize;

use crate::{
    Error,
    spotify::{AuthState, SharedSession},
    warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

const SUCCESS_PAGE: &str =
    "<h2>Authentication successful.</h2><p>You can close this browser window.</p>";

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(session): Extension<SharedSession>,
) -> Html<&'static str> {
    if let Some(error) = params.error {
        warning!("Authorization was denied: {}", error);
        session
            .lock()
            .await
            .fail_login(Error::AuthFailure(format!("authorization denied: {error}")));
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.code else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut session = session.lock().await;
    // a reload of the redirect page must not replay the code
    if session.state() == AuthState::Authenticated {
        return Html(SUCCESS_PAGE);
    }

    if let Err(e) = session.verify_state(params.state.as_deref()) {
        warning!("{}", e);
        session.fail_login(e);
        return Html("<h4>Login failed.</h4>");
    }

    match session.exchange_code(&code).await {
        Ok(()) => Html(SUCCESS_PAGE),
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            session.fail_login(e);
            Html("<h4>Login failed.</h4>")
        }
    }
}

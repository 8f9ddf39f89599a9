//! # API Module
//!
//! HTTP handlers served by the local callback server during login.
//!
//! - [`callback`] - receives Spotify's redirect, checks the `state` value and
//!   exchanges the authorization code on the shared session
//! - [`health`] - reports status, version and whether the session is
//!   authenticated
//!
//! Both handlers get the session through an `Extension<SharedSession>` layer;
//! see [`crate::server::router`].

mod callback;
mod health;

pub use callback::{CallbackParams, callback};
pub use health::health;

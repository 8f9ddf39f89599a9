//! # CLI Module
//!
//! User-facing commands. Each command loads its configuration first, so a
//! missing credential is reported before any network call, then delegates to
//! the core modules and renders the result.
//!
//! - [`generate`] - generate a playlist for a mood, optionally publishing it
//! - [`auth`] - run the Spotify login and store the token
//! - [`logout`] - remove the stored token
//!
//! ```bash
//! moodlist generate "melancholy rainy afternoon"
//! moodlist generate "sunday morning coffee" --publish
//! moodlist auth
//! ```

mod auth;
mod generate;

pub use auth::auth;
pub use auth::logout;
pub use generate::generate;

//! Mood-based playlist generator.
//!
//! Turns a free-text mood into a short playlist by prompting a chat-completion
//! model, and optionally publishes that playlist to Spotify on the user's
//! behalf.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `extract` - Recovers a typed playlist from free-form model output
//! - `generator` - Prompt construction and playlist generation
//! - `management` - Token persistence
//! - `openai` - Chat-completion HTTP client
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Authorization session, track search and playlist publishing
//! - `types` - Data structures and wire types
//! - `utils` - PKCE helpers, input parsing and table rows
//!
//! # Example
//!
//! ```
//! use moodlist::{config, generator, openai::ChatClient};
//!
//! #[tokio::main]
//! async fn main() -> moodlist::Result<()> {
//!     config::load_env().await.ok();
//!     let client = ChatClient::new(config::openai()?)?;
//!     let playlist = generator::request_playlist(&client, "sunny road trip").await?;
//!     println!("{}", playlist.title);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod management;
pub mod openai;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Resolving {} songs", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created: {}", url);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the CLI layer uses this; library code returns [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Missing configuration: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems such as a song that could not be found on
/// Spotify.
///
/// # Example
///
/// ```
/// warning!("Skipping \"{}\": no match", title);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

//! # Chat Completion Module
//!
//! Minimal client for an OpenAI-compatible `chat/completions` endpoint. Only
//! the textual content of the first choice is consumed; everything else in the
//! response is treated as opaque.
//!
//! Transport failures and non-success statuses map to
//! [`crate::Error::UpstreamUnavailable`]. A response body that is not a chat
//! completion, or one without message content, maps to
//! [`crate::Error::MalformedResponse`] with the body attached.

mod chat;

pub use chat::ChatClient;

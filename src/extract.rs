//! Recovers a [`Playlist`] from free-form chat-completion text.
//!
//! Models are asked for bare JSON but regularly wrap it in a code fence or
//! add a sentence before or after it. Extraction runs in two stages:
//!
//! 1. [`strip_code_fence`] removes a leading fence line (with an optional
//!    language tag) and a trailing fence.
//! 2. [`json_object_span`] picks the greedy span from the first `{` to the
//!    last `}`, dropping any surrounding prose.
//!
//! If no span is found the whole stripped text is parsed as-is.

use serde_json::Value;

use crate::{Error, Result, types::Playlist};

const FENCE: &str = "```";

/// Strips a surrounding code fence, if the text starts with one.
///
/// The opening fence line is removed up to and including its newline, so a
/// language tag such as `json` goes with it. A closing fence at the end of the
/// text is removed as well. The result is trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        // single-line fence, e.g. ```{"title": ...}```
        None => rest,
    };

    body.trim_end()
        .strip_suffix(FENCE)
        .unwrap_or(body)
        .trim()
}

/// Returns the greedy `{ ... }` span of `text`, if any.
pub fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses raw model output into a playlist.
///
/// Missing `title`/`description` become empty strings and missing `songs`
/// becomes an empty list. The number of songs is not checked. Any failure is
/// reported as [`Error::MalformedResponse`] carrying `raw` unchanged.
pub fn extract_playlist(raw: &str) -> Result<Playlist> {
    let unfenced = strip_code_fence(raw);
    let candidate = json_object_span(unfenced).unwrap_or(unfenced);

    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| Error::malformed(format!("no valid JSON object found ({e})"), raw))?;

    if !value.is_object() {
        return Err(Error::malformed("expected a JSON object at top level", raw));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::malformed(format!("unexpected playlist shape ({e})"), raw))
}

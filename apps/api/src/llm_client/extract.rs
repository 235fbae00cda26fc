//! Best-effort structured extraction from LLM completions.
//!
//! The model is asked for JSON but nothing guarantees it. Every caller goes through
//! `parse_or_else`, which never surfaces a parse failure: it logs and substitutes a
//! typed fallback instead.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```JSON"))
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// Parses `raw` as `T` after fence stripping, or returns `fallback()` on failure.
pub fn parse_or_else<T, F>(raw: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let body = strip_json_fences(raw);
    match serde_json::from_str::<T>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "Unparseable LLM output ({e}); using fallback. First 200 chars: {:?}",
                body.chars().take(200).collect::<String>()
            );
            fallback()
        }
    }
}

/// `parse_or_else` with `T::default()` as the fallback.
pub fn parse_or_default<T>(raw: &str) -> T
where
    T: DeserializeOwned + Default,
{
    parse_or_else(raw, T::default)
}

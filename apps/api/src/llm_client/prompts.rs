// Cross-cutting prompt fragments shared by every module that talks to the LLM.
// Module-specific prompts live in a prompts.rs next to their caller.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Maximum number of document characters forwarded to the model in one prompt.
pub const MAX_PROMPT_DOCUMENT_CHARS: usize = 8000;

/// Truncates `text` to at most `MAX_PROMPT_DOCUMENT_CHARS` characters on a char boundary.
pub fn truncate_document(text: &str) -> &str {
    match text.char_indices().nth(MAX_PROMPT_DOCUMENT_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

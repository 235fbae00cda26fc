//! Skill extractor: asks the LLM for a JSON array of skills in a document.

use std::collections::HashSet;

use crate::errors::AppError;
use crate::llm_client::extract::parse_or_default;
use crate::llm_client::prompts::{truncate_document, JSON_ONLY_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::resume::prompts::SKILL_EXTRACTION_PROMPT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

impl DocumentKind {
    fn label(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::JobDescription => "job description",
        }
    }
}

/// Extracts a normalized skill list from `text`.
///
/// A reply that is not a JSON array of strings yields an empty list; only a failed
/// call to the service itself is an error.
pub async fn extract_skills(
    llm: &dyn TextGenerator,
    text: &str,
    kind: DocumentKind,
) -> Result<Vec<String>, AppError> {
    let prompt = SKILL_EXTRACTION_PROMPT
        .replace("{document_kind}", kind.label())
        .replace("{document_text}", truncate_document(text));

    let raw = llm
        .generate(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Skill extraction ({}) failed: {e}", kind.label())))?;

    let skills: Vec<String> = parse_or_default(&raw);
    Ok(normalize_skills(skills))
}

/// Trims, drops blanks, and removes case-insensitive duplicates keeping the first spelling.
fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::prompts::MAX_PROMPT_DOCUMENT_CHARS;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned replies in order and records every prompt it receives.
    pub(crate) struct StubGenerator {
        replies: Mutex<Vec<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        pub(crate) fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or(LlmError::EmptyContent)
        }
    }

    pub(crate) struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_fenced_array_is_parsed() {
        let llm = StubGenerator::new(&["```json\n[\"Python\", \"AWS\"]\n```"]);
        let skills = extract_skills(&llm, "jd text", DocumentKind::JobDescription)
            .await
            .unwrap();
        assert_eq!(skills, vec!["Python", "AWS"]);
    }

    #[tokio::test]
    async fn test_prose_reply_degrades_to_empty() {
        let llm = StubGenerator::new(&["I found these skills: Python and AWS."]);
        let skills = extract_skills(&llm, "resume", DocumentKind::Resume).await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn test_object_reply_degrades_to_empty() {
        let llm = StubGenerator::new(&[r#"{"skills": ["Python"]}"#]);
        let skills = extract_skills(&llm, "resume", DocumentKind::Resume).await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn test_service_failure_is_llm_error() {
        let result = extract_skills(&FailingGenerator, "resume", DocumentKind::Resume).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_prompt_truncates_document() {
        let llm = StubGenerator::new(&["[]"]);
        let long_text = format!("{}TAIL_MARKER", "x".repeat(MAX_PROMPT_DOCUMENT_CHARS));
        extract_skills(&llm, &long_text, DocumentKind::Resume)
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("resume"));
        assert!(!prompts[0].contains("TAIL_MARKER"));
        assert!(prompts[0].contains(&"x".repeat(MAX_PROMPT_DOCUMENT_CHARS)));
    }

    #[test]
    fn test_normalize_dedupes_case_insensitively() {
        let raw = vec![
            " Python ".to_string(),
            "python".to_string(),
            "".to_string(),
            "SQL".to_string(),
        ];
        assert_eq!(normalize_skills(raw), vec!["Python", "SQL"]);
    }
}

//! LLM-written resume feedback and match advice.
//!
//! Both degrade to the model's raw text when its reply is not the JSON we asked for.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::extract::parse_or_else;
use crate::llm_client::prompts::{truncate_document, JSON_ONLY_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::resume::prompts::{MATCH_ADVICE_PROMPT, RESUME_FEEDBACK_PROMPT, RESUME_FEEDBACK_SYSTEM};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedback {
    /// Required: a reply without it is not feedback and falls back to raw text.
    pub overall_impression: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub formatting_suggestions: Vec<String>,
    #[serde(default)]
    pub missing_sections: Vec<String>,
    #[serde(default)]
    pub ats_tips: Vec<String>,
}

impl ResumeFeedback {
    /// Fallback when the model did not return the schema: keep what it said.
    pub fn from_raw_text(raw: &str) -> Self {
        Self {
            overall_impression: raw.trim().to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatchAdvice {
    Structured { feedback: String },
    Plain(String),
}

impl MatchAdvice {
    fn into_text(self) -> String {
        match self {
            MatchAdvice::Structured { feedback } | MatchAdvice::Plain(feedback) => feedback,
        }
    }
}

pub async fn generate_resume_feedback(
    llm: &dyn TextGenerator,
    resume_text: &str,
) -> Result<ResumeFeedback, AppError> {
    let prompt = RESUME_FEEDBACK_PROMPT.replace("{resume_text}", truncate_document(resume_text));
    let raw = llm
        .generate(&prompt, RESUME_FEEDBACK_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume feedback failed: {e}")))?;

    Ok(parse_or_else(&raw, || ResumeFeedback::from_raw_text(&raw)))
}

pub async fn generate_match_advice(
    llm: &dyn TextGenerator,
    matched: &[String],
    missing: &[String],
    match_score: &str,
) -> Result<String, AppError> {
    let prompt = MATCH_ADVICE_PROMPT
        .replace("{match_score}", match_score)
        .replace("{matched_skills}", &list_or_none(matched))
        .replace("{missing_skills}", &list_or_none(missing));

    let raw = llm
        .generate(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Match advice failed: {e}")))?;

    Ok(parse_or_else(&raw, || MatchAdvice::Plain(raw.trim().to_string())).into_text())
}

fn list_or_none(skills: &[String]) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.join(", ")
    }
}

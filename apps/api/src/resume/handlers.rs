//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::resume::feedback::{generate_match_advice, generate_resume_feedback, ResumeFeedback};
use crate::resume::matcher::match_skills;
use crate::resume::skills::{extract_skills, DocumentKind};
use crate::resume::upload::{collect_pdfs, read_pdf_text};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JD_FIELD: &str = "jobDescription";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedbackResponse {
    pub feedback: ResumeFeedback,
    pub static_feedback: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMatchResponse {
    pub match_score: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub jd_skills: Vec<String>,
    pub feedback: String,
}

/// POST /api/v1/resume/feedback
///
/// Multipart field `resume` (PDF). Returns LLM feedback plus the static rule checks.
pub async fn handle_resume_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ResumeFeedbackResponse>, AppError> {
    let uploads = collect_pdfs(&mut multipart, &[RESUME_FIELD]).await?;
    let resume = uploads
        .get(RESUME_FIELD)
        .ok_or_else(|| AppError::Validation("missing resume upload".to_string()))?;

    let resume_text = read_pdf_text(resume).await?;
    let static_feedback = state.analyzer.analyze(&resume_text);
    let feedback = generate_resume_feedback(state.llm.as_ref(), &resume_text).await?;

    info!(
        "Resume feedback for user {} ({} chars)",
        auth.user_id,
        resume_text.chars().count()
    );
    Ok(Json(ResumeFeedbackResponse {
        feedback,
        static_feedback,
    }))
}

/// POST /api/v1/resume/match
///
/// Multipart fields `resume` and `jobDescription` (PDFs). Extracts skills from both,
/// compares them, and asks the LLM for tailoring advice.
pub async fn handle_resume_match(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ResumeMatchResponse>, AppError> {
    let uploads = collect_pdfs(&mut multipart, &[RESUME_FIELD, JD_FIELD]).await?;
    let (Some(resume), Some(jd)) = (uploads.get(RESUME_FIELD), uploads.get(JD_FIELD)) else {
        return Err(AppError::Validation(
            "both resume and jobDescription uploads are required".to_string(),
        ));
    };

    let resume_text = read_pdf_text(resume).await?;
    let jd_text = read_pdf_text(jd).await?;

    let llm = state.llm.as_ref();
    let (resume_skills, jd_skills) = tokio::try_join!(
        extract_skills(llm, &resume_text, DocumentKind::Resume),
        extract_skills(llm, &jd_text, DocumentKind::JobDescription),
    )?;

    let result = match_skills(&resume_skills, &jd_skills);
    let feedback = generate_match_advice(
        llm,
        &result.matched_skills,
        &result.missing_skills,
        &result.match_score,
    )
    .await?;

    info!(
        "Resume match for user {}: {} ({} of {} JD skills)",
        auth.user_id,
        result.match_score,
        result.matched_skills.len(),
        jd_skills.len()
    );
    Ok(Json(ResumeMatchResponse {
        match_score: result.match_score,
        matched_skills: result.matched_skills,
        missing_skills: result.missing_skills,
        jd_skills,
        feedback,
    }))
}

//! Axum route handlers for the Jobs API. Every handler requires an authenticated caller.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::jobs::analytics::{compute_analytics, AnalyticsSummary, TimeWindow};
use crate::jobs::ownership::load_owned;
use crate::models::job::{JobApplication, JobApplicationPatch, JobStatus, NewJobApplication};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    pub time_range: Option<String>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NewJobApplication>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let job = req.into_job(auth.user_id, Utc::now())?;
    state.jobs.insert(&job).await?;
    info!("User {} created job application {}", auth.username, job.id);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?status=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<JobStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let jobs = state.jobs.list_for_user(auth.user_id, status).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplication>, AppError> {
    let job = load_owned(state.jobs.as_ref(), id, auth.user_id).await?;
    Ok(Json(job))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobApplicationPatch>,
) -> Result<Json<JobApplication>, AppError> {
    let mut job = load_owned(state.jobs.as_ref(), id, auth.user_id).await?;
    job.apply(patch, Utc::now())?;
    state.jobs.update(&job).await?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    load_owned(state.jobs.as_ref(), id, auth.user_id).await?;
    if state.jobs.delete(id, auth.user_id).await? == 0 {
        return Err(AppError::NotFound(format!("Job application {id} not found")));
    }
    info!("User {} deleted job application {id}", auth.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/analytics?timeRange=last30days|last90days|all
pub async fn handle_job_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let window = TimeWindow::from_param(params.time_range.as_deref());
    let now = Utc::now();
    let records = state
        .jobs
        .list_applied_since(auth.user_id, window.start(now))
        .await?;
    Ok(Json(compute_analytics(&records, window, now)))
}

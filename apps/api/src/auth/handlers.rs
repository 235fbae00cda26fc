//! Axum route handlers for the Auth API.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::auth::password::{hash_secret, normalize_answer, verify_secret};
use crate::auth::users::{self, CredentialUpdate, NewUser};
use crate::auth::validation::{check_password, normalize_email, normalize_username, require_field};
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid username or password";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub identifier: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub security_question: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub identifier: String,
    pub security_answer: String,
    pub new_password: String,
    /// Optional replacement question; requires `new_security_answer`.
    #[serde(default)]
    pub new_security_question: Option<String>,
    #[serde(default)]
    pub new_security_answer: Option<String>,
}

/// Validated reset inputs, checked before any lookup and hashed only after the
/// current answer is verified.
#[derive(Debug, PartialEq)]
struct ResetPlan {
    new_password: String,
    security_question: Option<String>,
    /// Normalized, not yet hashed.
    security_answer: Option<String>,
}

impl ResetPlan {
    fn from_request(req: &ResetPasswordRequest) -> Result<Self, AppError> {
        check_password(&req.new_password)?;
        let security_question = req
            .new_security_question
            .as_deref()
            .map(|q| require_field("newSecurityQuestion", q))
            .transpose()?;
        let security_answer = req
            .new_security_answer
            .as_deref()
            .map(|a| require_field("newSecurityAnswer", a).map(|a| normalize_answer(&a)))
            .transpose()?;
        if security_question.is_some() && security_answer.is_none() {
            return Err(AppError::Validation(
                "newSecurityAnswer is required when changing the security question".to_string(),
            ));
        }
        Ok(Self {
            new_password: req.new_password.clone(),
            security_question,
            security_answer,
        })
    }

    fn hash(self) -> Result<CredentialUpdate, AppError> {
        Ok(CredentialUpdate {
            password_hash: hash_secret(&self.new_password)?,
            security_question: self.security_question,
            security_answer_hash: self
                .security_answer
                .as_deref()
                .map(hash_secret)
                .transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = normalize_username(&req.username)?;
    let email = normalize_email(&req.email)?;
    let name = require_field("name", &req.name)?;
    let security_question = require_field("securityQuestion", &req.security_question)?;
    let security_answer = require_field("securityAnswer", &req.security_answer)?;
    check_password(&req.password)?;

    if users::find_by_username(&state.db, &username).await?.is_some() {
        return Err(AppError::Validation("username is already taken".to_string()));
    }
    if users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation("email is already registered".to_string()));
    }

    let password_hash = hash_secret(&req.password)?;
    let security_answer_hash = hash_secret(&normalize_answer(&security_answer))?;

    let now = Utc::now();
    let user = users::insert_user(
        &state.db,
        NewUser {
            username: &username,
            name: &name,
            email: &email,
            password_hash: &password_hash,
            security_question: &security_question,
            security_answer_hash: &security_answer_hash,
        },
        now,
    )
    .await
    .map_err(|e| match e {
        // Lost a race with a concurrent signup for the same username or email.
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation("username or email is already registered".to_string())
        }
        other => AppError::Database(other),
    })?;

    info!("Registered user {} ({})", user.username, user.id);
    let response = issue_session(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = users::find_by_identifier(&state.db, &req.identifier)
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !verify_secret(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    Ok(Json(issue_session(&state, &user)?))
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let user = users::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    Ok(Json(UserProfile::from(&user)))
}

/// POST /api/v1/auth/forgot-password
///
/// Returns the account's security question so the client can prompt for the answer.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let user = users::find_by_identifier(&state.db, &req.identifier)
        .await?
        .ok_or_else(|| AppError::NotFound("No account matches that identifier".to_string()))?;
    Ok(Json(ForgotPasswordResponse {
        security_question: user.security_question,
    }))
}

/// POST /api/v1/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let plan = ResetPlan::from_request(&req)?;

    let user = users::find_by_identifier(&state.db, &req.identifier)
        .await?
        .ok_or_else(|| AppError::NotFound("No account matches that identifier".to_string()))?;

    let answer = normalize_answer(&req.security_answer);
    if !verify_secret(&answer, &user.security_answer_hash)? {
        return Err(AppError::Unauthorized("Security answer is incorrect".to_string()));
    }

    let changes_answer = plan.security_answer.is_some();
    let update = plan.hash()?;
    users::update_credentials(&state.db, user.id, &update, Utc::now()).await?;

    info!(
        "Password reset for user {} (security answer changed: {changes_answer})",
        user.id
    );
    Ok(Json(json!({ "message": "Password has been reset" })))
}

fn issue_session(state: &AppState, user: &UserRow) -> Result<AuthResponse, AppError> {
    let token = state.jwt.issue(user.id, &user.username, Utc::now())?;
    Ok(AuthResponse {
        token,
        user: UserProfile::from(user),
    })
}

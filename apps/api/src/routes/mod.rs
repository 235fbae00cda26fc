pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::jobs::handlers as jobs;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route(
            "/api/v1/auth/forgot-password",
            post(auth::handle_forgot_password),
        )
        .route(
            "/api/v1/auth/reset-password",
            post(auth::handle_reset_password),
        )
        // Jobs API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/analytics", get(jobs::handle_job_analytics))
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Resume API
        .route(
            "/api/v1/resume/feedback",
            post(resume::handle_resume_feedback),
        )
        .route("/api/v1/resume/match", post(resume::handle_resume_match))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use chrono::Utc;
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::token::JwtKeys;
    use crate::config::Config;
    use crate::jobs::store::tests::MemoryJobStore;
    use crate::jobs::store::PgJobStore;
    use crate::models::job::{JobApplication, JobStatus, JobType, WorkMode};
    use crate::resume::skills::tests::StubGenerator;
    use crate::resume::static_analyzer::StaticAnalyzer;

    const SECRET: &[u8] = b"router-test-secret";
    const BOUNDARY: &str = "XTESTBOUNDARY";

    /// State over a pool that never connects; only routes that reject before
    /// touching storage are exercised here.
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/applytrack_test".to_string(),
            jwt_secret: String::from_utf8_lossy(SECRET).to_string(),
            anthropic_api_key: "unused".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_upload_bytes: 1024 * 1024,
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState {
            jobs: Arc::new(PgJobStore::new(db.clone())),
            db,
            llm: Arc::new(StubGenerator::new(&[])),
            jwt: JwtKeys::new(SECRET),
            analyzer: Arc::new(StaticAnalyzer::default()),
            config,
        }
    }

    fn state_with_jobs(store: Arc<MemoryJobStore>) -> AppState {
        AppState {
            jobs: store,
            ..test_state()
        }
    }

    fn bearer() -> String {
        bearer_for(Uuid::new_v4())
    }

    fn bearer_for(user_id: Uuid) -> String {
        let token = JwtKeys::new(SECRET)
            .issue(user_id, "tester", Utc::now())
            .unwrap();
        format!("Bearer {token}")
    }

    fn job_owned_by(user_id: Uuid) -> JobApplication {
        let applied = Utc::now();
        JobApplication {
            id: Uuid::new_v4(),
            user_id,
            company: "Acme".into(),
            role: "SDE".into(),
            pay: "20 LPA".into(),
            date_applied: applied,
            interview_date: None,
            job_type: JobType::FullTime,
            status: JobStatus::Applied,
            mode: WorkMode::OffCampus,
            notes: String::new(),
            created_at: applied,
            updated_at: applied,
            status_updated_at: applied,
        }
    }

    fn job_request(method: &str, id: Uuid, token: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(format!("/api/v1/jobs/{id}"))
            .header(header::AUTHORIZATION, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, content_type, bytes) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                     filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, parts: &[(&str, &str, &str, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, bearer())
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    async fn error_code(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        json["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_jobs_require_token() {
        for uri in ["/api/v1/jobs", "/api/v1/jobs/analytics?timeRange=last30days"] {
            let response = build_router(test_state())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(error_code(response).await, "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_mutations_with_bad_token_are_rejected() {
        let id = Uuid::new_v4();
        for method in ["PUT", "DELETE"] {
            let response = build_router(test_state())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(format!("/api/v1/jobs/{id}"))
                        .header(header::AUTHORIZATION, "Bearer not-a-token")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_resume_feedback_rejects_non_pdf() {
        let request = upload_request(
            "/api/v1/resume/feedback",
            &[("resume", "resume.txt", "text/plain", &b"Summary\nSkills"[..])],
        );
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_resume_match_requires_both_files() {
        let request = upload_request(
            "/api/v1/resume/match",
            &[("resume", "resume.pdf", "application/pdf", &b"%PDF-1.4"[..])],
        );
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resume_feedback_rejects_unreadable_pdf() {
        let request = upload_request(
            "/api/v1/resume/feedback",
            &[("resume", "resume.pdf", "application/pdf", &b"not really a pdf"[..])],
        );
        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_validates_before_storage() {
        let body = r#"{
            "username": "no spaces allowed",
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter22",
            "securityQuestion": "Pet?",
            "securityAnswer": "Fluffy"
        }"#;
        let response = build_router(test_state())
            .oneshot(
                Request::post("/api/v1/auth/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_user_cannot_update_or_delete() {
        let owner = Uuid::new_v4();
        let job = job_owned_by(owner);
        let store = Arc::new(MemoryJobStore::with_jobs(vec![job.clone()]));
        let intruder = bearer_for(Uuid::new_v4());

        let response = build_router(state_with_jobs(store.clone()))
            .oneshot(job_request("PUT", job.id, &intruder, r#"{"status": "offered"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = build_router(state_with_jobs(store.clone()))
            .oneshot(job_request("DELETE", job.id, &intruder, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get(job.id), Some(job));
    }

    #[tokio::test]
    async fn test_owner_can_update_then_delete() {
        let owner = Uuid::new_v4();
        let job = job_owned_by(owner);
        let store = Arc::new(MemoryJobStore::with_jobs(vec![job.clone()]));
        let token = bearer_for(owner);

        let response = build_router(state_with_jobs(store.clone()))
            .oneshot(job_request("PUT", job.id, &token, r#"{"status": "interview"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.get(job.id).unwrap().status, JobStatus::Interview);

        let response = build_router(state_with_jobs(store.clone()))
            .oneshot(job_request("DELETE", job.id, &token, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(store.get(job.id).is_none());
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let store = Arc::new(MemoryJobStore::default());
        let response = build_router(state_with_jobs(store))
            .oneshot(job_request("GET", Uuid::new_v4(), &bearer(), ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_password_validates_before_storage() {
        let body = r#"{
            "identifier": "ada",
            "securityAnswer": "fluffy",
            "newPassword": "hunter22",
            "newSecurityQuestion": "First car?"
        }"#;
        let response = build_router(test_state())
            .oneshot(
                Request::post("/api/v1/auth/reset-password")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

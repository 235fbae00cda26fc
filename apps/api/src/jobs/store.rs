use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::{JobApplication, JobApplicationRow, JobStatus};

/// Persistence for job applications. `PgJobStore` in production, an in-memory map in tests.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: &JobApplication) -> Result<(), AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>, AppError>;

    /// All of a user's applications, newest first, optionally narrowed to one status.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<JobStatus>,
    ) -> Result<Vec<JobApplication>, AppError>;

    /// A user's applications with `date_applied >= since`.
    async fn list_applied_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<JobApplication>, AppError>;

    /// Writes every mutable column, scoped to `job.user_id`.
    async fn update(&self, job: &JobApplication) -> Result<(), AppError>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: &JobApplication) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, user_id, company, role, pay, date_applied, interview_date, job_type,
                 status, mode, notes, created_at, updated_at, status_updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(job.id)
        .bind(job.user_id)
        .bind(&job.company)
        .bind(&job.role)
        .bind(&job.pay)
        .bind(job.date_applied)
        .bind(job.interview_date)
        .bind(job.job_type.as_str())
        .bind(job.status.as_str())
        .bind(job.mode.as_str())
        .bind(&job.notes)
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(job.status_updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>, AppError> {
        sqlx::query_as::<_, JobApplicationRow>("SELECT * FROM job_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(JobApplication::try_from)
            .transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        status: Option<JobStatus>,
    ) -> Result<Vec<JobApplication>, AppError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            SELECT * FROM job_applications
            WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
            ORDER BY date_applied DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(JobApplication::try_from).collect()
    }

    async fn list_applied_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<JobApplication>, AppError> {
        let rows = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            SELECT * FROM job_applications
            WHERE user_id = $1 AND date_applied >= $2
            ORDER BY date_applied ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(JobApplication::try_from).collect()
    }

    async fn update(&self, job: &JobApplication) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE job_applications
            SET company = $1, role = $2, pay = $3, date_applied = $4, interview_date = $5,
                job_type = $6, status = $7, mode = $8, notes = $9,
                updated_at = $10, status_updated_at = $11
            WHERE id = $12 AND user_id = $13
            "#,
        )
        .bind(&job.company)
        .bind(&job.role)
        .bind(&job.pay)
        .bind(job.date_applied)
        .bind(job.interview_date)
        .bind(job.job_type.as_str())
        .bind(job.status.as_str())
        .bind(job.mode.as_str())
        .bind(&job.notes)
        .bind(job.updated_at)
        .bind(job.status_updated_at)
        .bind(job.id)
        .bind(job.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

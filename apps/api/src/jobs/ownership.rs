use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::models::job::JobApplication;

/// The single authorization predicate for job applications: only the creator may touch one.
pub fn ensure_owner(job: &JobApplication, requester: Uuid) -> Result<(), AppError> {
    if job.user_id != requester {
        return Err(AppError::Unauthorized(
            "You do not have access to this job application".to_string(),
        ));
    }
    Ok(())
}

/// Fetches a job application and applies `ensure_owner` before handing it back.
/// Every read-by-id, update and delete goes through here.
pub async fn load_owned(
    store: &dyn JobStore,
    id: Uuid,
    requester: Uuid,
) -> Result<JobApplication, AppError> {
    let job = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job application {id} not found")))?;
    ensure_owner(&job, requester)?;
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{JobStatus, JobType, WorkMode};
    use chrono::Utc;

    fn job_owned_by(user_id: Uuid) -> JobApplication {
        let now = Utc::now();
        JobApplication {
            id: Uuid::new_v4(),
            user_id,
            company: "Acme".into(),
            role: "SDE".into(),
            pay: String::new(),
            date_applied: now,
            interview_date: None,
            job_type: JobType::FullTime,
            status: JobStatus::Applied,
            mode: WorkMode::OffCampus,
            notes: String::new(),
            created_at: now,
            updated_at: now,
            status_updated_at: now,
        }
    }

    #[test]
    fn test_owner_passes() {
        let owner = Uuid::new_v4();
        assert!(ensure_owner(&job_owned_by(owner), owner).is_ok());
    }

    #[test]
    fn test_other_user_is_unauthorized() {
        let job = job_owned_by(Uuid::new_v4());
        assert!(matches!(
            ensure_owner(&job, Uuid::new_v4()),
            Err(AppError::Unauthorized(_))
        ));
    }
}

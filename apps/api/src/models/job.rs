use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Exactly one of these at a time. Mirrors the CHECK constraint on `job_applications.status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Applied,
    Interview,
    Offered,
    Rejected,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offered,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "applied",
            JobStatus::Interview => "interview",
            JobStatus::Offered => "offered",
            JobStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkMode {
    OnCampus,
    #[default]
    OffCampus,
}

impl WorkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkMode::OnCampus => "on-campus",
            WorkMode::OffCampus => "off-campus",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! impl_from_str {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

impl_from_str!(
    JobStatus,
    "status",
    [
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offered,
        JobStatus::Rejected
    ]
);
impl_from_str!(
    JobType,
    "job type",
    [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Internship,
        JobType::Contract
    ]
);
impl_from_str!(WorkMode, "mode", [WorkMode::OnCampus, WorkMode::OffCampus]);

/// A `job_applications` row as stored. Enum columns are plain text.
#[derive(Debug, Clone, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub pay: String,
    pub date_applied: DateTime<Utc>,
    pub interview_date: Option<DateTime<Utc>>,
    pub job_type: String,
    pub status: String,
    pub mode: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub role: String,
    pub pay: String,
    pub date_applied: DateTime<Utc>,
    pub interview_date: Option<DateTime<Utc>>,
    pub job_type: JobType,
    pub status: JobStatus,
    pub mode: WorkMode,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = AppError;

    fn try_from(row: JobApplicationRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt =
            move |e: UnknownVariant| AppError::Internal(anyhow!("job application {id} has {e}"));
        Ok(Self {
            job_type: row.job_type.parse().map_err(corrupt)?,
            status: row.status.parse().map_err(corrupt)?,
            mode: row.mode.parse().map_err(corrupt)?,
            id: row.id,
            user_id: row.user_id,
            company: row.company,
            role: row.role,
            pay: row.pay,
            date_applied: row.date_applied,
            interview_date: row.interview_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            status_updated_at: row.status_updated_at,
        })
    }
}

/// Body of `POST /api/v1/jobs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobApplication {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub pay: String,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub date_applied: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub interview_date: Option<DateTime<Utc>>,
    pub job_type: JobType,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub mode: WorkMode,
    #[serde(default)]
    pub notes: String,
}

impl NewJobApplication {
    /// Validates the request and builds the record to insert.
    pub fn into_job(self, user_id: Uuid, now: DateTime<Utc>) -> Result<JobApplication, AppError> {
        let company = require_text("company", &self.company)?;
        let role = require_text("role", &self.role)?;
        Ok(JobApplication {
            id: Uuid::new_v4(),
            user_id,
            company,
            role,
            pay: self.pay.trim().to_string(),
            date_applied: self.date_applied.unwrap_or(now),
            interview_date: self.interview_date,
            job_type: self.job_type,
            status: self.status,
            mode: self.mode,
            notes: self.notes,
            created_at: now,
            updated_at: now,
            status_updated_at: now,
        })
    }
}

/// Body of `PUT /api/v1/jobs/:id`. Absent fields are left untouched;
/// `interviewDate: null` clears the interview date.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub pay: Option<String>,
    #[serde(default, deserialize_with = "optional_datetime")]
    pub date_applied: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_datetime")]
    pub interview_date: Option<Option<DateTime<Utc>>>,
    pub job_type: Option<JobType>,
    pub status: Option<JobStatus>,
    pub mode: Option<WorkMode>,
    pub notes: Option<String>,
}

impl JobApplication {
    /// Applies a partial update. `status_updated_at` only moves when the status value changes.
    pub fn apply(&mut self, patch: JobApplicationPatch, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(company) = patch.company {
            self.company = require_text("company", &company)?;
        }
        if let Some(role) = patch.role {
            self.role = require_text("role", &role)?;
        }
        if let Some(pay) = patch.pay {
            self.pay = pay.trim().to_string();
        }
        if let Some(date_applied) = patch.date_applied {
            self.date_applied = date_applied;
        }
        if let Some(interview_date) = patch.interview_date {
            self.interview_date = interview_date;
        }
        if let Some(job_type) = patch.job_type {
            self.job_type = job_type;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(status) = patch.status {
            if status != self.status {
                self.status = status;
                self.status_updated_at = now;
            }
        }
        self.updated_at = now;
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_datetime_input(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_datetime_input(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{s}'"))),
    }
}

fn nullable_datetime<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_datetime(deserializer).map(Some)
}

//! Analytics: per-request aggregation over a user's job applications.
//!
//! Pure over its inputs: the handler fetches the window's records and passes `now`
//! explicitly, so everything here is deterministic and testable without a database.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::job::{JobApplication, JobStatus};

/// Time window selected by the `timeRange` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeWindow {
    Last30Days,
    Last90Days,
    #[default]
    AllTime,
}

impl TimeWindow {
    /// Unrecognized or absent values select all-time.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("last30days") => TimeWindow::Last30Days,
            Some("last90days") => TimeWindow::Last90Days,
            _ => TimeWindow::AllTime,
        }
    }

    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeWindow::Last30Days => now - Duration::days(30),
            TimeWindow::Last90Days => now - Duration::days(90),
            TimeWindow::AllTime => DateTime::<Utc>::default(), // Unix epoch
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusSlice {
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RoleBreakdown {
    pub role: String,
    pub applied: usize,
    pub interview: usize,
    pub offered: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_applications: usize,
    pub interview_rate: String,
    pub offer_rate: String,
    pub avg_response_time: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub status_distribution: Vec<StatusSlice>,
    pub time_data: Vec<DailyCount>,
    pub role_data: Vec<RoleBreakdown>,
    pub summary: SummaryStats,
}

fn display(status: JobStatus) -> (&'static str, &'static str) {
    match status {
        JobStatus::Applied => ("Applied", "#3b82f6"),
        JobStatus::Interview => ("Interview", "#f59e0b"),
        JobStatus::Offered => ("Offered", "#10b981"),
        JobStatus::Rejected => ("Rejected", "#ef4444"),
    }
}

/// Builds the analytics payload for `records` restricted to `window`.
pub fn compute_analytics(
    records: &[JobApplication],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let start = window.start(now);
    let in_window: Vec<&JobApplication> =
        records.iter().filter(|r| r.date_applied >= start).collect();
    let total = in_window.len();

    let mut by_status: HashMap<JobStatus, usize> = HashMap::new();
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut by_role: BTreeMap<&str, RoleBreakdown> = BTreeMap::new();

    for record in &in_window {
        *by_status.entry(record.status).or_default() += 1;
        *by_day.entry(record.date_applied.date_naive()).or_default() += 1;

        let role = by_role
            .entry(record.role.as_str())
            .or_insert_with(|| RoleBreakdown {
                role: record.role.clone(),
                ..Default::default()
            });
        role.applied += 1;
        match record.status {
            JobStatus::Interview => role.interview += 1,
            JobStatus::Offered => role.offered += 1,
            JobStatus::Applied | JobStatus::Rejected => {}
        }
    }

    let count_of = |s: JobStatus| by_status.get(&s).copied().unwrap_or(0);

    let status_distribution = JobStatus::ALL
        .iter()
        .map(|&status| {
            let (name, color) = display(status);
            StatusSlice {
                name,
                value: count_of(status),
                color,
            }
        })
        .collect();

    let time_data = by_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    AnalyticsSummary {
        status_distribution,
        time_data,
        role_data: by_role.into_values().collect(),
        summary: SummaryStats {
            total_applications: total,
            interview_rate: format_rate(count_of(JobStatus::Interview), total),
            offer_rate: format_rate(count_of(JobStatus::Offered), total),
            avg_response_time: format!("{} days", average_response_days(&in_window)),
        },
    }
}

/// `count / total` as a one-decimal percentage; "0%" when there is nothing to divide by.
fn format_rate(count: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", count as f64 / total as f64 * 100.0)
}

/// Mean whole-day gap between applying and the last status change, over records that
/// have moved past `applied`. Gaps of zero or fewer days are left out of the mean.
fn average_response_days(records: &[&JobApplication]) -> i64 {
    const MS_PER_DAY: f64 = 86_400_000.0;

    let gaps: Vec<f64> = records
        .iter()
        .filter(|r| r.status != JobStatus::Applied)
        .map(|r| {
            let elapsed = r.status_updated_at - r.date_applied;
            (elapsed.num_milliseconds() as f64 / MS_PER_DAY).ceil()
        })
        .filter(|days| *days > 0.0)
        .collect();

    if gaps.is_empty() {
        return 0;
    }
    (gaps.iter().sum::<f64>() / gaps.len() as f64).round() as i64
}

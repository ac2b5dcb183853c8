//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Submission;

/// Response for a newly created submission
#[derive(Debug, Serialize)]
pub struct CreateSubmissionResponse {
    pub id: Uuid,
    pub status: String,
    pub message: String,
}

/// Submission view returned by the query API
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language_id: i32,
    pub status: String,
    pub time_secs: Option<f64>,
    pub memory_kb: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            problem_id: s.problem_id,
            contest_id: s.contest_id,
            language_id: s.language_id,
            status: s.status,
            time_secs: s.time_secs,
            memory_kb: s.memory_kb,
            created_at: s.created_at,
        }
    }
}

/// Paginated submission history
#[derive(Debug, Serialize)]
pub struct SubmissionsListResponse {
    pub submissions: Vec<SubmissionResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

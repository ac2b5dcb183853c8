//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create submission request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubmissionRequest {
    /// Problem ID to submit for
    pub problem_id: Uuid,

    /// Contest ID (optional - for contest submissions)
    pub contest_id: Option<Uuid>,

    /// Judge language identifier
    pub language_id: i32,

    /// User source fragment, substituted into the problem's template
    #[validate(length(min = 1))]
    pub source_code: String,
}

/// Submission history query parameters
#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub problem_id: Uuid,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

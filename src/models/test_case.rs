//! Submission test case model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::test_statuses;

/// One test vector's execution record for a submission.
///
/// The set of rows for a submission is fixed at creation time, one per test
/// input. Only `status`, `time_secs` and `memory_kb` ever mutate, exactly
/// once, transitioning pending -> terminal. A judge callback identifies its
/// row solely by the tracking `token`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SubmissionTestCase {
    pub id: Uuid,
    pub submission_id: Uuid,
    /// 0-based position, defines ordering and display labeling
    pub index: i32,
    /// Opaque tracking token returned by the judge, unique per test case
    pub token: String,
    pub status: String,
    pub time_secs: Option<f64>,
    pub memory_kb: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionTestCase {
    /// Parsed status, defaulting to Failed for anything unrecognized so a
    /// corrupt row can never hold a submission in limbo.
    pub fn parsed_status(&self) -> TestCaseStatus {
        TestCaseStatus::parse(&self.status).unwrap_or(TestCaseStatus::Failed)
    }
}

/// Per-test-case status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestCaseStatus {
    Pending,
    Accepted,
    Failed,
    TimeLimitExceeded,
    CompilationError,
}

impl TestCaseStatus {
    /// Get status as the string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => test_statuses::PENDING,
            Self::Accepted => test_statuses::ACCEPTED,
            Self::Failed => test_statuses::FAILED,
            Self::TimeLimitExceeded => test_statuses::TIME_LIMIT_EXCEEDED,
            Self::CompilationError => test_statuses::COMPILATION_ERROR,
        }
    }

    /// Parse status from its database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            test_statuses::PENDING => Some(Self::Pending),
            test_statuses::ACCEPTED => Some(Self::Accepted),
            test_statuses::FAILED => Some(Self::Failed),
            test_statuses::TIME_LIMIT_EXCEEDED => Some(Self::TimeLimitExceeded),
            test_statuses::COMPILATION_ERROR => Some(Self::CompilationError),
            _ => None,
        }
    }

    /// Check if this is a terminal status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for TestCaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::statuses;

use super::test_case::TestCaseStatus;

/// Submission database model
///
/// Created once by the submission service together with its test case rows;
/// after creation only `status`, `time_secs`, `memory_kb` and the pending
/// counter mutate, and only toward a terminal state.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub language_id: i32,
    #[serde(skip_serializing)]
    pub source_code: String,
    #[serde(skip_serializing)]
    pub full_code: String,
    pub status: String,
    /// Test cases still awaiting a judge callback. Finalization happens
    /// exactly when an atomic decrement brings this to zero.
    pub pending_tests: i32,
    /// Worst-case execution time across all test cases, in seconds
    pub time_secs: Option<f64>,
    /// Worst-case memory across all test cases, in KB
    pub memory_kb: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

/// Submission status enum
///
/// `Pending -> {Accepted, Rejected, TimeLimitExceeded, CompilationError}`.
/// The non-accept statuses are refinements of a single rejection umbrella.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    Rejected,
    TimeLimitExceeded,
    CompilationError,
}

impl SubmissionStatus {
    /// Get status as the string stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => statuses::PENDING,
            Self::Accepted => statuses::ACCEPTED,
            Self::Rejected => statuses::REJECTED,
            Self::TimeLimitExceeded => statuses::TIME_LIMIT_EXCEEDED,
            Self::CompilationError => statuses::COMPILATION_ERROR,
        }
    }

    /// Parse status from its database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            statuses::PENDING => Some(Self::Pending),
            statuses::ACCEPTED => Some(Self::Accepted),
            statuses::REJECTED => Some(Self::Rejected),
            statuses::TIME_LIMIT_EXCEEDED => Some(Self::TimeLimitExceeded),
            statuses::COMPILATION_ERROR => Some(Self::CompilationError),
            _ => None,
        }
    }

    /// Check if this is a terminal status (evaluation complete)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check if this status means the submission was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Derive the final submission status from a full set of terminal
    /// test case statuses. Accepted only if every test case accepted;
    /// otherwise the dominant failure class wins, with compilation errors
    /// taking precedence over time limit breaches.
    pub fn aggregate(test_statuses: &[TestCaseStatus]) -> Self {
        if test_statuses.iter().all(|s| *s == TestCaseStatus::Accepted) {
            return Self::Accepted;
        }
        if test_statuses
            .iter()
            .any(|s| *s == TestCaseStatus::CompilationError)
        {
            return Self::CompilationError;
        }
        if test_statuses
            .iter()
            .any(|s| *s == TestCaseStatus::TimeLimitExceeded)
        {
            return Self::TimeLimitExceeded;
        }
        Self::Rejected
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TestCaseStatus::*;

    #[test]
    fn test_aggregate_all_accepted() {
        assert_eq!(
            SubmissionStatus::aggregate(&[Accepted, Accepted, Accepted]),
            SubmissionStatus::Accepted
        );
    }

    #[test]
    fn test_aggregate_tle_dominates_wrong_answer() {
        assert_eq!(
            SubmissionStatus::aggregate(&[Accepted, Accepted, TimeLimitExceeded]),
            SubmissionStatus::TimeLimitExceeded
        );
        assert_eq!(
            SubmissionStatus::aggregate(&[Failed, TimeLimitExceeded, Accepted]),
            SubmissionStatus::TimeLimitExceeded
        );
    }

    #[test]
    fn test_aggregate_compile_error_dominates() {
        assert_eq!(
            SubmissionStatus::aggregate(&[TimeLimitExceeded, CompilationError]),
            SubmissionStatus::CompilationError
        );
    }

    #[test]
    fn test_aggregate_plain_rejection() {
        assert_eq!(
            SubmissionStatus::aggregate(&[Accepted, Failed]),
            SubmissionStatus::Rejected
        );
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Accepted,
            SubmissionStatus::Rejected,
            SubmissionStatus::TimeLimitExceeded,
            SubmissionStatus::CompilationError,
        ] {
            assert_eq!(SubmissionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubmissionStatus::parse("bogus"), None);
    }
}

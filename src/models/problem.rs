//! Problem model and test bundle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Problem database model
///
/// Problem authoring is out of scope; this model only carries what the
/// submission pipeline needs to read.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
}

/// One input/expected-output pair for a problem
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TestVector {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub index: i32,
    pub input: String,
    pub expected_output: String,
}

/// Everything needed to dispatch a submission for one (problem, language)
/// pair: the full source template with its substitution marker and the
/// ordered test vectors.
#[derive(Debug, Clone)]
pub struct TestBundle {
    pub problem_id: Uuid,
    pub language_id: i32,
    pub template: String,
    pub tests: Vec<TestVector>,
}

impl TestBundle {
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

//! Contest models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub hidden: bool,
    pub allow_virtual: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Contest {
    /// Check if the contest window is currently open
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_time && now <= self.end_time
    }

    pub fn has_ended_at(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }
}

/// Association of a problem with a contest, carrying the base point value
/// scaled by the scoring formula and the display ordering.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContestProblem {
    pub id: Uuid,
    pub contest_id: Uuid,
    pub problem_id: Uuid,
    pub index: i32,
    pub points: i32,
}


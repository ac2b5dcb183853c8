//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::scoring_service::RankedEntry;

/// Contest view
#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub id: Uuid,
    pub title: String,
    pub allow_virtual: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// One problem in a contest's problem list
#[derive(Debug, Serialize)]
pub struct ContestProblemResponse {
    pub problem_id: Uuid,
    pub index: i32,
    pub points: i32,
}

/// Registration acknowledgement
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub contest_id: Uuid,
    pub message: String,
}

/// Ranked leaderboard
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub contest_id: Uuid,
    pub entries: Vec<RankedEntry>,
}

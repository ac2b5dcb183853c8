//! Contest handler implementations

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{ContestService, ScoringService},
    state::AppState,
};

use super::response::{
    ContestProblemResponse, ContestResponse, LeaderboardResponse, RegistrationResponse,
};

/// Get contest details
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestResponse>> {
    let contest = ContestService::get_contest(state.db(), &id).await?;

    Ok(Json(ContestResponse {
        id: contest.id,
        title: contest.title,
        allow_virtual: contest.allow_virtual,
        start_time: contest.start_time,
        end_time: contest.end_time,
    }))
}

/// List the contest's problems
pub async fn list_problems(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ContestProblemResponse>>> {
    let problems = ContestService::list_problems(state.db(), &id).await?;

    Ok(Json(
        problems
            .into_iter()
            .map(|p| ContestProblemResponse {
                problem_id: p.problem_id,
                index: p.index,
                points: p.points,
            })
            .collect(),
    ))
}

/// Join a contest (idempotent)
pub async fn register(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RegistrationResponse>> {
    ContestService::register(state.db(), &id, &auth_user.id).await?;

    Ok(Json(RegistrationResponse {
        contest_id: id,
        message: "Registered".to_string(),
    }))
}

/// Current standings, ranked on demand
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaderboardResponse>> {
    // Visibility check happens in the contest service
    ContestService::get_contest(state.db(), &id).await?;

    let entries = ScoringService::leaderboard(state.db(), &id).await?;

    Ok(Json(LeaderboardResponse {
        contest_id: id,
        entries,
    }))
}

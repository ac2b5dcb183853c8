//! Submission handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::SubmissionService,
    state::AppState,
};

use super::{
    request::{CreateSubmissionRequest, ListSubmissionsQuery},
    response::{CreateSubmissionResponse, SubmissionResponse, SubmissionsListResponse},
};

/// Create a new submission
pub async fn create_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<CreateSubmissionResponse>)> {
    payload.validate()?;

    let submission = SubmissionService::create_submission(
        state.db(),
        state.redis(),
        state.judge(),
        state.config(),
        &auth_user.id,
        &payload.problem_id,
        payload.language_id,
        &payload.source_code,
        payload.contest_id.as_ref(),
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateSubmissionResponse {
            id: submission.id,
            status: submission.status,
            message: "Submission dispatched for evaluation".to_string(),
        }),
    ))
}

/// Get a specific submission, scoped to the owning user
pub async fn get_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission = SubmissionService::get_submission(state.db(), &id, &auth_user.id).await?;

    Ok(Json(submission.into()))
}

/// The authenticated user's submission history for a problem, newest first
pub async fn list_submissions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListSubmissionsQuery>,
) -> AppResult<Json<SubmissionsListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);

    let (submissions, total) = SubmissionService::list_submissions(
        state.db(),
        &auth_user.id,
        &query.problem_id,
        query.status.as_deref(),
        page,
        per_page,
    )
    .await?;

    Ok(Json(SubmissionsListResponse {
        submissions: submissions.into_iter().map(Into::into).collect(),
        total,
        page,
        per_page,
    }))
}

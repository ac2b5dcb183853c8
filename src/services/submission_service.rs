//! Submission service
//!
//! Orchestrates submission intake: rate limiting, static safety scanning,
//! test bundle resolution, template assembly, batched judge dispatch, and
//! persistence. Nothing is persisted unless the dispatch fully succeeds and
//! returns a valid token for every test case.

use chrono::Utc;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::Config,
    constants::USER_CODE_MARKER,
    db::repositories::{ContestRepository, ProblemRepository, SubmissionRepository},
    error::{AppError, AppResult},
    judge::{JudgeClient, JudgeSubmission},
    models::{Submission, TestBundle},
};

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// Create a new submission: validate, dispatch to the judge, persist.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_submission(
        pool: &PgPool,
        redis: ConnectionManager,
        judge: &Arc<dyn JudgeClient>,
        config: &Config,
        user_id: &Uuid,
        problem_id: &Uuid,
        language_id: i32,
        source_code: &str,
        contest_id: Option<&Uuid>,
    ) -> AppResult<Submission> {
        // Policy gates first: rate limit (fails closed on a Redis error),
        // then the static safety filter. Neither leaves any state behind.
        super::RateLimiter::check(
            redis.clone(),
            user_id,
            config.limits.submission_rate_limit,
            config.limits.submission_rate_window_secs,
        )
        .await?;

        super::CodeSafetyFilter::scan(source_code, config.limits.max_code_size)?;

        let problem = ProblemRepository::find_by_id(pool, problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if let Some(contest_id) = contest_id {
            Self::validate_contest_submission(pool, contest_id, problem_id, user_id).await?;
        }

        let bundle = ProblemRepository::fetch_bundle(pool, &problem.id, language_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "No template for language {language_id} on this problem"
                ))
            })?;

        Self::validate_bundle(&bundle, config.limits.max_test_cases)?;

        let full_code = Self::assemble_source(
            &bundle.template,
            source_code,
            config.limits.max_assembled_size,
        )?;

        // Batched dispatch, one sub-request per test vector. On any failure
        // (unreachable, upstream error, malformed token list) we bail before
        // touching the database, so no orphan rows can exist.
        let callback_url = Self::callback_url(config);
        let batch: Vec<JudgeSubmission> = bundle
            .tests
            .iter()
            .map(|test| JudgeSubmission {
                language_id,
                source_code: full_code.clone(),
                stdin: test.input.clone(),
                expected_output: test.expected_output.clone(),
                callback_url: callback_url.clone(),
            })
            .collect();

        let tokens = judge.dispatch_batch(&batch).await?;

        let submission = SubmissionRepository::create_with_tests(
            pool,
            user_id,
            problem_id,
            contest_id,
            language_id,
            source_code,
            &full_code,
            &tokens,
        )
        .await?;

        Self::stamp_rate_window(
            redis,
            user_id,
            &submission.id,
            config.limits.submission_rate_window_secs,
        )
        .await;

        tracing::info!(
            submission_id = %submission.id,
            user_id = %user_id,
            problem_id = %problem_id,
            test_count = tokens.len(),
            "Submission dispatched to judge"
        );

        Ok(submission)
    }

    /// Stamp the user's rate-limit window for a created submission.
    ///
    /// The submission is already persisted and dispatched at this point; a
    /// failure to stamp must not surface as a failed request, so the error
    /// is logged and swallowed.
    async fn stamp_rate_window(
        redis: ConnectionManager,
        user_id: &Uuid,
        submission_id: &Uuid,
        window_secs: u64,
    ) {
        if let Err(e) =
            super::RateLimiter::record(redis, user_id, submission_id, window_secs).await
        {
            tracing::warn!(
                submission_id = %submission_id,
                user_id = %user_id,
                error = %e,
                "Failed to record submission in rate-limit window"
            );
        }
    }

    /// Reject dispatch when the bundle cannot produce a well-formed batch
    fn validate_bundle(bundle: &TestBundle, max_test_cases: usize) -> AppResult<()> {
        if bundle.tests.is_empty() {
            return Err(AppError::Validation(
                "Problem has no test cases".to_string(),
            ));
        }
        if bundle.test_count() > max_test_cases {
            return Err(AppError::Validation(format!(
                "Problem has {} test cases, exceeding the maximum of {}",
                bundle.test_count(),
                max_test_cases
            )));
        }
        Ok(())
    }

    /// Substitute the single marker in the language template with the user's
    /// code and enforce the assembled size cap.
    fn assemble_source(template: &str, user_code: &str, max_size: usize) -> AppResult<String> {
        if !template.contains(USER_CODE_MARKER) {
            return Err(AppError::Validation(
                "Problem template is missing its substitution marker".to_string(),
            ));
        }

        let assembled = template.replacen(USER_CODE_MARKER, user_code, 1);

        if assembled.len() > max_size {
            return Err(AppError::Validation(format!(
                "Assembled source exceeds maximum size of {max_size} bytes"
            )));
        }

        Ok(assembled)
    }

    /// Callback URL carrying the shared secret the webhook verifies
    fn callback_url(config: &Config) -> String {
        format!(
            "{}/api/v1/webhooks/judge?secret={}",
            config.judge.callback_base_url.trim_end_matches('/'),
            config.judge.callback_secret
        )
    }

    /// Contest submissions require an open window and a registration row
    async fn validate_contest_submission(
        pool: &PgPool,
        contest_id: &Uuid,
        problem_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<()> {
        let contest = ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        if !contest.is_active_at(Utc::now()) {
            return Err(AppError::Validation("Contest is not active".to_string()));
        }

        if ContestRepository::find_contest_problem(pool, contest_id, problem_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(
                "Problem is not part of this contest".to_string(),
            ));
        }

        if !ContestRepository::is_registered(pool, contest_id, user_id).await? {
            return Err(AppError::Forbidden(
                "Not registered for this contest".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a submission scoped to its owning user
    pub async fn get_submission(
        pool: &PgPool,
        id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Submission> {
        let submission = SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        if submission.user_id != *user_id {
            return Err(AppError::Forbidden(
                "Cannot view other users' submissions".to_string(),
            ));
        }

        Ok(submission)
    }

    /// A user's submission history for one problem, newest first
    pub async fn list_submissions(
        pool: &PgPool,
        user_id: &Uuid,
        problem_id: &Uuid,
        status: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Submission>, i64)> {
        let offset = ((page - 1) * per_page) as i64;
        let limit = per_page as i64;

        SubmissionRepository::list_for_user(pool, user_id, problem_id, status, offset, limit).await
    }
}

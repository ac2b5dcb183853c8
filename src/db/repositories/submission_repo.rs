//! Submission repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::{statuses, test_statuses},
    error::AppResult,
    models::{Submission, SubmissionStatus, SubmissionTestCase, TestCaseStatus},
};

/// Repository for submission and submission-test-case database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Create a submission together with one test case row per tracking
    /// token, in a single transaction. Called only after the judge dispatch
    /// fully succeeded, so either all rows exist or none do.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_with_tests(
        pool: &PgPool,
        user_id: &Uuid,
        problem_id: &Uuid,
        contest_id: Option<&Uuid>,
        language_id: i32,
        source_code: &str,
        full_code: &str,
        tokens: &[String],
    ) -> AppResult<Submission> {
        let mut tx = pool.begin().await?;

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions
                (user_id, problem_id, contest_id, language_id, source_code, full_code, status, pending_tests)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(contest_id)
        .bind(language_id)
        .bind(source_code)
        .bind(full_code)
        .bind(statuses::PENDING)
        .bind(tokens.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        for (index, token) in tokens.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO submission_test_cases (submission_id, index, token, status)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(submission.id)
            .bind(index as i32)
            .bind(token)
            .bind(test_statuses::PENDING)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(submission)
    }

    /// Find submission by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Submission>> {
        let submission =
            sqlx::query_as::<_, Submission>(r#"SELECT * FROM submissions WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(submission)
    }

    /// List a user's submissions for one problem, newest first, with an
    /// optional status filter
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &Uuid,
        problem_id: &Uuid,
        status: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Submission>, i64)> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE user_id = $1
                AND problem_id = $2
                AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE user_id = $1
                AND problem_id = $2
                AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(user_id)
        .bind(problem_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok((submissions, count))
    }

    /// Find a test case by its tracking token
    pub async fn find_test_by_token(
        pool: &PgPool,
        token: &str,
    ) -> AppResult<Option<SubmissionTestCase>> {
        let test = sqlx::query_as::<_, SubmissionTestCase>(
            r#"SELECT * FROM submission_test_cases WHERE token = $1"#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(test)
    }

    /// Record a judge verdict on the test case identified by `token` and
    /// decrement the parent submission's pending-test counter, in one
    /// transaction. The counter can never drift from the set of terminal
    /// test rows: a crash rolls back both writes or neither.
    ///
    /// The `status = 'pending'` guard makes the write idempotent: a replayed
    /// delivery finds the row already terminal, matches nothing, and returns
    /// `None` without touching the counter. On a real transition, returns
    /// the parent submission id and the remaining pending count. Exactly one
    /// caller observes zero, so concurrent callbacks for the last two test
    /// cases cannot both skip finalization.
    pub async fn record_test_result(
        pool: &PgPool,
        token: &str,
        status: TestCaseStatus,
        time_secs: Option<f64>,
        memory_kb: Option<i64>,
    ) -> AppResult<Option<(Uuid, i32)>> {
        let mut tx = pool.begin().await?;

        let submission_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE submission_test_cases
            SET status = $2, time_secs = $3, memory_kb = $4, updated_at = NOW()
            WHERE token = $1 AND status = $5
            RETURNING submission_id
            "#,
        )
        .bind(token)
        .bind(status.as_str())
        .bind(time_secs)
        .bind(memory_kb)
        .bind(test_statuses::PENDING)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(submission_id) = submission_id else {
            return Ok(None);
        };

        let remaining: i32 = sqlx::query_scalar(
            r#"
            UPDATE submissions
            SET pending_tests = pending_tests - 1
            WHERE id = $1
            RETURNING pending_tests
            "#,
        )
        .bind(submission_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((submission_id, remaining)))
    }

    /// Load all test case rows for a submission, ordered by index
    pub async fn list_tests(
        pool: &PgPool,
        submission_id: &Uuid,
    ) -> AppResult<Vec<SubmissionTestCase>> {
        let tests = sqlx::query_as::<_, SubmissionTestCase>(
            r#"SELECT * FROM submission_test_cases WHERE submission_id = $1 ORDER BY index"#,
        )
        .bind(submission_id)
        .fetch_all(pool)
        .await?;

        Ok(tests)
    }

    /// Write the final submission status and worst-case metrics.
    ///
    /// Guarded on the pending status so finalization happens at most once;
    /// returns false when another writer already finalized.
    pub async fn finalize(
        pool: &PgPool,
        submission_id: &Uuid,
        status: SubmissionStatus,
        time_secs: Option<f64>,
        memory_kb: Option<i64>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE submissions
            SET status = $2, time_secs = $3, memory_kb = $4, finalized_at = NOW()
            WHERE id = $1 AND status = $5
            "#,
        )
        .bind(submission_id)
        .bind(status.as_str())
        .bind(time_secs)
        .bind(memory_kb)
        .bind(statuses::PENDING)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

//! Contest repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Contest, ContestProblem},
};

/// A standings row joined with the owning user's name, as read by the ranker
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StandingsRow {
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
    pub last_successful_submission_at: Option<DateTime<Utc>>,
}

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Find contest by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(contest)
    }

    /// Find the contest/problem association (base points, ordering)
    pub async fn find_contest_problem(
        pool: &PgPool,
        contest_id: &Uuid,
        problem_id: &Uuid,
    ) -> AppResult<Option<ContestProblem>> {
        let row = sqlx::query_as::<_, ContestProblem>(
            r#"SELECT * FROM contest_problems WHERE contest_id = $1 AND problem_id = $2"#,
        )
        .bind(contest_id)
        .bind(problem_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// List the problems attached to a contest in display order
    pub async fn list_contest_problems(
        pool: &PgPool,
        contest_id: &Uuid,
    ) -> AppResult<Vec<ContestProblem>> {
        let rows = sqlx::query_as::<_, ContestProblem>(
            r#"SELECT * FROM contest_problems WHERE contest_id = $1 ORDER BY index"#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Check whether a user holds a registration row for a contest
    pub async fn is_registered(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM contest_registrations
                WHERE contest_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Idempotent registration upsert: creates the membership marker and a
    /// zero-points standings row on first call, and is a no-op on every
    /// later call for the same (user, contest) pair. Safe under concurrent
    /// duplicate calls; never resets an existing points value.
    pub async fn register(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        is_virtual: bool,
    ) -> AppResult<()> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO contest_registrations (contest_id, user_id, is_virtual)
            VALUES ($1, $2, $3)
            ON CONFLICT (contest_id, user_id) DO NOTHING
            "#,
        )
        .bind(contest_id)
        .bind(user_id)
        .bind(is_virtual)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO contest_points (contest_id, user_id, points)
            VALUES ($1, $2, 0)
            ON CONFLICT (contest_id, user_id) DO NOTHING
            "#,
        )
        .bind(contest_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Credit an accepted contest submission.
    ///
    /// The per-problem record is inserted with an ON CONFLICT DO NOTHING
    /// keyed on (contest, user, problem): if the user already solved this
    /// problem the insert matches nothing and no points move, making a
    /// re-accept a no-op. On first solve the standings row is bumped with an
    /// atomic in-place increment rather than a read-modify-write, so two
    /// problems accepted in close succession cannot lose an update.
    /// Returns whether points were actually awarded.
    pub async fn award_points(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        problem_id: &Uuid,
        submission_id: &Uuid,
        points: i32,
        accepted_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tx = pool.begin().await?;

        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO contest_submissions (contest_id, user_id, problem_id, submission_id, points)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (contest_id, user_id, problem_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(contest_id)
        .bind(user_id)
        .bind(problem_id)
        .bind(submission_id)
        .bind(points)
        .fetch_optional(&mut *tx)
        .await?;

        let awarded = inserted.is_some();

        if awarded {
            sqlx::query(
                r#"
                UPDATE contest_points
                SET points = points + $3, last_successful_submission_at = $4
                WHERE contest_id = $1 AND user_id = $2
                "#,
            )
            .bind(contest_id)
            .bind(user_id)
            .bind(points)
            .bind(accepted_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(awarded)
    }

    /// Load the raw standings snapshot for a contest. Ordering and rank
    /// assignment are done by the ranker so they stay deterministic and
    /// testable.
    pub async fn fetch_standings(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<StandingsRow>> {
        let rows = sqlx::query_as::<_, StandingsRow>(
            r#"
            SELECT cp.user_id, u.username, cp.points, cp.last_successful_submission_at
            FROM contest_points cp
            JOIN users u ON cp.user_id = u.id
            WHERE cp.contest_id = $1
            "#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

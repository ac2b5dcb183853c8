//! Contest service
//!
//! Registration is an idempotent upsert triggered on first contest page
//! visit; the standings row it creates is the prerequisite for any points
//! being awarded to the user later.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::ContestRepository,
    error::{AppError, AppResult},
    models::{Contest, ContestProblem},
};

/// Contest service for business logic
pub struct ContestService;

impl ContestService {
    /// Get a visible contest by ID
    pub async fn get_contest(pool: &PgPool, id: &Uuid) -> AppResult<Contest> {
        let contest = ContestRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        if contest.hidden {
            return Err(AppError::NotFound("Contest not found".to_string()));
        }

        Ok(contest)
    }

    /// List the contest's problems in display order
    pub async fn list_problems(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<ContestProblem>> {
        // Visibility check first so hidden contests don't leak their problems
        Self::get_contest(pool, contest_id).await?;
        ContestRepository::list_contest_problems(pool, contest_id).await
    }

    /// Join a contest. Idempotent: repeated or concurrent calls for the same
    /// (user, contest) pair create exactly one registration and one
    /// zero-points standings row, and never reset existing points.
    pub async fn register(pool: &PgPool, contest_id: &Uuid, user_id: &Uuid) -> AppResult<()> {
        let contest = ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        if contest.hidden {
            return Err(AppError::NotFound("Contest not found".to_string()));
        }

        // After the official window only virtual participation can register
        let is_virtual = contest.has_ended_at(Utc::now());
        if is_virtual && !contest.allow_virtual {
            return Err(AppError::Validation(
                "Contest has ended and does not allow virtual participation".to_string(),
            ));
        }

        ContestRepository::register(pool, contest_id, user_id, is_virtual).await?;

        tracing::debug!(contest_id = %contest_id, user_id = %user_id, is_virtual, "Contest registration ensured");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{harness, seed};

    #[tokio::test]
    async fn test_register_is_idempotent_and_keeps_points() {
        let pool = harness::pool().await;
        let user_id = seed::user(&pool).await;
        let contest_id = seed::open_contest(&pool).await;

        ContestService::register(&pool, &contest_id, &user_id)
            .await
            .unwrap();
        ContestService::register(&pool, &contest_id, &user_id)
            .await
            .unwrap();

        let registrations: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contest_registrations WHERE contest_id = $1 AND user_id = $2",
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(registrations, 1);

        // A later duplicate call must not reset accumulated points
        sqlx::query("UPDATE contest_points SET points = 42 WHERE contest_id = $1 AND user_id = $2")
            .bind(contest_id)
            .bind(user_id)
            .execute(&pool)
            .await
            .unwrap();

        ContestService::register(&pool, &contest_id, &user_id)
            .await
            .unwrap();

        let points: i32 = sqlx::query_scalar(
            "SELECT points FROM contest_points WHERE contest_id = $1 AND user_id = $2",
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(points, 42);
    }
}

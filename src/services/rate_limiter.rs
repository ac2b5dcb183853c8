//! Per-user sliding-window submission throttle
//!
//! Backed by a Redis sorted set per user: members are submission ids scored
//! by creation time. A check prunes entries older than the window and counts
//! what remains; recording happens only after a submission row was actually
//! created, so a rejected attempt leaves no trace in the window.
//!
//! A Redis failure fails closed: the error propagates and the submission is
//! rejected rather than silently admitting unlimited submissions.

use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Submission rate limiter
pub struct RateLimiter;

impl RateLimiter {
    /// Reject when the user already has `limit` submissions inside the
    /// trailing window. No side effect on rejection.
    pub async fn check(
        mut redis: ConnectionManager,
        user_id: &Uuid,
        limit: u32,
        window_secs: u64,
    ) -> AppResult<()> {
        let key = Self::key(user_id);
        let now = Utc::now().timestamp_millis();
        let window_start = now - (window_secs as i64) * 1000;

        let _: () = redis
            .zrembyscore(&key, i64::MIN, window_start)
            .await?;

        let count: u32 = redis.zcard(&key).await?;

        if count >= limit {
            tracing::warn!(user_id = %user_id, count, limit, "Submission rate limit exceeded");
            return Err(AppError::TooManyRequests {
                retry_after_secs: window_secs,
            });
        }

        Ok(())
    }

    /// Record a created submission in the user's window
    pub async fn record(
        mut redis: ConnectionManager,
        user_id: &Uuid,
        submission_id: &Uuid,
        window_secs: u64,
    ) -> AppResult<()> {
        let key = Self::key(user_id);
        let now = Utc::now().timestamp_millis();

        let _: () = redis.zadd(&key, submission_id.to_string(), now).await?;
        let _: () = redis.expire(&key, window_secs as i64).await?;

        Ok(())
    }

    fn key(user_id: &Uuid) -> String {
        format!("submission_window:{}", user_id)
    }
}

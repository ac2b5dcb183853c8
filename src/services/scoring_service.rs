//! Contest scoring and ranking
//!
//! The scoring formula rewards both correctness and speed: an accept is
//! worth a floor of half the problem's base value no matter how late, plus a
//! bonus up to half the base value that decays linearly as the contest clock
//! runs out. The floor also covers the delayed-webhook case where grading
//! completes after the contest end even though the submission was in time.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::{ContestRepository, contest_repo::StandingsRow},
    error::{AppError, AppResult},
};

/// One ranked leaderboard entry
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedEntry {
    pub rank: i32,
    pub user_id: Uuid,
    pub username: String,
    pub points: i32,
    pub last_successful_submission_at: Option<DateTime<Utc>>,
}

/// Scoring engine and leaderboard ranker
pub struct ScoringService;

impl ScoringService {
    /// Time-decayed points for an accept observed at `now`.
    ///
    /// `max(round((remaining / total) * base + base/2), base/2)`; a negative
    /// `remaining` (grading finished after the contest end) clamps to the
    /// half-credit floor.
    pub fn compute_points(
        base_points: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> i32 {
        let base = base_points as f64;
        let floor = base / 2.0;

        let total = (end - start).num_milliseconds().abs() as f64;
        if total == 0.0 {
            return floor.round() as i32;
        }

        let remaining = (end - now).num_milliseconds() as f64;
        let scored = ((remaining / total) * base + floor).round();

        scored.max(floor) as i32
    }

    /// Credit a contest submission that just transitioned into accepted.
    ///
    /// Awarding is a no-op when the user already solved this problem in this
    /// contest; the repository's unique per-problem record enforces that.
    /// Errors here are the caller's to log and absorb: a scoring failure
    /// must not undo an already-finalized submission.
    pub async fn award_accepted(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        problem_id: &Uuid,
        submission_id: &Uuid,
    ) -> AppResult<Option<i32>> {
        let contest = ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        let contest_problem = ContestRepository::find_contest_problem(pool, contest_id, problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem is not part of this contest".to_string()))?;

        let now = Utc::now();
        let points =
            Self::compute_points(contest_problem.points, contest.start_time, contest.end_time, now);

        let awarded =
            ContestRepository::award_points(pool, contest_id, user_id, problem_id, submission_id, points, now)
                .await?;

        if awarded {
            tracing::info!(
                contest_id = %contest_id,
                user_id = %user_id,
                problem_id = %problem_id,
                points,
                "Awarded contest points"
            );
            Ok(Some(points))
        } else {
            tracing::debug!(
                contest_id = %contest_id,
                user_id = %user_id,
                problem_id = %problem_id,
                "Problem already solved, no points awarded"
            );
            Ok(None)
        }
    }

    /// Fetch and rank the standings for a contest
    pub async fn leaderboard(pool: &PgPool, contest_id: &Uuid) -> AppResult<Vec<RankedEntry>> {
        let rows = ContestRepository::fetch_standings(pool, contest_id).await?;
        Ok(Self::rank(rows))
    }

    /// Deterministic ranking: points descending, then earlier last accepted
    /// submission first (absent timestamps sort last), then username so the
    /// full order is total. Ranks are dense: rows with an identical
    /// (points, last-accept) key share a rank.
    pub fn rank(mut rows: Vec<StandingsRow>) -> Vec<RankedEntry> {
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| {
                    match (a.last_successful_submission_at, b.last_successful_submission_at) {
                        (Some(x), Some(y)) => x.cmp(&y),
                        (Some(_), None) => std::cmp::Ordering::Less,
                        (None, Some(_)) => std::cmp::Ordering::Greater,
                        (None, None) => std::cmp::Ordering::Equal,
                    }
                })
                .then_with(|| a.username.cmp(&b.username))
        });

        let mut entries = Vec::with_capacity(rows.len());
        let mut rank = 0;
        let mut previous_key: Option<(i32, Option<DateTime<Utc>>)> = None;

        for row in rows {
            let key = (row.points, row.last_successful_submission_at);
            if previous_key.as_ref() != Some(&key) {
                rank += 1;
                previous_key = Some(key);
            }

            entries.push(RankedEntry {
                rank,
                user_id: row.user_id,
                username: row.username,
                points: row.points,
                last_successful_submission_at: row.last_successful_submission_at,
            });
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_full_window_remaining() {
        let start = t0();
        let end = start + Duration::seconds(3600);
        assert_eq!(ScoringService::compute_points(100, start, end, start), 150);
    }

    #[test]
    fn test_accept_exactly_at_end() {
        let start = t0();
        let end = start + Duration::seconds(3600);
        assert_eq!(ScoringService::compute_points(100, start, end, end), 50);
    }

    #[test]
    fn test_late_grading_clamps_to_floor() {
        let start = t0();
        let end = start + Duration::seconds(3600);
        let late = end + Duration::seconds(60);
        assert_eq!(ScoringService::compute_points(100, start, end, late), 50);

        let very_late = end + Duration::hours(48);
        assert_eq!(ScoringService::compute_points(100, start, end, very_late), 50);
    }

    #[test]
    fn test_halfway_through() {
        let start = t0();
        let end = start + Duration::seconds(3600);
        let halfway = start + Duration::seconds(1800);
        assert_eq!(ScoringService::compute_points(100, start, end, halfway), 100);
    }

    fn row(
        username: &str,
        points: i32,
        last: Option<DateTime<Utc>>,
    ) -> StandingsRow {
        StandingsRow {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            points,
            last_successful_submission_at: last,
        }
    }

    #[test]
    fn test_rank_orders_by_points_then_time() {
        let early = t0();
        let late = t0() + Duration::minutes(30);

        let ranked = ScoringService::rank(vec![
            row("carol", 100, Some(late)),
            row("alice", 150, Some(late)),
            row("bob", 100, Some(early)),
        ]);

        assert_eq!(ranked[0].username, "alice");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].username, "bob");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].username, "carol");
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let rows = vec![
            row("alice", 100, Some(t0())),
            row("bob", 100, Some(t0())),
            row("carol", 50, None),
        ];

        let first = ScoringService::rank(rows.clone());
        let second = ScoringService::rank(rows);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_identical_keys_share_rank() {
        let ranked = ScoringService::rank(vec![
            row("bob", 100, Some(t0())),
            row("alice", 100, Some(t0())),
            row("carol", 80, Some(t0())),
        ]);

        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 1);
        assert_eq!(ranked[2].rank, 2);
        // Secondary username ordering keeps the listing stable
        assert_eq!(ranked[0].username, "alice");
    }

    #[test]
    fn test_rank_zero_points_without_accept_sorts_last() {
        let ranked = ScoringService::rank(vec![
            row("idle", 0, None),
            row("alice", 120, Some(t0())),
        ]);

        assert_eq!(ranked[0].username, "alice");
        assert_eq!(ranked[1].username, "idle");
    }
}

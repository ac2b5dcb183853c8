//! Judge callback ingestion and submission finalization
//!
//! The judge delivers one callback per test case, concurrently, with no
//! ordering or single-delivery guarantee. Each ingest commits one
//! transaction that marks the test case terminal and decrements the parent
//! pending counter together; the PENDING-guard on that write makes replays
//! no-ops, and exactly one callback observes the counter reaching zero and
//! finalizes. A replayed delivery additionally re-checks whether the
//! submission is fully terminal but unfinalized, so a crash between the
//! counter commit and finalization is repaired by the judge's own retry.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    config::Config,
    constants::statuses,
    db::repositories::SubmissionRepository,
    error::{AppError, AppResult},
    judge::map_verdict,
    models::{SubmissionStatus, SubmissionTestCase},
};

/// Outcome of one callback ingest, reported for logging only — the judge
/// always receives an acknowledgement so its retry machinery stays quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The test case transitioned to a terminal status
    Recorded,
    /// The token was already terminal; replayed delivery, nothing changed
    Replay,
    /// No test case carries this token (stale, forged, or foreign)
    UnknownToken,
}

/// Webhook ingestion service
pub struct WebhookService;

impl WebhookService {
    /// Authenticate and ingest one judge callback.
    ///
    /// Secret mismatch is the only rejection the judge ever sees; unknown
    /// tokens and replays are absorbed with a success response and no
    /// mutation.
    pub async fn ingest(
        pool: &PgPool,
        config: &Config,
        secret: &str,
        token: &str,
        verdict_description: &str,
        time_secs: Option<f64>,
        memory_kb: Option<i64>,
    ) -> AppResult<IngestOutcome> {
        if secret != config.judge.callback_secret {
            tracing::warn!("Judge callback with invalid secret");
            return Err(AppError::Unauthorized);
        }

        let status = map_verdict(verdict_description);

        let Some((submission_id, remaining)) =
            SubmissionRepository::record_test_result(pool, token, status, time_secs, memory_kb)
                .await?
        else {
            // Distinguish a replay from a token we never issued; both are
            // acknowledged without mutating the test case.
            return match SubmissionRepository::find_test_by_token(pool, token).await? {
                Some(test) => {
                    tracing::debug!(token, "Replayed judge callback ignored");
                    // The retry may be repairing a crash between the counter
                    // commit and finalization.
                    Self::try_finalize(pool, &test.submission_id).await?;
                    Ok(IngestOutcome::Replay)
                }
                None => {
                    tracing::warn!(token, "Judge callback for unknown token");
                    Ok(IngestOutcome::UnknownToken)
                }
            };
        };

        tracing::debug!(
            submission_id = %submission_id,
            token,
            status = %status,
            "Recorded test case result"
        );

        if remaining == 0 {
            Self::finalize_submission(pool, &submission_id).await?;
        }

        Ok(IngestOutcome::Recorded)
    }

    /// Finalize on a replayed delivery when every test case is terminal but
    /// the submission is still pending, which happens if a previous ingest
    /// committed its counter decrement and then died before finalizing.
    async fn try_finalize(pool: &PgPool, submission_id: &Uuid) -> AppResult<()> {
        if let Some(submission) = SubmissionRepository::find_by_id(pool, submission_id).await? {
            if submission.pending_tests <= 0 && submission.status == statuses::PENDING {
                Self::finalize_submission(pool, submission_id).await?;
            }
        }
        Ok(())
    }

    /// Aggregate all test case rows into the final status and write it.
    ///
    /// Reached by whichever ingest observed the pending counter hitting
    /// zero, or by a replay repairing an interrupted finalization; the
    /// status guard inside the finalize write keeps it exactly-once either
    /// way.
    async fn finalize_submission(pool: &PgPool, submission_id: &Uuid) -> AppResult<()> {
        let tests = SubmissionRepository::list_tests(pool, submission_id).await?;
        let (status, time_secs, memory_kb) = Self::summarize(&tests);

        let finalized =
            SubmissionRepository::finalize(pool, submission_id, status, time_secs, memory_kb)
                .await?;

        if !finalized {
            // Another writer got here first; nothing left to do.
            return Ok(());
        }

        tracing::info!(
            submission_id = %submission_id,
            status = %status,
            "Submission finalized"
        );

        if status.is_accepted() {
            Self::score_if_contest(pool, submission_id).await;
        }

        Ok(())
    }

    /// Final status plus worst-case time/memory across all test cases.
    /// A single slow test case determines the reported time.
    fn summarize(
        tests: &[SubmissionTestCase],
    ) -> (SubmissionStatus, Option<f64>, Option<i64>) {
        let statuses: Vec<_> = tests.iter().map(|t| t.parsed_status()).collect();
        let status = SubmissionStatus::aggregate(&statuses);

        let time_secs = tests
            .iter()
            .filter_map(|t| t.time_secs)
            .fold(None, |acc: Option<f64>, t| {
                Some(acc.map_or(t, |a| a.max(t)))
            });
        let memory_kb = tests.iter().filter_map(|t| t.memory_kb).max();

        (status, time_secs, memory_kb)
    }

    /// Run scoring for an accepted contest submission. Scoring failures are
    /// logged and swallowed: the submission is already finalized and a bad
    /// standings write must not bleed back into the webhook response.
    async fn score_if_contest(pool: &PgPool, submission_id: &Uuid) {
        let submission = match SubmissionRepository::find_by_id(pool, submission_id).await {
            Ok(Some(s)) => s,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(submission_id = %submission_id, error = %e, "Failed to reload submission for scoring");
                return;
            }
        };

        let Some(contest_id) = submission.contest_id else {
            return;
        };

        if let Err(e) = super::ScoringService::award_accepted(
            pool,
            &contest_id,
            &submission.user_id,
            &submission.problem_id,
            &submission.id,
        )
        .await
        {
            tracing::error!(
                submission_id = %submission_id,
                contest_id = %contest_id,
                user_id = %submission.user_id,
                error = %e,
                "Failed to award contest points"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_statuses;
    use crate::models::TestCaseStatus;
    use crate::test_utils::{harness, seed};
    use chrono::Utc;

    fn test_case(status: &str, time_secs: Option<f64>, memory_kb: Option<i64>) -> SubmissionTestCase {
        SubmissionTestCase {
            id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            index: 0,
            token: Uuid::new_v4().to_string(),
            status: status.to_string(),
            time_secs,
            memory_kb,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_all_accepted_takes_max_time() {
        let tests = vec![
            test_case(test_statuses::ACCEPTED, Some(0.12), Some(1024)),
            test_case(test_statuses::ACCEPTED, Some(0.95), Some(2048)),
            test_case(test_statuses::ACCEPTED, Some(0.30), Some(512)),
        ];

        let (status, time, memory) = WebhookService::summarize(&tests);
        assert_eq!(status, SubmissionStatus::Accepted);
        assert_eq!(time, Some(0.95));
        assert_eq!(memory, Some(2048));
    }

    #[test]
    fn test_summarize_tle_flavored_rejection() {
        let tests = vec![
            test_case(test_statuses::ACCEPTED, Some(0.1), None),
            test_case(test_statuses::ACCEPTED, Some(0.2), None),
            test_case(test_statuses::TIME_LIMIT_EXCEEDED, Some(2.0), None),
        ];

        let (status, _, _) = WebhookService::summarize(&tests);
        assert_eq!(status, SubmissionStatus::TimeLimitExceeded);
    }

    #[test]
    fn test_summarize_missing_metrics_tolerated() {
        let tests = vec![
            test_case(test_statuses::FAILED, None, None),
            test_case(test_statuses::ACCEPTED, Some(0.4), Some(256)),
        ];

        let (status, time, memory) = WebhookService::summarize(&tests);
        assert_eq!(status, SubmissionStatus::Rejected);
        assert_eq!(time, Some(0.4));
        assert_eq!(memory, Some(256));
    }

    #[tokio::test]
    async fn test_replayed_callback_leaves_state_unchanged() {
        let pool = harness::pool().await;
        let config = harness::config();
        let user_id = seed::user(&pool).await;
        let problem_id = seed::problem(&pool).await;
        let (submission, tokens) =
            seed::pending_submission(&pool, &user_id, &problem_id, 2).await;

        let outcome = WebhookService::ingest(
            &pool,
            &config,
            harness::CALLBACK_SECRET,
            &tokens[0],
            "Accepted",
            Some(0.2),
            Some(512),
        )
        .await
        .unwrap();
        assert_eq!(outcome, IngestOutcome::Recorded);

        // Redelivery with different metrics must not touch the row
        let outcome = WebhookService::ingest(
            &pool,
            &config,
            harness::CALLBACK_SECRET,
            &tokens[0],
            "Time Limit Exceeded",
            Some(9.9),
            None,
        )
        .await
        .unwrap();
        assert_eq!(outcome, IngestOutcome::Replay);

        let rows = SubmissionRepository::list_tests(&pool, &submission.id)
            .await
            .unwrap();
        assert_eq!(rows[0].status, test_statuses::ACCEPTED);
        assert_eq!(rows[0].time_secs, Some(0.2));

        let submission = SubmissionRepository::find_by_id(&pool, &submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.status, statuses::PENDING);
        assert_eq!(submission.pending_tests, 1);
    }

    #[tokio::test]
    async fn test_concurrent_final_callbacks_finalize_once() {
        let pool = harness::pool().await;
        let config = harness::config();
        let user_id = seed::user(&pool).await;
        let problem_id = seed::problem(&pool).await;
        let (submission, tokens) =
            seed::pending_submission(&pool, &user_id, &problem_id, 4).await;

        let mut set = tokio::task::JoinSet::new();
        for token in tokens {
            let pool = pool.clone();
            let config = config.clone();
            set.spawn(async move {
                WebhookService::ingest(
                    &pool,
                    &config,
                    harness::CALLBACK_SECRET,
                    &token,
                    "Accepted",
                    Some(0.1),
                    Some(256),
                )
                .await
            });
        }
        while let Some(result) = set.join_next().await {
            assert_eq!(result.unwrap().unwrap(), IngestOutcome::Recorded);
        }

        let submission = SubmissionRepository::find_by_id(&pool, &submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submission.status, statuses::ACCEPTED);
        assert_eq!(submission.pending_tests, 0);
        assert!(submission.finalized_at.is_some());
    }

    #[tokio::test]
    async fn test_retry_finalizes_interrupted_ingest() {
        let pool = harness::pool().await;
        let config = harness::config();
        let user_id = seed::user(&pool).await;
        let problem_id = seed::problem(&pool).await;
        let (submission, tokens) =
            seed::pending_submission(&pool, &user_id, &problem_id, 1).await;

        // Counter decrement committed, then the process died before
        // finalization ran
        let recorded = SubmissionRepository::record_test_result(
            &pool,
            &tokens[0],
            TestCaseStatus::Accepted,
            Some(0.1),
            Some(128),
        )
        .await
        .unwrap();
        assert_eq!(recorded.map(|(_, remaining)| remaining), Some(0));

        let stuck = SubmissionRepository::find_by_id(&pool, &submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stuck.status, statuses::PENDING);

        // The judge's retry of the same delivery must repair it
        let outcome = WebhookService::ingest(
            &pool,
            &config,
            harness::CALLBACK_SECRET,
            &tokens[0],
            "Accepted",
            Some(0.1),
            Some(128),
        )
        .await
        .unwrap();
        assert_eq!(outcome, IngestOutcome::Replay);

        let repaired = SubmissionRepository::find_by_id(&pool, &submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(repaired.status, statuses::ACCEPTED);
        assert!(repaired.finalized_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_token_acknowledged_without_mutation() {
        let pool = harness::pool().await;
        let config = harness::config();

        let outcome = WebhookService::ingest(
            &pool,
            &config,
            harness::CALLBACK_SECRET,
            &Uuid::new_v4().to_string(),
            "Accepted",
            None,
            None,
        )
        .await
        .unwrap();
        assert_eq!(outcome, IngestOutcome::UnknownToken);
    }

    #[tokio::test]
    async fn test_secret_mismatch_rejected() {
        let pool = harness::pool().await;
        let config = harness::config();

        let err = WebhookService::ingest(
            &pool,
            &config,
            "wrong-secret",
            &Uuid::new_v4().to_string(),
            "Accepted",
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}

//! Judge dispatch client
//!
//! Builds and sends one batched execution request to the external judge, one
//! sub-request per test case, and returns the list of tracking tokens used to
//! correlate the asynchronous callbacks.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{config::JudgeConfig, error::AppError};

/// One sub-request of a batched dispatch
#[derive(Debug, Clone, Serialize)]
pub struct JudgeSubmission {
    pub language_id: i32,
    pub source_code: String,
    pub stdin: String,
    pub expected_output: String,
    pub callback_url: String,
}

/// Batch dispatch request body
#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    submissions: &'a [JudgeSubmission],
}

/// One entry of the batch dispatch response
#[derive(Debug, Deserialize)]
struct BatchResponseEntry {
    token: Option<String>,
}

/// Judge dispatch errors, split by retryability
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    /// Network failure or timeout before a response arrived (retryable)
    #[error("judge unreachable: {0}")]
    Unreachable(String),

    /// The judge rejected the request as invalid (non-retryable)
    #[error("judge rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The judge failed server-side (retryable)
    #[error("judge failed with status {status}")]
    Unavailable { status: u16 },

    /// The response did not honor the dispatch contract (non-retryable,
    /// logged as a service-level incident by the error layer)
    #[error("malformed judge response: {0}")]
    Malformed(String),
}

impl From<JudgeError> for AppError {
    fn from(err: JudgeError) -> Self {
        match err {
            JudgeError::Unreachable(msg) => AppError::JudgeUnavailable(msg),
            JudgeError::Unavailable { status } => {
                AppError::JudgeUnavailable(format!("upstream status {status}"))
            }
            JudgeError::Rejected { status, body } => {
                AppError::JudgeRejected(format!("status {status}: {body}"))
            }
            JudgeError::Malformed(msg) => AppError::JudgeMalformedResponse(msg),
        }
    }
}

/// Client for the external judge's batch submission endpoint
#[async_trait]
pub trait JudgeClient: Send + Sync {
    /// Dispatch a batch of test case executions. Returns one tracking token
    /// per sub-request, in request order.
    async fn dispatch_batch(&self, batch: &[JudgeSubmission]) -> Result<Vec<String>, JudgeError>;
}

/// HTTP implementation backed by reqwest
pub struct HttpJudgeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpJudgeClient {
    /// Build a client from the judge configuration. The request timeout is a
    /// generous buffer over the judge's own execution limit, so a hung
    /// dispatch surfaces as a retryable error instead of blocking forever.
    pub fn new(config: &JudgeConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("judge client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl JudgeClient for HttpJudgeClient {
    async fn dispatch_batch(&self, batch: &[JudgeSubmission]) -> Result<Vec<String>, JudgeError> {
        let url = format!("{}/submissions/batch?base64_encoded=false", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("X-Auth-Token", &self.api_key)
            .json(&BatchRequest { submissions: batch })
            .send()
            .await
            .map_err(|e| JudgeError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(JudgeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        if status.is_server_error() {
            return Err(JudgeError::Unavailable {
                status: status.as_u16(),
            });
        }

        let entries: Vec<BatchResponseEntry> = response
            .json()
            .await
            .map_err(|e| JudgeError::Malformed(e.to_string()))?;

        validate_tokens(entries, batch.len())
    }
}

/// Enforce the dispatch contract: exactly one entry per sub-request, every
/// entry carrying a non-empty token. Any violation is a hard failure and the
/// caller must not persist anything.
fn validate_tokens(
    entries: Vec<BatchResponseEntry>,
    expected: usize,
) -> Result<Vec<String>, JudgeError> {
    if entries.len() != expected {
        return Err(JudgeError::Malformed(format!(
            "expected {} result entries, got {}",
            expected,
            entries.len()
        )));
    }

    let mut tokens = Vec::with_capacity(expected);
    for (i, entry) in entries.into_iter().enumerate() {
        match entry.token {
            Some(token) if !token.is_empty() => tokens.push(token),
            _ => {
                return Err(JudgeError::Malformed(format!(
                    "missing tracking token for entry {i}"
                )));
            }
        }
    }

    Ok(tokens)
}

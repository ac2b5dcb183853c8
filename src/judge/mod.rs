//! External judge integration
//!
//! The judge is a black box reached through exactly two surfaces: a batched
//! dispatch call (client) and per-test-case result callbacks (verdict
//! mapping consumed by the webhook service).

pub mod client;
pub mod verdict;

pub use client::{HttpJudgeClient, JudgeClient, JudgeError, JudgeSubmission};
pub use verdict::map_verdict;

//! CodeClash - Competitive Programming Platform Backend
//!
//! This library provides the submission evaluation and contest scoring
//! pipeline for the CodeClash platform. Code execution is delegated to an
//! external judge service: submissions are dispatched as one batch per
//! attempt (one sub-request per test case) and results arrive back as
//! asynchronous per-test-case webhook callbacks, which are aggregated into a
//! final verdict and, for contest submissions, into time-decayed points and
//! standings.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs
//!
//! The judge is reached only through the `judge` module's dispatch client
//! and verdict mapping; its execution semantics are a black box.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod judge;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;

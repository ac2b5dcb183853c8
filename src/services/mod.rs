//! Business logic services

pub mod auth_service;
pub mod code_safety;
pub mod contest_service;
pub mod rate_limiter;
pub mod scoring_service;
pub mod submission_service;
pub mod webhook_service;

pub use auth_service::AuthService;
pub use code_safety::CodeSafetyFilter;
pub use contest_service::ContestService;
pub use rate_limiter::RateLimiter;
pub use scoring_service::ScoringService;
pub use submission_service::SubmissionService;
pub use webhook_service::WebhookService;

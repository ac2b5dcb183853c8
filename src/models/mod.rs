//! Domain models
//!
//! Database-backed models and status enums shared across services.

pub mod contest;
pub mod problem;
pub mod submission;
pub mod test_case;
pub mod user;

pub use contest::{Contest, ContestProblem};
pub use problem::{Problem, TestBundle, TestVector};
pub use submission::{Submission, SubmissionStatus};
pub use test_case::{SubmissionTestCase, TestCaseStatus};
pub use user::User;

//! Database repositories
//!
//! Each repository is a thin unit struct with static async functions over a
//! `PgPool`, keeping all SQL in one layer.

pub mod contest_repo;
pub mod problem_repo;
pub mod submission_repo;
pub mod user_repo;

pub use contest_repo::ContestRepository;
pub use problem_repo::ProblemRepository;
pub use submission_repo::SubmissionRepository;
pub use user_repo::UserRepository;

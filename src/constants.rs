//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

// =============================================================================
// SUBMISSION LIMITS
// =============================================================================

/// Maximum user-supplied source fragment size in bytes (64 KB)
pub const MAX_SOURCE_CODE_SIZE: usize = 64 * 1024;

/// Maximum assembled source size in bytes (template + user code)
pub const MAX_ASSEMBLED_CODE_SIZE: usize = 256 * 1024;

/// Maximum number of test cases dispatched for a single submission
pub const DEFAULT_MAX_TEST_CASES: usize = 50;

/// Marker in a problem's language template replaced by the user's code
pub const USER_CODE_MARKER: &str = "##USER_CODE_HERE##";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Default maximum submissions per user per window
pub const DEFAULT_SUBMISSION_RATE_LIMIT: u32 = 5;

/// Default rate limit window in seconds
pub const DEFAULT_SUBMISSION_RATE_WINDOW_SECS: u64 = 60;

// =============================================================================
// JUDGE DISPATCH
// =============================================================================

/// Default judge dispatch timeout in seconds.
/// Generous buffer over the judge's own per-test execution limit.
pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SUBMISSION STATUSES
// =============================================================================

/// Submission status strings as stored in the database
pub mod statuses {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "accepted";
    pub const REJECTED: &str = "rejected";
    pub const TIME_LIMIT_EXCEEDED: &str = "time_limit_exceeded";
    pub const COMPILATION_ERROR: &str = "compilation_error";
}

/// Per-test-case status strings as stored in the database
pub mod test_statuses {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "accepted";
    pub const FAILED: &str = "failed";
    pub const TIME_LIMIT_EXCEEDED: &str = "time_limit_exceeded";
    pub const COMPILATION_ERROR: &str = "compilation_error";
}

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const PARTICIPANT: &str = "participant";
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

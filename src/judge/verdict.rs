//! Judge verdict mapping
//!
//! The judge reports a categorical verdict description per test case. This
//! fixed table maps that vocabulary onto the internal test case status.
//! Anything unrecognized maps to Failed rather than erroring, so every test
//! case is guaranteed to reach a terminal state.

use crate::models::TestCaseStatus;

/// Map a judge verdict description to the internal test case status
pub fn map_verdict(description: &str) -> TestCaseStatus {
    match description.trim() {
        "Accepted" => TestCaseStatus::Accepted,
        "Time Limit Exceeded" => TestCaseStatus::TimeLimitExceeded,
        "Compilation Error" => TestCaseStatus::CompilationError,
        "Wrong Answer"
        | "Internal Error"
        | "Exec Format Error"
        | "Memory Limit Exceeded" => TestCaseStatus::Failed,
        d if d.starts_with("Runtime Error") => TestCaseStatus::Failed,
        _ => TestCaseStatus::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_verdicts() {
        assert_eq!(map_verdict("Accepted"), TestCaseStatus::Accepted);
        assert_eq!(
            map_verdict("Time Limit Exceeded"),
            TestCaseStatus::TimeLimitExceeded
        );
        assert_eq!(
            map_verdict("Compilation Error"),
            TestCaseStatus::CompilationError
        );
        assert_eq!(map_verdict("Wrong Answer"), TestCaseStatus::Failed);
        assert_eq!(map_verdict("Runtime Error (SIGSEGV)"), TestCaseStatus::Failed);
    }

    #[test]
    fn test_unrecognized_defaults_to_failed() {
        assert_eq!(map_verdict("Quantum Flux"), TestCaseStatus::Failed);
        assert_eq!(map_verdict(""), TestCaseStatus::Failed);
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(map_verdict("  Accepted "), TestCaseStatus::Accepted);
    }
}

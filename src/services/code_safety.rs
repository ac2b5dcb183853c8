//! Static code safety filter
//!
//! Coarse defense-in-depth over the raw user-supplied fragment, checked
//! before template substitution: a size cap plus a fixed list of dangerous
//! call patterns (process/shell spawning, dynamic eval, reflective runtime
//! access), matched case-insensitively. This is not a sandbox; the judge's
//! isolation is the real boundary.

use std::sync::LazyLock;

use regex::RegexSet;

use crate::error::{AppError, AppResult};

/// Dangerous call patterns rejected in user code
const DANGEROUS_PATTERNS: &[(&str, &str)] = &[
    (r"\bsystem\s*\(", "process spawning (system)"),
    (r"\bpopen\s*\(", "process spawning (popen)"),
    (r"\bexec[lv]p?e?\s*\(", "process spawning (exec family)"),
    (r"\bfork\s*\(", "process spawning (fork)"),
    (r"\bProcessBuilder\b", "process spawning (ProcessBuilder)"),
    (r"Runtime\s*\.\s*getRuntime", "process spawning (Runtime.getRuntime)"),
    (r"\bchild_process\b", "process spawning (child_process)"),
    (r"\bsubprocess\b", "process spawning (subprocess)"),
    (r"\bos\s*\.\s*system", "process spawning (os.system)"),
    (r"\beval\s*\(", "dynamic evaluation (eval)"),
    (r"\bFunction\s*\(", "dynamic evaluation (Function constructor)"),
    (r"__import__", "dynamic import"),
    (r"\bimportlib\b", "dynamic import (importlib)"),
    (r"java\s*\.\s*lang\s*\.\s*reflect", "reflective runtime access"),
    (r"\bgetattr\s*\(\s*__builtins__", "reflective builtins access"),
];

static PATTERN_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(
        DANGEROUS_PATTERNS
            .iter()
            .map(|(pattern, _)| format!("(?i){pattern}")),
    )
    .expect("dangerous pattern list must compile")
});

/// Static pattern rejection of obviously dangerous source snippets
pub struct CodeSafetyFilter;

impl CodeSafetyFilter {
    /// Scan a user source fragment. Returns the specific rejection reason on
    /// a match, so the caller can surface it verbatim.
    pub fn scan(code: &str, max_len: usize) -> AppResult<()> {
        if code.len() > max_len {
            return Err(AppError::UnsafeCode(format!(
                "source exceeds maximum size of {max_len} bytes"
            )));
        }

        if let Some(idx) = PATTERN_SET.matches(code).iter().next() {
            let (_, reason) = DANGEROUS_PATTERNS[idx];
            tracing::warn!(reason, "Rejected submission by safety filter");
            return Err(AppError::UnsafeCode(format!(
                "disallowed construct: {reason}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 64 * 1024;

    #[test]
    fn test_clean_code_passes() {
        let code = "fn solve(a: i64, b: i64) -> i64 { a + b }";
        assert!(CodeSafetyFilter::scan(code, MAX).is_ok());
    }

    #[test]
    fn test_rejects_oversized_code() {
        let code = "a".repeat(MAX + 1);
        assert!(matches!(
            CodeSafetyFilter::scan(&code, MAX),
            Err(AppError::UnsafeCode(_))
        ));
    }

    #[test]
    fn test_rejects_shell_spawn() {
        assert!(CodeSafetyFilter::scan("system(\"rm -rf /\")", MAX).is_err());
        assert!(CodeSafetyFilter::scan("popen(\"ls\", \"r\")", MAX).is_err());
    }

    #[test]
    fn test_rejects_case_insensitively() {
        assert!(CodeSafetyFilter::scan("SYSTEM(\"whoami\")", MAX).is_err());
        assert!(CodeSafetyFilter::scan("EVAL(payload)", MAX).is_err());
    }

    #[test]
    fn test_rejects_reflection_and_eval() {
        assert!(CodeSafetyFilter::scan("Runtime.getRuntime().exec(cmd)", MAX).is_err());
        assert!(CodeSafetyFilter::scan("import java.lang.reflect.Method;", MAX).is_err());
        assert!(CodeSafetyFilter::scan("__import__('os')", MAX).is_err());
    }

    #[test]
    fn test_identifier_containing_eval_is_fine() {
        assert!(CodeSafetyFilter::scan("let evaluation = score(medieval);", MAX).is_ok());
    }
}

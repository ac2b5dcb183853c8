//! Judge callback DTOs

use serde::Deserialize;

/// Query parameters on the callback URL
#[derive(Debug, Deserialize)]
pub struct JudgeCallbackQuery {
    /// Shared secret embedded in the callback URL at dispatch time
    pub secret: Option<String>,
}

/// Judge callback body, one per test case execution
#[derive(Debug, Deserialize)]
pub struct JudgeCallbackRequest {
    /// Tracking token correlating this callback to a test case row
    pub token: String,

    pub status: JudgeVerdict,

    /// Execution time in seconds
    pub time: Option<Numeric>,

    /// Peak memory in KB
    pub memory: Option<Numeric>,
}

/// Categorical verdict as reported by the judge
#[derive(Debug, Deserialize)]
pub struct JudgeVerdict {
    pub description: String,
}

/// The judge reports numeric fields either as numbers or numeric strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accepts_both_forms() {
        let n: Numeric = serde_json::from_str("0.42").unwrap();
        assert_eq!(n.as_f64(), Some(0.42));

        let n: Numeric = serde_json::from_str("\"0.42\"").unwrap();
        assert_eq!(n.as_f64(), Some(0.42));

        let n: Numeric = serde_json::from_str("\"not a number\"").unwrap();
        assert_eq!(n.as_f64(), None);
    }

    #[test]
    fn test_callback_body_parses() {
        let body = r#"{
            "token": "f9a3b1c2",
            "status": { "id": 3, "description": "Accepted" },
            "time": "0.031",
            "memory": 2048
        }"#;

        let parsed: JudgeCallbackRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.token, "f9a3b1c2");
        assert_eq!(parsed.status.description, "Accepted");
        assert_eq!(parsed.time.unwrap().as_f64(), Some(0.031));
        assert_eq!(parsed.memory.unwrap().as_f64(), Some(2048.0));
    }
}

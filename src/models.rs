//! Wire shapes exchanged with the execution platform.
//!
//! These are passive transfer types: the platform owns all durable
//! state, the console only serializes requests and decodes responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Runtime a function executes under.
///
/// The wire format is lowercase (`"python"`, `"javascript"`). Any
/// other value fails deserialization, so a platform response carrying
/// an unknown runtime surfaces as a decode error instead of being
/// silently coerced.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
}

impl Language {
    /// Selector order on the deploy and edit forms.
    pub const ALL: [Language; 2] = [Language::Python, Language::Javascript];

    /// Flip between the two supported runtimes.
    pub fn toggled(self) -> Self {
        match self {
            Language::Python => Language::Javascript,
            Language::Javascript => Language::Python,
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Javascript => write!(f, "javascript"),
        }
    }
}

/// Request body for create and update calls. The platform assigns
/// ids; none is ever sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub language: Language,
    pub code: String,
    /// Server-side execution limit in seconds (1-300).
    pub timeout: u32,
}

/// A deployed function as returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub id: i64,
    pub name: String,
    pub language: Language,
    pub code: String,
    pub timeout: u32,
}

impl Function {
    /// The editable fields, in the shape update calls send back.
    pub fn spec(&self) -> FunctionSpec {
        FunctionSpec {
            name: self.name.clone(),
            language: self.language,
            code: self.code.clone(),
            timeout: self.timeout,
        }
    }
}

/// Response of an execute call. Richer responses are tolerated; only
/// `result` is read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionOutcome {
    pub result: String,
}

/// One execution metric record, read-only from the console's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub func_id: i64,
    pub timestamp: DateTime<Utc>,
    /// Execution wall time in seconds.
    pub response_time: f64,
    /// Error description, absent for successful executions.
    pub errors: Option<String>,
}

/// Aggregate statistics over a metrics result set.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub avg_response_time: f64,
    pub total: usize,
    /// Percentage of records carrying a non-null error.
    pub error_rate: f64,
}

impl MetricsSummary {
    /// Compute statistics for a result set. Returns `None` for an
    /// empty set so callers never divide by zero.
    pub fn from_records(records: &[MetricRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let total = records.len();
        let avg_response_time =
            records.iter().map(|r| r.response_time).sum::<f64>() / total as f64;
        let error_count = records.iter().filter(|r| r.errors.is_some()).count();
        Some(Self {
            avg_response_time,
            total,
            error_rate: error_count as f64 / total as f64 * 100.0,
        })
    }

    /// Get error rate color based on severity.
    pub fn error_rate_color(&self) -> ratatui::prelude::Color {
        use ratatui::prelude::Color;
        if self.error_rate >= 50.0 {
            Color::Red
        } else if self.error_rate >= 10.0 {
            Color::Yellow
        } else {
            Color::Green
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(func_id: i64, response_time: f64, errors: Option<&str>) -> MetricRecord {
        MetricRecord {
            func_id,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            response_time,
            errors: errors.map(String::from),
        }
    }

    #[test]
    // An empty result set must not produce statistics.
    fn summary_is_none_for_empty_records() {
        assert_eq!(MetricsSummary::from_records(&[]), None);
    }

    #[test]
    // Error rate is 100 * K / N for K errored records out of N.
    fn summary_error_rate() {
        let records = vec![
            record(1, 0.2, None),
            record(1, 0.4, Some("timeout")),
            record(2, 0.6, None),
            record(2, 0.8, Some("oom")),
        ];
        let summary = MetricsSummary::from_records(&records).unwrap();
        assert_eq!(summary.total, 4);
        assert!((summary.error_rate - 50.0).abs() < f64::EPSILON);
        assert!((summary.avg_response_time - 0.5).abs() < 1e-9);
    }

    #[test]
    fn summary_with_no_errors() {
        let records = vec![record(1, 1.0, None), record(1, 3.0, None)];
        let summary = MetricsSummary::from_records(&records).unwrap();
        assert_eq!(summary.error_rate, 0.0);
        assert!((summary.avg_response_time - 2.0).abs() < 1e-9);
    }

    #[test]
    // Functions decode from the platform's JSON shape.
    fn function_decodes_from_platform_json() {
        let json = r#"{"id":7,"name":"hello","language":"python","code":"def handler(e): return e","timeout":10}"#;
        let func: Function = serde_json::from_str(json).unwrap();
        assert_eq!(func.id, 7);
        assert_eq!(func.language, Language::Python);
        assert_eq!(func.spec().timeout, 10);
    }

    #[test]
    // A runtime outside the two known values must fail loudly.
    fn unknown_language_is_rejected() {
        let json = r#"{"id":1,"name":"f","language":"ruby","code":"","timeout":5}"#;
        assert!(serde_json::from_str::<Function>(json).is_err());
    }

    #[test]
    // The spec sent on update carries no id field.
    fn spec_serializes_without_id() {
        let func = Function {
            id: 3,
            name: "f".into(),
            language: Language::Javascript,
            code: "exports.handler = e => e".into(),
            timeout: 30,
        };
        let value = serde_json::to_value(func.spec()).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["language"], "javascript");
    }
}

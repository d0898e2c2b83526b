use crate::api::error::ApiError;
use log::LevelFilter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_api_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Non-critical: temporary server-side issues
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Critical: the request itself was wrong (bad id, bad body)
            ApiError::Http { .. } => LogLevel::Error,

            // Malformed response body
            ApiError::Json(_) => LogLevel::Error,

            // Network issues - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn server_errors_are_warnings() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_api_error(&http(500)), LogLevel::Warn);
        assert_eq!(classifier.classify_api_error(&http(503)), LogLevel::Warn);
    }

    #[test]
    fn client_errors_are_errors() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_api_error(&http(404)), LogLevel::Error);
        assert_eq!(classifier.classify_api_error(&http(422)), LogLevel::Error);
    }

    #[test]
    fn rate_limits_stay_quiet() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_api_error(&http(429)), LogLevel::Debug);
    }

    #[test]
    fn decode_failures_are_errors() {
        let classifier = ErrorClassifier::new();
        let err = serde_json::from_str::<crate::models::Function>("not-json").unwrap_err();
        assert_eq!(
            classifier.classify_api_error(&ApiError::Json(err)),
            LogLevel::Error
        );
    }
}

//! Event System
//!
//! Types and implementations for the activity log

use crate::api::error::ApiError;
use crate::error_classifier::{ErrorClassifier, LogLevel};
use crate::logging::should_log_with_env;
use chrono::Local;
use std::fmt::Display;

/// Dashboard page an event originated from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Source {
    Deploy,
    Manage,
    Execute,
    Metrics,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Warning,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    /// A completed action, always shown.
    pub fn success(source: Source, msg: String) -> Self {
        Self::new(source, msg, EventType::Success, LogLevel::Info)
    }

    /// A local precondition failure; nothing was sent.
    pub fn warning(source: Source, msg: String) -> Self {
        Self::new(source, msg, EventType::Warning, LogLevel::Warn)
    }

    /// Neutral information, e.g. an empty result set.
    pub fn info(source: Source, msg: String) -> Self {
        Self::new(source, msg, EventType::Info, LogLevel::Info)
    }

    /// A local error that never reached the network.
    pub fn local_error(source: Source, msg: String) -> Self {
        Self::new(source, msg, EventType::Error, LogLevel::Error)
    }

    /// A failed platform call, classified for display severity.
    pub fn api_error(source: Source, error: &ApiError) -> Self {
        let log_level = ErrorClassifier::new().classify_api_error(error);
        Self::new(source, error.to_string(), EventType::Error, log_level)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_carry_warn_level() {
        let event = Event::warning(Source::Deploy, "Please enter both name and code.".into());
        assert_eq!(event.event_type, EventType::Warning);
        assert_eq!(event.log_level, LogLevel::Warn);
        assert!(event.should_display());
    }

    #[test]
    fn api_errors_keep_the_error_text() {
        let err = ApiError::Http {
            status: 502,
            message: "bad gateway".into(),
        };
        let event = Event::api_error(Source::Metrics, &err);
        assert_eq!(event.event_type, EventType::Error);
        assert_eq!(event.log_level, LogLevel::Warn);
        assert!(event.msg.contains("502"));
    }
}

use crate::error_classifier::LogLevel;
use std::env;

/// Display threshold resolved from RUST_LOG, defaulting to info.
pub fn env_threshold() -> LogLevel {
    match env::var("RUST_LOG") {
        Ok(value) => parse_directive(&value),
        Err(_) => LogLevel::Info,
    }
}

/// Parse the first directive of a RUST_LOG value, tolerating the
/// `module=level` form.
pub fn parse_directive(directive: &str) -> LogLevel {
    let first = directive.split(',').next().unwrap_or(directive);
    let level = first.rsplit('=').next().unwrap_or(first);
    match level.trim().to_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

pub fn should_log_with_env(event_level: LogLevel) -> bool {
    event_level >= env_threshold()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_levels() {
        assert_eq!(parse_directive("trace"), LogLevel::Trace);
        assert_eq!(parse_directive("debug"), LogLevel::Debug);
        assert_eq!(parse_directive("warn"), LogLevel::Warn);
        assert_eq!(parse_directive("warning"), LogLevel::Warn);
        assert_eq!(parse_directive("error"), LogLevel::Error);
    }

    #[test]
    fn parses_module_directives() {
        assert_eq!(parse_directive("faas_console=debug"), LogLevel::Debug);
        assert_eq!(
            parse_directive("faas_console=debug,hyper=error"),
            LogLevel::Debug
        );
    }

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(parse_directive("loud"), LogLevel::Info);
        assert_eq!(parse_directive(""), LogLevel::Info);
    }
}

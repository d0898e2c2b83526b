pub mod cli_consts {
    //! Console Configuration Constants
    //!
    //! This module contains the configuration constants for the
    //! console, organized by functional area.

    /// The maximum number of events to keep in the activity log.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Server-side execution limit bounds for a function.
    pub mod function_timeout {
        /// Smallest accepted timeout (seconds).
        pub const MIN_SECS: u32 = 1;

        /// Largest accepted timeout (seconds).
        pub const MAX_SECS: u32 = 300;

        /// Default shown on a fresh deploy form.
        pub const DEFAULT_SECS: u32 = 30;

        /// Step applied by PageUp/PageDown on the timeout field.
        pub const COARSE_STEP: u32 = 10;

        /// Clamp a requested timeout into the accepted range.
        pub const fn clamp(secs: u32) -> u32 {
            if secs < MIN_SECS {
                MIN_SECS
            } else if secs > MAX_SECS {
                MAX_SECS
            } else {
                secs
            }
        }
    }

    /// HTTP transport configuration
    pub mod http {
        use std::time::Duration;

        /// Connection establishment timeout (seconds).
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Default per-request timeout (seconds).
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        /// Execute requests may block for as long as the platform's
        /// own per-function limit allows, plus slack.
        pub const EXECUTE_TIMEOUT_SECS: u64 = super::function_timeout::MAX_SECS as u64 + 10;

        /// Helper function to get the connect timeout
        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        /// Helper function to get the request timeout
        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }

        /// Helper function to get the execute timeout
        pub const fn execute_timeout() -> Duration {
            Duration::from_secs(EXECUTE_TIMEOUT_SECS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cli_consts::function_timeout;

    #[test]
    fn timeout_clamp_bounds() {
        assert_eq!(function_timeout::clamp(0), 1);
        assert_eq!(function_timeout::clamp(30), 30);
        assert_eq!(function_timeout::clamp(301), 300);
    }
}

//! Runtime logging preferences read from the environment

use super::events::LogLevel;
use std::env;

/// Environment variable names
pub mod env_vars {
    pub const LOG_LEVEL: &str = "RHSM_LOG_LEVEL";
    pub const LOG_STRUCTURED: &str = "RHSM_LOG_STRUCTURED";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of forwarding to the `log` facade
    pub use_structured_logging: bool,

    /// Events below this level are dropped
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOG_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOG_LEVEL)
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

impl LoggingPreferences {
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_log_level = level;
        self
    }

    pub fn with_structured(mut self, structured: bool) -> Self {
        self.use_structured_logging = structured;
        self
    }
}

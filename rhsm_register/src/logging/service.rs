//! Logging service and logger backends

use super::config::LoggingPreferences;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with a minimum level filter
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from environment preferences
    pub fn with_preferences(preferences: &LoggingPreferences) -> Self {
        let logger: Arc<dyn Logger> = if preferences.use_structured_logging {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(FacadeLogger)
        };

        Self::new(logger, preferences.min_log_level)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Forwards events to the `log` facade; the binary picks the backend
pub struct FacadeLogger;

impl Logger for FacadeLogger {
    fn log(&self, event: &LogEvent) {
        log::log!(
            target: "rhsm_register",
            event.level.to_facade_level(),
            "{}",
            event.format()
        );
    }
}

/// JSON lines on stderr for tooling integration
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        match event.format_json() {
            Ok(json) => eprintln!("{}", json),
            // Fall back to the plain format if serialization fails
            Err(_) => eprintln!("{}", event.format()),
        }
    }
}

/// Memory logger for testing
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn has_code(&self, code: super::Code) -> bool {
        self.get_events().iter().any(|e| e.code == code)
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_level_filtering() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Warning);

        service.log_event(LogEvent::info("dropped"));
        service.log_event(LogEvent::debug("dropped"));
        service.log_event(LogEvent::warning(
            codes::warnings::FORCED_REGISTRATION,
            "kept",
        ));
        service.log_event(LogEvent::error(codes::provider::CREATE_FAILED, "kept"));

        assert_eq!(memory.event_count(), 2);
        assert!(memory.has_code(codes::provider::CREATE_FAILED));
    }

    #[test]
    fn test_preferences_select_level() {
        let preferences = LoggingPreferences {
            use_structured_logging: true,
            min_log_level: LogLevel::Debug,
        };
        let service = LoggingService::with_preferences(&preferences);

        assert_eq!(service.min_level(), LogLevel::Debug);
        assert!(service.should_log(LogLevel::Debug));
    }
}

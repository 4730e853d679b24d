//! Global logging for rhsm_register
//!
//! Events carry a [`Code`] and are routed through a process-wide
//! [`LoggingService`]. Until [`init_global_logging`] runs, events are dropped,
//! so library users that never initialize logging pay nothing.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use config::LoggingPreferences;
pub use events::{LogEvent, LogLevel};
pub use service::{FacadeLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SCOPED_LOGGER: RefCell<Option<Arc<LoggingService>>> = RefCell::new(None);
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from environment preferences
pub fn init_global_logging() -> Result<(), String> {
    init_global_logging_with_preferences(&LoggingPreferences::default())
}

pub fn init_global_logging_with_preferences(
    preferences: &LoggingPreferences,
) -> Result<(), String> {
    let service = Arc::new(LoggingService::with_preferences(preferences));
    init_global_logging_with_service(service.clone())?;

    service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Route events from the current thread to `service` while `f` runs
///
/// Takes precedence over the global logger. The previous scoped logger is
/// restored afterwards, also when `f` panics.
pub fn with_scoped_logger<F, R>(service: Arc<LoggingService>, f: F) -> R
where
    F: FnOnce() -> R,
{
    struct Restore(Option<Arc<LoggingService>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            SCOPED_LOGGER.with(|slot| *slot.borrow_mut() = previous);
        }
    }

    let previous = SCOPED_LOGGER.with(|slot| slot.borrow_mut().replace(service));
    let _restore = Restore(previous);
    f()
}

fn current_scoped_logger() -> Option<Arc<LoggingService>> {
    SCOPED_LOGGER.with(|slot| slot.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Attach context pairs and hand the event to the scoped or global logger
pub fn log_with_context(mut event: LogEvent, context: Vec<(&str, String)>) {
    let scoped = current_scoped_logger();
    let Some(logger) = scoped.as_deref().or_else(|| try_get_global_logger()) else {
        return;
    };

    for (key, value) in context {
        event = event.with_context(key, &value);
    }

    logger.log_event(event);
}

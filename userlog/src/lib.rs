//! # userlog
//! Root and user loggers with request context carried per thread.
//!
//! ## Usage
//! ```rust
//! use userlog::{ContextKey, InitGlobal, logger_config};
//!
//! let _guard = logger_config()
//!     .with_user_logger_name("audit")
//!     .init_global()
//!     .expect("logging backend unavailable");
//! let logger = userlog::user_logger().unwrap();
//! logger.root_logger().info("Hi");
//!
//! // start of a request
//! let _context = userlog::context_guard();
//! userlog::put_context(ContextKey::UserId, "foo");
//! userlog::put_context(ContextKey::TraceId, "t1");
//! userlog::set_user_logging_requested(true);
//!
//! // rendered as [<time> audit TRACE UserID=foo TraceID=t1] Hello from user logger
//! logger.user_logger().trace("Hello from user logger");
//! // context is cleared when `_context` goes out of scope
//! ```
//!
//! ## Configuration
//! The user logger name is read from `USERLOG_USER_LOGGER_NAME` and defaults to
//! `userlog::user`. File sinks flush every `USERLOG_FLUSH_INTERVAL_MS` (100 ms).
//!
//! ## Context and threads
//! Context lives in a thread local: it does not follow work handed to another
//! thread, and it outlives a request on pooled threads unless cleared. Prefer
//! [`context_guard`] or [`with_context`] over calling [`clear_context`] by hand.

mod context;

use log::{LevelFilter, Log};
use std::sync::{LazyLock, OnceLock, RwLock};

pub use context::{
    ContextGuard, clear_context, context_guard, current_context, get_context,
    is_user_logging_requested, put_context, set_user_logging_requested, with_context,
};
pub use userlog_core::{
    ConfigBuilder, ContextKey, DEFAULT_USER_LOGGER_NAME, LogBuffer, LogContext, LoggerGuard,
    LoggerHandle, ROOT_LOGGER_NAME, Settings, UserLogError, UserLogger, logger_config,
};
use userlog_core::LogConfig;

/// Global configuration for the logger, accessible across threads.
static GLOBAL_LOG_CONFIG: LazyLock<RwLock<LogConfig>> =
    LazyLock::new(|| RwLock::new(LogConfig::default()));

/// Outcome of installing the backend, shared by every later caller.
static BACKEND: OnceLock<Result<(), String>> = OnceLock::new();

/// Custom logger implementation rendering the thread's context into each record.
struct UserLogBackend;

impl Log for UserLogBackend {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        GLOBAL_LOG_CONFIG
            .read()
            .map(|config| config.enabled(metadata))
            .unwrap_or(false)
    }

    fn log(&self, record: &log::Record) {
        let context = current_context();
        if let Ok(config) = GLOBAL_LOG_CONFIG.read() {
            config.dispatch(record, &context);
        }
    }

    fn flush(&self) {}
}

fn unavailable<E: std::fmt::Display>(err: E) -> UserLogError {
    UserLogError::BackendUnavailable(err.to_string())
}

fn install_backend() -> Result<(), UserLogError> {
    BACKEND
        .get_or_init(|| {
            log::set_boxed_logger(Box::new(UserLogBackend)).map_err(|e| e.to_string())?;
            let (max_level, user_logger_name) = GLOBAL_LOG_CONFIG
                .read()
                .map(|config| {
                    let name = config.settings().user_logger_name.clone();
                    (config.max_level(), name)
                })
                .map_err(|e| e.to_string())?;
            log::set_max_level(max_level);
            // the default configuration is built by now, logging cannot re-enter it
            log::debug!(
                target: ROOT_LOGGER_NAME,
                "user logger resolved to {user_logger_name}"
            );
            Ok(())
        })
        .clone()
        .map_err(UserLogError::BackendUnavailable)
}

/// Installs the backend if needed and resolves the root and user loggers.
///
/// Fails with [`UserLogError::BackendUnavailable`] when another logger
/// already owns the process.
pub fn user_logger() -> Result<UserLogger, UserLogError> {
    install_backend()?;
    let config = GLOBAL_LOG_CONFIG.read().map_err(unavailable)?;
    Ok(config.user_logger())
}

/// Global initialization for [`ConfigBuilder`].
pub trait InitGlobal {
    /// Initialize the logger globally.
    /// Returns a guard that will flush and shutdown the writers when dropped.
    fn init_global(self) -> Result<LoggerGuard, UserLogError>;
}

impl InitGlobal for ConfigBuilder {
    fn init_global(self) -> Result<LoggerGuard, UserLogError> {
        install_backend()?;
        let config = self.build()?;
        let guard = LoggerGuard::new(config.senders());
        let max_level: LevelFilter = config.max_level();
        *GLOBAL_LOG_CONFIG.write().map_err(unavailable)? = config;
        log::set_max_level(max_level);
        Ok(guard)
    }
}

//! # userlog-tokio
//! Root and user loggers with request context scoped to tokio tasks.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! userlog-tokio = "0.1.0"
//! tokio = {version = "1.40.0", features = ["full"]}
//! ```
//!
//! ```rust
//! use userlog_tokio::{ContextKey, LogContext, ScopeGlobal, logger_config, scope_context};
//!
//! #[tokio::main]
//! async fn main() {
//!     logger_config()
//!         .scope_global(async move {
//!             let logger = userlog_tokio::user_logger().unwrap();
//!             let handles: Vec<_> = (0..5).map(|i| {
//!                 let logger = logger.clone();
//!                 let request = LogContext::new()
//!                     .with(ContextKey::UserId, format!("user {i}"))
//!                     .with_generated_trace_id();
//!                 tokio::spawn(scope_context(request, async move {
//!                     logger.user_logger().info("Hello from user logger");
//!                 }))
//!             }).collect();
//!             for h in handles { h.await.unwrap(); }
//!             // logs are automatically flushed when scope_global completes
//!         })
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! Context only exists inside [`scope_context`] (and [`ScopeGlobal::scope_global`]):
//! outside of one, context operations do nothing and reads come back empty.
//! `userlog` and `userlog-tokio` both install a process-wide `log` backend, a
//! process can only use one of them.

mod context;

use log::Log;
use std::{
    future::Future,
    sync::{LazyLock, OnceLock, RwLock},
};

pub use context::{
    clear_context, current_context, get_context, is_user_logging_requested, put_context,
    scope_context, set_user_logging_requested,
};
pub use userlog_core::{
    ConfigBuilder, ContextKey, DEFAULT_USER_LOGGER_NAME, LogBuffer, LogContext, LoggerHandle,
    ROOT_LOGGER_NAME, Settings, UserLogError, UserLogger, logger_config,
};
use userlog_core::LogConfig;

/// Global configuration for the logger, accessible across tasks.
static GLOBAL_LOG_CONFIG: LazyLock<RwLock<LogConfig>> =
    LazyLock::new(|| RwLock::new(LogConfig::default()));

static BACKEND: OnceLock<Result<(), String>> = OnceLock::new();

/// Custom logger implementation rendering the task's context into each record.
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
pub fn user_logger() -> Result<UserLogger, UserLogError> {
    install_backend()?;
    let config = GLOBAL_LOG_CONFIG.read().map_err(unavailable)?;
    Ok(config.user_logger())
}

/// Scoped global initialization for [`ConfigBuilder`].
pub trait ScopeGlobal {
    /// Initialize the logger globally and run the provided future in an empty context.
    /// The writers are shut down, flushing pending lines, when the future completes.
    fn scope_global<F: Future>(
        self,
        f: F,
    ) -> impl Future<Output = Result<F::Output, UserLogError>>;
}

impl ScopeGlobal for ConfigBuilder {
    async fn scope_global<F: Future>(self, f: F) -> Result<F::Output, UserLogError> {
        install_backend()?;
        let config = self.build()?;
        let senders = config.senders();
        let max_level = config.max_level();
        {
            *GLOBAL_LOG_CONFIG.write().map_err(unavailable)? = config;
        }
        log::set_max_level(max_level);
        let result = scope_context(LogContext::new(), f).await;
        // Shutdown all senders to ensure logs are flushed
        for sender in senders {
            sender.shutdown();
        }
        Ok(result)
    }
}

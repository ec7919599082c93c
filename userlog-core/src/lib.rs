//! # userlog-core
//! Core utilities for userlog - context keys, settings, sinks and the logger facade.
//!
//! Backends (`userlog` for threads, `userlog-tokio` for tasks) own the ambient
//! context and install the `log` implementation; everything they share lives here.

mod builder;
mod config;
mod context;
mod error;
mod facade;
mod log_writer;
mod utils;

pub use builder::{ConfigBuilder, LogConfig};
pub use config::{DEFAULT_USER_LOGGER_NAME, ROOT_LOGGER_NAME, Settings, UserLoggerEnv, WriterEnv};
pub use context::{ContextKey, LogContext, USER_LOGGING_REQUESTED};
pub use error::UserLogError;
pub use facade::{LoggerHandle, UserLogger};
pub use log_writer::{LogBuffer, LogFile, LogStdout, LogWriter};
pub use utils::{
    LogEvent, LogMessage, LogSender, LoggerGuard, format_log, spawn_log_thread,
    spawn_log_thread_file,
};

/// Returns a default ConfigBuilder for configuring the loggers.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}

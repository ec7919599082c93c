use std::{fmt::Display, sync::Arc};

use log::Level;

use crate::config::ROOT_LOGGER_NAME;

/// Reference to a named logger. The name is used as the record target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerHandle {
    name: Arc<str>,
}

impl LoggerHandle {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self, level: Level) -> bool {
        log::log_enabled!(target: self.name(), level)
    }

    pub fn log<M: Display>(&self, level: Level, message: M) {
        log::log!(target: self.name(), level, "{message}");
    }

    pub fn error<M: Display>(&self, message: M) {
        self.log(Level::Error, message)
    }

    pub fn warn<M: Display>(&self, message: M) {
        self.log(Level::Warn, message)
    }

    pub fn info<M: Display>(&self, message: M) {
        self.log(Level::Info, message)
    }

    pub fn debug<M: Display>(&self, message: M) {
        self.log(Level::Debug, message)
    }

    pub fn trace<M: Display>(&self, message: M) {
        self.log(Level::Trace, message)
    }
}

/// Holds the root logger and the configuration-named user logger.
///
/// Backends hand these out once installed, see `userlog::user_logger`.
#[derive(Debug, Clone)]
pub struct UserLogger {
    root_logger: LoggerHandle,
    user_logger: LoggerHandle,
}

impl UserLogger {
    pub fn resolve(user_logger_name: &str) -> Self {
        Self {
            root_logger: LoggerHandle::new(ROOT_LOGGER_NAME),
            user_logger: LoggerHandle::new(user_logger_name),
        }
    }

    pub fn root_logger(&self) -> &LoggerHandle {
        &self.root_logger
    }

    pub fn user_logger(&self) -> &LoggerHandle {
        &self.user_logger
    }
}

#[test]
fn test_resolve_handles() {
    let logger = UserLogger::resolve(crate::DEFAULT_USER_LOGGER_NAME);
    assert_eq!(logger.root_logger().name(), ROOT_LOGGER_NAME);
    assert_eq!(logger.user_logger().name(), "userlog::user");
    assert_eq!(UserLogger::resolve("audit").user_logger().name(), "audit");
}

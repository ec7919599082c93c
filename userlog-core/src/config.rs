use std::time::Duration;

use derive_from_env::FromEnv;

use crate::UserLogError;

/// Identity of the root logger, used as the record target for developer logs.
pub const ROOT_LOGGER_NAME: &str = "userlog";

/// User logger name used when `UserLoggerName` is not configured.
pub const DEFAULT_USER_LOGGER_NAME: &str = "userlog::user";

const DEFAULT_FLUSH_INTERVAL_MS: u64 = 100;

/// The `UserLoggerName` variable, read as `USERLOG_USER_LOGGER_NAME`.
#[derive(FromEnv)]
#[from_env(prefix = "USERLOG")]
#[allow(non_snake_case)]
pub struct UserLoggerEnv {
    pub USER_LOGGER_NAME: Option<String>,
}

/// Writer thread tuning, read as `USERLOG_FLUSH_INTERVAL_MS`.
#[derive(FromEnv)]
#[from_env(prefix = "USERLOG")]
#[allow(non_snake_case)]
pub struct WriterEnv {
    #[from_env(default = "100")]
    pub FLUSH_INTERVAL_MS: u64,
}

/// Settings resolved once at startup and handed to the builder and the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub user_logger_name: String,
    pub flush_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(None, DEFAULT_FLUSH_INTERVAL_MS)
    }
}

fn invalid<E: std::fmt::Debug>(err: E) -> UserLogError {
    UserLogError::InvalidConfig(format!("{err:?}"))
}

impl Settings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, UserLogError> {
        let name = UserLoggerEnv::from_env().map_err(invalid)?;
        let writer = WriterEnv::from_env().map_err(invalid)?;
        Ok(Self::resolve(name.USER_LOGGER_NAME, writer.FLUSH_INTERVAL_MS))
    }

    /// Like [`Settings::from_env`], but an unreadable variable only falls back
    /// to its own default.
    pub fn from_env_or_defaults() -> Self {
        let name = UserLoggerEnv::from_env()
            .ok()
            .and_then(|env| env.USER_LOGGER_NAME);
        let flush_interval_ms = WriterEnv::from_env()
            .map(|env| env.FLUSH_INTERVAL_MS)
            .unwrap_or(DEFAULT_FLUSH_INTERVAL_MS);
        Self::resolve(name, flush_interval_ms)
    }

    /// Falls back to [`DEFAULT_USER_LOGGER_NAME`] when no usable name is set.
    pub fn resolve(user_logger_name: Option<String>, flush_interval_ms: u64) -> Self {
        let user_logger_name = match user_logger_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => DEFAULT_USER_LOGGER_NAME.into(),
        };
        Self {
            user_logger_name,
            flush_interval: Duration::from_millis(flush_interval_ms),
        }
    }

    pub fn with_user_logger_name(self, name: &str) -> Self {
        Self {
            user_logger_name: name.into(),
            ..self
        }
    }
}

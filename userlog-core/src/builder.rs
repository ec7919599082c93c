use std::{path::Path, sync::Arc};

use log::{LevelFilter, Metadata, Record};

use crate::{
    LogContext, Settings, UserLogError, UserLogger,
    log_writer::{LogBuffer, LogFile, LogStdout},
    utils::{LogEvent, LogMessage, LogSender, spawn_log_thread, spawn_log_thread_file},
};

/// Sinks and levels of an installed backend.
///
/// Records on the user logger go to the user sinks and the root sinks, every
/// other record goes to the root sinks only.
pub struct LogConfig {
    root_senders: Vec<Arc<LogSender>>,
    user_senders: Vec<Arc<LogSender>>,
    root_level: LevelFilter,
    user_level: LevelFilter,
    settings: Settings,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            root_senders: vec![Arc::new(spawn_log_thread(LogStdout))],
            user_senders: Vec::new(),
            root_level: LevelFilter::Info,
            user_level: LevelFilter::Trace,
            settings: Settings::from_env_or_defaults(),
        }
    }
}

impl LogConfig {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The facade bound to this configuration's user logger name.
    pub fn user_logger(&self) -> UserLogger {
        UserLogger::resolve(&self.settings.user_logger_name)
    }

    pub fn max_level(&self) -> LevelFilter {
        self.root_level.max(self.user_level)
    }

    fn is_user_target(&self, target: &str) -> bool {
        target == self.settings.user_logger_name
    }

    pub fn enabled(&self, metadata: &Metadata) -> bool {
        let level = if self.is_user_target(metadata.target()) {
            self.user_level
        } else {
            self.root_level
        };
        metadata.level() <= level
    }

    /// Renders `record` with `context` and sends it to the matching sinks.
    pub fn dispatch(&self, record: &Record, context: &LogContext) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Arc::new(LogMessage::new(record, context));
        let user_senders = if self.is_user_target(record.target()) {
            self.user_senders.as_slice()
        } else {
            &[]
        };
        for sender in self.root_senders.iter().chain(user_senders) {
            sender.send(LogEvent::Record(message.clone())).ok();
        }
    }

    /// All writer threads owned by this configuration.
    pub fn senders(&self) -> Vec<Arc<LogSender>> {
        self.root_senders
            .iter()
            .chain(&self.user_senders)
            .cloned()
            .collect()
    }
}

/// Builder for configuring the loggers.
pub struct ConfigBuilder {
    log_file: Option<LogFile>,
    user_log_file: Option<LogFile>,
    user_buffer: Option<LogBuffer>,
    no_stdout: bool,
    log_level: LevelFilter,
    user_log_level: LevelFilter,
    user_logger_name: Option<String>,
    settings: Option<Settings>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            log_file: None,
            user_log_file: None,
            user_buffer: None,
            no_stdout: false,
            log_level: LevelFilter::Info,
            user_log_level: LevelFilter::Trace,
            user_logger_name: None,
            settings: None,
        }
    }
}

impl ConfigBuilder {
    /// Resolves the settings and spawns the writer threads.
    pub fn build(self) -> Result<LogConfig, UserLogError> {
        let Self {
            log_file,
            user_log_file,
            user_buffer,
            no_stdout,
            log_level,
            user_log_level,
            user_logger_name,
            settings,
        } = self;
        let mut settings = match settings {
            Some(settings) => settings,
            None => Settings::from_env()?,
        };
        if let Some(name) = user_logger_name {
            settings = settings.with_user_logger_name(&name);
        }
        let mut root_senders = Vec::new();
        if !no_stdout {
            root_senders.push(Arc::new(spawn_log_thread(LogStdout)));
        }
        if let Some(log_file) = log_file {
            root_senders.push(Arc::new(spawn_log_thread_file(
                log_file,
                settings.flush_interval,
            )));
        }
        let mut user_senders = Vec::new();
        if let Some(log_file) = user_log_file {
            user_senders.push(Arc::new(spawn_log_thread_file(
                log_file,
                settings.flush_interval,
            )));
        }
        if let Some(buffer) = user_buffer {
            user_senders.push(Arc::new(spawn_log_thread(buffer)));
        }
        Ok(LogConfig {
            root_senders,
            user_senders,
            root_level: log_level,
            user_level: user_log_level,
            settings,
        })
    }

    /// Sets a log file for every record.
    pub fn with_log_file<P: AsRef<Path>>(self, path: P) -> Result<Self, UserLogError> {
        Ok(Self {
            log_file: Some(LogFile::new(path)?),
            ..self
        })
    }
    /// Sets a log file receiving only the user logger records.
    pub fn with_user_log_file<P: AsRef<Path>>(self, path: P) -> Result<Self, UserLogError> {
        Ok(Self {
            user_log_file: Some(LogFile::new(path)?),
            ..self
        })
    }
    /// Captures the user logger records in memory.
    pub fn with_user_buffer(self, buffer: LogBuffer) -> Self {
        Self {
            user_buffer: Some(buffer),
            ..self
        }
    }
    /// Ignore stdout logging
    pub fn no_stdout(self) -> Self {
        Self {
            no_stdout: true,
            ..self
        }
    }
    /// Dynamically set the stdout flag.
    pub fn with_stdout(self, yes: bool) -> Self {
        Self {
            no_stdout: !yes,
            ..self
        }
    }
    /// Maximum level of the root logger and every other target.
    pub fn with_level(self, level: LevelFilter) -> Self {
        Self {
            log_level: level,
            ..self
        }
    }
    /// Maximum level of the user logger.
    pub fn with_user_level(self, level: LevelFilter) -> Self {
        Self {
            user_log_level: level,
            ..self
        }
    }
    /// Overrides the `UserLoggerName` variable.
    pub fn with_user_logger_name(self, name: &str) -> Self {
        Self {
            user_logger_name: Some(name.into()),
            ..self
        }
    }
    pub fn maybe_with_user_logger_name(self, name: Option<&str>) -> Self {
        Self {
            user_logger_name: name.map(String::from),
            ..self
        }
    }
    /// Uses already resolved settings instead of reading the environment.
    pub fn with_settings(self, settings: Settings) -> Self {
        Self {
            settings: Some(settings),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContextKey;
    use log::Level;

    fn build_with_buffer(buffer: &LogBuffer) -> LogConfig {
        ConfigBuilder::default()
            .no_stdout()
            .with_settings(Settings::default())
            .with_user_logger_name("audit")
            .with_user_buffer(buffer.clone())
            .build()
            .unwrap()
    }

    fn dispatch(config: &LogConfig, target: &str, level: Level, context: &LogContext) {
        config.dispatch(
            &Record::builder()
                .target(target)
                .level(level)
                .args(format_args!("message on {target}"))
                .build(),
            context,
        );
    }

    #[test]
    fn test_user_records_reach_user_sinks_only_when_targeted() {
        let buffer = LogBuffer::new();
        let config = build_with_buffer(&buffer);
        let context = LogContext::new().with(ContextKey::UserId, "foo");
        dispatch(&config, "audit", Level::Trace, &context);
        dispatch(&config, "userlog", Level::Info, &context);
        for sender in config.senders() {
            sender.shutdown();
        }
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" audit TRACE UserID=foo] message on audit"));
    }

    #[test]
    fn test_levels_are_per_logger() {
        let buffer = LogBuffer::new();
        let config = ConfigBuilder::default()
            .no_stdout()
            .with_settings(Settings::default())
            .with_level(LevelFilter::Warn)
            .with_user_level(LevelFilter::Info)
            .with_user_buffer(buffer.clone())
            .build()
            .unwrap();
        let user = Metadata::builder()
            .target("userlog::user")
            .level(Level::Info)
            .build();
        let root = Metadata::builder()
            .target("userlog")
            .level(Level::Info)
            .build();
        assert!(config.enabled(&user));
        assert!(!config.enabled(&root));
        assert_eq!(config.max_level(), LevelFilter::Info);

        dispatch(&config, "userlog::user", Level::Debug, &LogContext::new());
        for sender in config.senders() {
            sender.shutdown();
        }
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_user_records_are_added_to_root_file() {
        let root_path = "/tmp/test_userlog_builder_root.log";
        let user_path = "/tmp/test_userlog_builder_user.log";
        std::fs::remove_file(root_path).ok();
        std::fs::remove_file(user_path).ok();
        let config = ConfigBuilder::default()
            .no_stdout()
            .with_settings(Settings::default())
            .with_log_file(root_path)
            .unwrap()
            .with_user_log_file(user_path)
            .unwrap()
            .build()
            .unwrap();
        dispatch(&config, "userlog::user", Level::Info, &LogContext::new());
        dispatch(&config, "userlog", Level::Info, &LogContext::new());
        drop(config);
        let root = std::fs::read_to_string(root_path).unwrap();
        let user = std::fs::read_to_string(user_path).unwrap();
        assert_eq!(root.lines().count(), 2);
        assert_eq!(user.lines().count(), 1);
        assert!(user.contains("message on userlog::user"));
    }

    #[test]
    fn test_unopenable_log_file_is_an_io_error() {
        std::fs::remove_dir_all("/tmp/userlog_missing_dir").ok();
        let result = ConfigBuilder::default()
            .with_user_log_file("/tmp/userlog_missing_dir/nested/user.log");
        assert!(matches!(result, Err(UserLogError::Io(_))));
    }

    #[test]
    fn test_user_logger_follows_settings() {
        let config = ConfigBuilder::default()
            .no_stdout()
            .with_settings(Settings::default())
            .build()
            .unwrap();
        assert_eq!(config.user_logger().user_logger().name(), "userlog::user");
        assert_eq!(config.user_logger().root_logger().name(), "userlog");
    }
}

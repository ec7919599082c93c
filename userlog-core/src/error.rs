use thiserror::Error;

/// Errors surfaced while setting up the loggers.
///
/// Context operations never fail, so nothing in here is returned once a
/// [`UserLogger`](crate::UserLogger) has been resolved.
#[derive(Debug, Error)]
pub enum UserLogError {
    /// The `log` backend could not be installed, usually because another
    /// logger already owns the process.
    #[error("logging backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("invalid logger configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

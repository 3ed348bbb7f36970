/*!
 * Error types for hygrolog
 */

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, HygroError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FATAL: i32 = 2;

#[derive(Debug)]
pub enum HygroError {
    /// Configuration load or validation error
    Config(String),

    /// I/O error
    Io(io::Error),

    /// Reading store error (open, insert, query)
    Store(rusqlite::Error),

    /// Backup dump error
    BackupDump(String),

    /// Sensor acquisition error
    Sensor(String),

    /// Mail channel error (construction or send)
    Mail(String),

    /// Weekly aggregation error
    Aggregation(String),
}

impl HygroError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_fatal() {
            EXIT_FATAL
        } else {
            EXIT_SUCCESS
        }
    }

    /// Check if this error aborts the run.
    ///
    /// Only init-phase errors are fatal: without configuration or a working
    /// store nothing downstream can run. Everything else is contained at its
    /// stage boundary.
    pub fn is_fatal(&self) -> bool {
        match self {
            HygroError::Config(_) => true,
            HygroError::Io(_) => true,
            HygroError::Store(_) => true,

            // Soft-stage errors: logged, escalated best-effort, never fatal
            HygroError::BackupDump(_) => false,
            HygroError::Sensor(_) => false,
            HygroError::Mail(_) => false,
            HygroError::Aggregation(_) => false,
        }
    }

    /// Get error category for logging and instrumentation
    pub fn category(&self) -> ErrorCategory {
        match self {
            HygroError::Config(_) => ErrorCategory::Configuration,
            HygroError::Io(_) => ErrorCategory::IoError,
            HygroError::Store(_) => ErrorCategory::Storage,
            HygroError::BackupDump(_) => ErrorCategory::Backup,
            HygroError::Sensor(_) => ErrorCategory::Sensor,
            HygroError::Mail(_) => ErrorCategory::Notification,
            HygroError::Aggregation(_) => ErrorCategory::Aggregation,
        }
    }

    /// Full diagnostic description: the error plus its entire cause chain.
    ///
    /// Used for log entries and warning-mail bodies so escalation never
    /// depends on any one error type exposing a message field.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str("\ncaused by: ");
            out.push_str(&err.to_string());
            cause = std::error::Error::source(err);
        }
        out
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration errors
    Configuration,
    /// I/O operation errors
    IoError,
    /// Reading store errors
    Storage,
    /// Backup dump errors
    Backup,
    /// Sensor acquisition errors
    Sensor,
    /// Mail/notification errors
    Notification,
    /// Weekly aggregation errors
    Aggregation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
            ErrorCategory::Storage => write!(f, "storage"),
            ErrorCategory::Backup => write!(f, "backup"),
            ErrorCategory::Sensor => write!(f, "sensor"),
            ErrorCategory::Notification => write!(f, "notification"),
            ErrorCategory::Aggregation => write!(f, "aggregation"),
        }
    }
}

impl fmt::Display for HygroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HygroError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            HygroError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            HygroError::Store(err) => {
                write!(f, "Store error: {}", err)
            }
            HygroError::BackupDump(msg) => {
                write!(f, "Backup dump error: {}", msg)
            }
            HygroError::Sensor(msg) => {
                write!(f, "Sensor error: {}", msg)
            }
            HygroError::Mail(msg) => {
                write!(f, "Mail error: {}", msg)
            }
            HygroError::Aggregation(msg) => {
                write!(f, "Aggregation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for HygroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HygroError::Io(err) => Some(err),
            HygroError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for HygroError {
    fn from(err: io::Error) -> Self {
        HygroError::Io(err)
    }
}

impl From<rusqlite::Error> for HygroError {
    fn from(err: rusqlite::Error) -> Self {
        HygroError::Store(err)
    }
}

impl From<serde_json::Error> for HygroError {
    fn from(err: serde_json::Error) -> Self {
        HygroError::Config(err.to_string())
    }
}

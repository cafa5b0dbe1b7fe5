use crate::domain::{errors::LoggerError, LogLevel, LogRecord};

/// What a request log hands to the backend.
#[derive(Debug, Clone, Copy)]
pub enum LogEntry<'a> {
    /// Plain-text positional line.
    Line(&'a str),
    /// Fixed message label plus the record as a field mapping.
    Structured {
        message: &'a str,
        payload: &'a LogRecord,
    },
}

/// Leveled sink the request logger writes to. Implementations must tolerate
/// concurrent writes from many in-flight requests.
pub trait LogBackend: Send + Sync {
    fn info(&self, entry: LogEntry<'_>) -> Result<(), LoggerError>;
    fn warning(&self, entry: LogEntry<'_>) -> Result<(), LoggerError>;
    fn error(&self, entry: LogEntry<'_>) -> Result<(), LoggerError>;

    fn write(&self, level: LogLevel, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        match level {
            LogLevel::Info => self.info(entry),
            LogLevel::Warning => self.warning(entry),
            LogLevel::Error => self.error(entry),
        }
    }
}

use std::sync::RwLock;

use crate::domain::{
    ports::{LogBackend, LogEntry},
    LogLevel, LoggerError,
};

/// A log write as the memory backend stored it.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedLog {
    pub level: LogLevel,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}

/// Keeps every entry in memory. Useful for tests and for embedding hosts
/// that ship logs themselves.
pub struct MemoryBackend {
    entries: RwLock<Vec<CapturedLog>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<CapturedLog> {
        self.entries
            .read()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, level: LogLevel, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        let captured = match entry {
            LogEntry::Line(line) => CapturedLog {
                level,
                message: line.to_string(),
                payload: None,
            },
            LogEntry::Structured { message, payload } => CapturedLog {
                level,
                message: message.to_string(),
                payload: Some(serde_json::to_value(payload)?),
            },
        };

        self.entries
            .write()
            .map_err(|e| LoggerError::backend(e.to_string()))?
            .push(captured);
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LogBackend for MemoryBackend {
    fn info(&self, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        self.push(LogLevel::Info, entry)
    }

    fn warning(&self, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        self.push(LogLevel::Warning, entry)
    }

    fn error(&self, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        self.push(LogLevel::Error, entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogRecord;

    #[test]
    fn test_write_dispatches_by_level() {
        let backend = MemoryBackend::new();

        backend.write(LogLevel::Warning, LogEntry::Line("a")).unwrap();
        backend.write(LogLevel::Error, LogEntry::Line("b")).unwrap();

        let entries = backend.entries();
        assert_eq!(entries[0].level, LogLevel::Warning);
        assert_eq!(entries[1].level, LogLevel::Error);
        assert_eq!(entries[1].message, "b");
    }

    #[test]
    fn test_structured_entry_keeps_payload() {
        let backend = MemoryBackend::new();
        let record = LogRecord {
            ip: "::1".into(),
            method: "GET".into(),
            input: "{}".into(),
            status_code: 200,
            user_id: None,
            url: "/".into(),
            ms: "1ms".into(),
            code: None,
        };

        backend
            .info(LogEntry::Structured {
                message: "http request",
                payload: &record,
            })
            .unwrap();

        let entries = backend.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "http request");
        assert_eq!(entries[0].payload.as_ref().unwrap()["ip"], "::1");
    }
}

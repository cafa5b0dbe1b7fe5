use crate::domain::{
    ports::{LogBackend, LogEntry},
    LoggerError, UserId,
};

/// Target every request log is emitted under.
pub const HTTP_TARGET: &str = "http";

macro_rules! structured {
    ($level:ident, $payload:ident, $message:ident, $($user:tt)*) => {
        ::tracing::$level!(
            target: HTTP_TARGET,
            ip = %$payload.ip,
            method = %$payload.method,
            input = %$payload.input,
            "statusCode" = $payload.status_code,
            $($user)*
            url = %$payload.url,
            ms = %$payload.ms,
            code = $payload.code.as_deref(),
            "{}",
            $message
        )
    };
}

macro_rules! emit {
    ($level:ident, $entry:expr) => {
        match $entry {
            LogEntry::Line(line) => ::tracing::$level!(target: HTTP_TARGET, "{}", line),
            // userId keeps its JSON type and is left out for anonymous requests.
            LogEntry::Structured { message, payload } => match &payload.user_id {
                Some(UserId::Int(id)) => structured!($level, payload, message, "userId" = *id,),
                Some(UserId::Str(id)) => {
                    structured!($level, payload, message, "userId" = id.as_str(),)
                }
                None => structured!($level, payload, message,),
            },
        }
    };
}

/// Writes request logs as `tracing` events; formatting and output are left to
/// the installed subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingBackend;

impl TracingBackend {
    pub fn new() -> Self {
        Self
    }
}

impl LogBackend for TracingBackend {
    fn info(&self, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        emit!(info, entry);
        Ok(())
    }

    fn warning(&self, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        emit!(warn, entry);
        Ok(())
    }

    fn error(&self, entry: LogEntry<'_>) -> Result<(), LoggerError> {
        emit!(error, entry);
        Ok(())
    }
}

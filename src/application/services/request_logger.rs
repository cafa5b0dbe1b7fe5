use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::application::completion::CompletionSignal;
use crate::domain::{
    elapsed_ms, format_duration,
    ports::{AuthAccessor, LogBackend, LogEntry, RequestAccessor},
    LogRecord, Result, UserId,
};
use crate::infrastructure::config::LoggerConfig;

/// Message label of structured request logs.
pub const HTTP_REQUEST_MESSAGE: &str = "http request";

/// Request values captured when the hook is armed.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub url: String,
    pub ip: String,
    pub method: String,
    /// Request input already serialized as JSON.
    pub input: String,
    pub user_id: Option<UserId>,
    pub started_at: Instant,
}

/// Turns a finished exchange into exactly one backend write.
#[derive(Clone)]
pub struct HttpLogWriter {
    backend: Arc<dyn LogBackend>,
    json: bool,
}

impl HttpLogWriter {
    pub fn new(backend: Arc<dyn LogBackend>, config: &LoggerConfig) -> Self {
        Self {
            backend,
            json: config.json,
        }
    }

    /// Emits the log for `snapshot` with the final status. Backend failures
    /// are returned to the caller untouched.
    pub fn log(
        &self,
        snapshot: &RequestSnapshot,
        status_code: u16,
        code: Option<&str>,
    ) -> Result<()> {
        self.log_at(snapshot, status_code, code, Instant::now())
    }

    pub(crate) fn log_at(
        &self,
        snapshot: &RequestSnapshot,
        status_code: u16,
        code: Option<&str>,
        finished_at: Instant,
    ) -> Result<()> {
        let record = LogRecord {
            ip: snapshot.ip.clone(),
            method: snapshot.method.clone(),
            input: snapshot.input.clone(),
            status_code,
            user_id: snapshot.user_id.clone(),
            url: snapshot.url.clone(),
            ms: format_duration(elapsed_ms(snapshot.started_at, finished_at)),
            code: code.filter(|c| !c.is_empty()).map(str::to_string),
        };
        let level = record.level();

        if !self.json {
            let line = record.to_line();
            return self.backend.write(level, LogEntry::Line(&line));
        }

        self.backend.write(
            level,
            LogEntry::Structured {
                message: HTTP_REQUEST_MESSAGE,
                payload: &record,
            },
        )
    }
}

/// Per-request logger: arms on [`hook`](Self::hook) and logs once when the
/// response completes.
pub struct RequestLogger<R, A> {
    request: R,
    completion: CompletionSignal,
    auth: A,
    writer: HttpLogWriter,
}

impl<R, A> RequestLogger<R, A>
where
    R: RequestAccessor,
    A: AuthAccessor,
{
    pub fn new(
        request: R,
        completion: CompletionSignal,
        auth: A,
        backend: Arc<dyn LogBackend>,
        config: &LoggerConfig,
    ) -> Self {
        Self {
            request,
            completion,
            auth,
            writer: HttpLogWriter::new(backend, config),
        }
    }

    /// Captures the request state now and returns the future that logs it
    /// when the completion signal fires.
    ///
    /// The future owns everything it needs, so it can be spawned. It resolves
    /// without logging if the response never completed.
    pub fn hook(self) -> BoxFuture<'static, Result<()>> {
        let snapshot = self.snapshot(Instant::now());
        let writer = self.writer;
        let completion = self.completion;

        async move {
            match completion.wait().await {
                Some(done) => writer.log(&snapshot, done.status_code, done.code()),
                None => {
                    debug!(
                        url = %snapshot.url,
                        "Response never completed, skipping request log"
                    );
                    Ok(())
                }
            }
        }
        .boxed()
    }

    pub fn log(
        &self,
        snapshot: &RequestSnapshot,
        status_code: u16,
        code: Option<&str>,
    ) -> Result<()> {
        self.writer.log(snapshot, status_code, code)
    }

    fn snapshot(&self, started_at: Instant) -> RequestSnapshot {
        let input = self.request.input().unwrap_or_default();

        RequestSnapshot {
            url: self.request.url(),
            ip: self.request.ip(),
            method: self.request.method(),
            input: Value::Object(input).to_string(),
            user_id: self.auth.user_id().filter(|id| !id.is_blank()),
            started_at,
        }
    }
}

//! Response body wrapper that reports when transmission ends.

use axum::body::{Body, Bytes};
use http_body::{Body as HttpBody, Frame, SizeHint};
use std::error::Error as StdError;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::application::CompletionNotifier;

/// Reported when the body is dropped before reaching end of stream.
pub const ABORTED_CODE: &str = "ECONNABORTED";

/// Fires the completion notifier once: on end of stream, on the first body
/// error, or on drop.
pub struct NotifyingBody {
    inner: Body,
    status_code: u16,
    notifier: Option<CompletionNotifier>,
}

impl NotifyingBody {
    pub fn new(inner: Body, status_code: u16, notifier: CompletionNotifier) -> Self {
        Self {
            inner,
            status_code,
            notifier: Some(notifier),
        }
    }

    fn finish(&mut self) {
        if let Some(notifier) = self.notifier.take() {
            notifier.finished(self.status_code);
        }
    }

    fn fail(&mut self, code: &str) {
        if let Some(notifier) = self.notifier.take() {
            notifier.failed(self.status_code, code);
        }
    }
}

impl HttpBody for NotifyingBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let polled = Pin::new(&mut self.inner).poll_frame(cx);

        match &polled {
            Poll::Ready(None) => self.finish(),
            Poll::Ready(Some(Err(err))) => self.fail(error_code(err)),
            Poll::Ready(Some(Ok(_))) if self.inner.is_end_stream() => self.finish(),
            _ => {}
        }

        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for NotifyingBody {
    fn drop(&mut self) {
        if self.inner.is_end_stream() {
            self.finish();
        } else {
            self.fail(ABORTED_CODE);
        }
    }
}

/// Maps a body error to an errno-style code, looking for an I/O cause.
fn error_code(err: &(dyn StdError + 'static)) -> &'static str {
    let mut source = Some(err);
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            return io_code(io_err.kind());
        }
        source = current.source();
    }
    "EIO"
}

fn io_code(kind: io::ErrorKind) -> &'static str {
    match kind {
        io::ErrorKind::ConnectionReset | io::ErrorKind::UnexpectedEof => "ECONNRESET",
        io::ErrorKind::ConnectionAborted => "ECONNABORTED",
        io::ErrorKind::BrokenPipe => "EPIPE",
        io::ErrorKind::TimedOut => "ETIMEDOUT",
        _ => "EIO",
    }
}

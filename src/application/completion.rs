//! One-shot "response finished" notification.
//!
//! The notifier half travels with the response body; the signal half is
//! awaited by the request logger. Delivery happens at most once.

use tokio::sync::oneshot;

/// Abnormal termination reported by the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionError {
    pub code: String,
}

/// Final state of a response once it stopped streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub status_code: u16,
    pub error: Option<CompletionError>,
}

impl Completion {
    pub fn code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

pub fn channel() -> (CompletionNotifier, CompletionSignal) {
    let (tx, rx) = oneshot::channel();
    (CompletionNotifier { tx }, CompletionSignal { rx })
}

#[derive(Debug)]
pub struct CompletionNotifier {
    tx: oneshot::Sender<Completion>,
}

impl CompletionNotifier {
    pub fn finished(self, status_code: u16) {
        self.notify(Completion {
            status_code,
            error: None,
        });
    }

    pub fn failed(self, status_code: u16, code: impl Into<String>) {
        self.notify(Completion {
            status_code,
            error: Some(CompletionError { code: code.into() }),
        });
    }

    fn notify(self, completion: Completion) {
        // Receiver gone: nobody is waiting for this request anymore.
        let _ = self.tx.send(completion);
    }
}

#[derive(Debug)]
pub struct CompletionSignal {
    rx: oneshot::Receiver<Completion>,
}

impl CompletionSignal {
    /// Resolves once the response finished or failed. `None` means the
    /// notifier was dropped without firing, i.e. no response went out.
    pub async fn wait(self) -> Option<Completion> {
        self.rx.await.ok()
    }
}

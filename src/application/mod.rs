//! Application layer - Use cases and orchestration.
//!
//! The request logger depends on domain ports (traits) rather than on the
//! web framework or a concrete log sink.

pub mod completion;
pub mod services;

pub use completion::{Completion, CompletionError, CompletionNotifier, CompletionSignal};
pub use services::{HttpLogWriter, RequestLogger, RequestSnapshot, HTTP_REQUEST_MESSAGE};

mod log_backend;
mod request;

pub use log_backend::{LogBackend, LogEntry};
pub use request::{AuthAccessor, RequestAccessor};

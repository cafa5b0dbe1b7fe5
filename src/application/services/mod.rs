mod request_logger;

pub use request_logger::{HttpLogWriter, RequestLogger, RequestSnapshot, HTTP_REQUEST_MESSAGE};

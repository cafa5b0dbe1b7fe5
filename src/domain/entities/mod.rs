mod duration;
mod log_record;

pub use duration::{elapsed_ms, format_duration};
pub use log_record::{LogLevel, LogRecord, UserId};

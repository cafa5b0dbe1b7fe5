pub mod backend;
pub mod config;

pub use backend::{CapturedLog, MemoryBackend, TracingBackend};
pub use config::{AuthConfig, Config, LoggerConfig, ServerConfig};

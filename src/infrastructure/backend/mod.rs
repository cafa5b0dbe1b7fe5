mod memory;
mod tracing;

pub use self::memory::{CapturedLog, MemoryBackend};
pub use self::tracing::TracingBackend;

//! Logging for Tether: the leveled console logger and diagnostic tracing.

pub mod logger;
pub mod logging;
pub mod mode;
pub mod payload;
pub mod sink;

pub use logger::Logger;
pub use logging::init_logging;
pub use mode::DeployMode;
pub use payload::Payload;
pub use sink::{BufferSink, ConsoleSink, Level, Sink};

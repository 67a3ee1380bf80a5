//! Leveled console logger gated on the deployment mode.
//!
//! In development every level writes `[TAG] message data`. In production
//! info, warn and debug are silent, and error writes `[ERROR] message` with
//! its payload withheld.

use std::fmt;
use std::sync::Arc;

use crate::mode::DeployMode;
use crate::payload::Payload;
use crate::sink::{ConsoleSink, Level, Sink};

/// Stateless leveled logger.
///
/// Cloning shares the sink; the mode is fixed for the lifetime of the value.
#[derive(Clone)]
pub struct Logger {
    mode: DeployMode,
    sink: Arc<dyn Sink>,
}

impl Logger {
    pub fn new(mode: DeployMode, sink: Arc<dyn Sink>) -> Self {
        Self { mode, sink }
    }

    /// Logger writing to stdout and stderr.
    pub fn console(mode: DeployMode) -> Self {
        Self::new(mode, Arc::new(ConsoleSink))
    }

    pub fn mode(&self) -> DeployMode {
        self.mode
    }

    /// Log an informational message. Pass `()` when there is no data.
    pub fn info(&self, message: &str, data: impl Into<Payload>) {
        self.emit(Level::Info, message, data.into());
    }

    pub fn warn(&self, message: &str, data: impl Into<Payload>) {
        self.emit(Level::Warn, message, data.into());
    }

    pub fn debug(&self, message: &str, data: impl Into<Payload>) {
        self.emit(Level::Debug, message, data.into());
    }

    /// Log an error. In production the payload is dropped from the line.
    pub fn error(&self, message: &str, err: impl Into<Payload>) {
        self.emit(Level::Error, message, err.into());
    }

    fn emit(&self, level: Level, message: &str, payload: Payload) {
        if let Some(line) = format_line(self.mode, level, message, &payload) {
            self.sink.write_line(level, &line);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("mode", &self.mode).finish_non_exhaustive()
    }
}

/// Format a line for the given mode, or `None` when the level is suppressed.
pub fn format_line(
    mode: DeployMode,
    level: Level,
    message: &str,
    payload: &Payload,
) -> Option<String> {
    match (mode, level) {
        (DeployMode::Development, _) => {
            Some(format!("{} {} {}", level.tag(), message, payload.render()))
        }
        (DeployMode::Production, Level::Error) => Some(format!("{} {}", level.tag(), message)),
        (DeployMode::Production, _) => None,
    }
}

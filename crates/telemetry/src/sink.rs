//! Output channels for the leveled logger.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warn,
    Debug,
    Error,
}

impl Level {
    /// Bracketed tag that prefixes every line at this level.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Warn => "[WARN]",
            Level::Debug => "[DEBUG]",
            Level::Error => "[ERROR]",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Destination for formatted log lines.
///
/// Implementations must not fail; a line that cannot be written is dropped.
pub trait Sink: Send + Sync {
    fn write_line(&self, level: Level, line: &str);
}

/// Writes info and debug lines to stdout, warn and error lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn write_line(&self, level: Level, line: &str) {
        // Write errors (closed pipe and the like) are ignored.
        let _ = match level {
            Level::Info | Level::Debug => writeln!(io::stdout().lock(), "{}", line),
            Level::Warn | Level::Error => writeln!(io::stderr().lock(), "{}", line),
        };
    }
}

/// Keeps every line in memory, in write order.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.guard().clone()
    }

    /// Remove and return the captured lines.
    pub fn take(&self) -> Vec<(Level, String)> {
        std::mem::take(&mut *self.guard())
    }

    fn guard(&self) -> MutexGuard<'_, Vec<(Level, String)>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Sink for BufferSink {
    fn write_line(&self, level: Level, line: &str) {
        self.guard().push((level, line.to_string()));
    }
}

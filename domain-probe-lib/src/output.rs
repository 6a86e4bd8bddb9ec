//! Output capability used by the inspector.
//!
//! The library never writes to the terminal directly. Everything the user
//! should see goes through a [`Reporter`], tagged with a semantic [`Level`];
//! how a level is rendered (colours, log records, nothing) is up to the
//! implementation.

use crate::progress::ProgressSink;
use std::sync::Mutex;

/// Semantic level of an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Record data, printed as-is
    Plain,
    /// Headings and neutral status
    Info,
    /// Affirmative results
    Success,
    /// Failures and alarming results
    Error,
}

/// Sink for user-visible output.
pub trait Reporter: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    /// Where a spinner may draw while a lookup runs. `None` disables the spinner.
    fn progress_sink(&self) -> Option<ProgressSink> {
        None
    }

    fn plain(&self, message: &str) {
        self.emit(Level::Plain, message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Reporter that keeps every line in memory.
#[derive(Debug, Default)]
pub struct BufferedReporter {
    lines: Mutex<Vec<(Level, String)>>,
}

impl BufferedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines emitted so far, in order.
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Messages emitted at `level`, in order.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// Number of lines containing `needle`, at any level.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.lines()
            .iter()
            .filter(|(_, m)| m.contains(needle))
            .count()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl Reporter for BufferedReporter {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

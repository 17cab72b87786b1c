//! Alert sink: where human-readable alert and state lines go.
//!
//! The default is process standard output. Tests use [`MemorySink`] to capture
//! lines. Diagnostics go through `tracing`, not through the sink.

use std::sync::{Arc, Mutex};

/// Line-oriented textual output.
pub trait AlertSink: Send + Sync {
    /// Write one discrete line (without trailing newline).
    fn emit(&self, line: &str);
}

impl<S> AlertSink for Arc<S>
where
    S: AlertSink + ?Sized,
{
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }
}

/// Writes each line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl AlertSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Shared handle to the default sink.
pub fn stdout() -> Arc<dyn AlertSink> {
    Arc::new(StdoutSink)
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.guard())
    }

    /// Number of captured lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.guard().iter().filter(|l| l.contains(needle)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    // A panic while holding the lock leaves the captured lines usable.
    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AlertSink for MemorySink {
    fn emit(&self, line: &str) {
        self.guard().push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
        assert_eq!(sink.count_containing("sec"), 1);
    }

    #[test]
    fn take_drains() {
        let sink = Arc::new(MemorySink::new());
        let shared: Arc<dyn AlertSink> = sink.clone();
        shared.emit("line");
        assert_eq!(sink.take(), vec!["line"]);
        assert!(sink.is_empty());
    }
}

//! In-memory log storage
//!
//! Pure data structure with no I/O side effects. Useful for embedders that
//! want to show the progress log after the fact, and for tests.

use super::{LogEntry, LogSink};
use std::collections::VecDeque;

/// Bounded in-memory progress log.
///
/// Uses a ring buffer (`VecDeque`); the oldest entries are dropped when
/// capacity is reached.
pub struct LogStore {
    entries: VecDeque<LogEntry>,
    max_entries: usize,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(200)
    }
}

impl LogStore {
    /// Create a new LogStore with the given maximum capacity
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Add a log entry, rotating out old entries if at capacity
    pub fn add(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Messages without timestamps, oldest first
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export all entries as plain text, one per line
    pub fn export_text(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::format_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl LogSink for LogStore {
    fn log(&mut self, message: &str) {
        self.add(LogEntry::new(message));
    }
}

//! Log entry types

/// One recorded progress message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String, // HH:MM:SS.mmm
    pub message: String,
}

impl LogEntry {
    /// Current timestamp as HH:MM:SS.mmm
    #[inline]
    fn now() -> String {
        chrono::Local::now().format("%H:%M:%S%.3f").to_string()
    }

    /// Create an entry stamped with the current local time
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Self::now(),
            message: message.into(),
        }
    }

    /// Format as a single text line
    pub fn format_line(&self) -> String {
        format!("{} {}", self.timestamp, self.message)
    }
}

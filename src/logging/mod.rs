//! Logging for the reader
//!
//! Two layers:
//! - `init_tracing` - process-wide `tracing` subscriber (verbosity gate)
//! - `LogSink` - progress logger injected into the session and protocol code
//!
//! The protocol code calls its sink unconditionally. Whether anything is
//! shown is decided by the sink (or by the tracing filter behind it).

pub mod entry;
pub mod store;

pub use entry::LogEntry;
pub use store::LogStore;

/// Initialize internal tracing for reader progress output
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}

/// Sink for human-readable progress messages
pub trait LogSink {
    /// Log a single message
    fn log(&mut self, message: &str);

    /// Log a list of strings (e.g. a payload dump) as one record
    fn log_lines(&mut self, lines: &[String]) {
        self.log(&format!("[{}]", lines.join(", ")));
    }
}

/// Forwards progress messages to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&mut self, message: &str) {
        tracing::debug!(target: "vbus", "{}", message);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&mut self, _message: &str) {}
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn log(&mut self, message: &str) {
        (**self).log(message)
    }

    fn log_lines(&mut self, lines: &[String]) {
        (**self).log_lines(lines)
    }
}

/// Render bytes as a list of `0x??` strings
pub fn hex_dump(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| format!("0x{:02x}", b)).collect()
}

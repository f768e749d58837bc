//! Event log ring buffer.
//!
//! Keeps the last few human-readable event lines (malformed frames, gestures,
//! page changes) for the diagnostics overlay and the simulator console.
//! Each line carries the tick timestamp it was recorded at.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = EventLog::new();
//! log.push(1_250, "fault clear sent");
//! log.record(1_300, format_args!("page -> {}", page.label()));
//!
//! for entry in log.iter() {
//!     println!("{:>6} {}", entry.at_ms, entry.text);
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

// =============================================================================
// Configuration
// =============================================================================

/// Maximum number of lines kept.
pub const LOG_BUFFER_SIZE: usize = 6;

/// Maximum characters per line; longer text is cut.
pub const LOG_LINE_LENGTH: usize = 48;

// =============================================================================
// Ring Buffer
// =============================================================================

/// One logged line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub at_ms: u64,
    pub text: String<LOG_LINE_LENGTH>,
}

/// Oldest lines are dropped once the buffer is full.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    buffer: Deque<LogEntry, LOG_BUFFER_SIZE>,
    total: u32,
}

impl EventLog {
    pub const fn new() -> Self {
        Self {
            buffer: Deque::new(),
            total: 0,
        }
    }

    /// Push a plain message.
    pub fn push(
        &mut self,
        at_ms: u64,
        msg: &str,
    ) {
        self.record(at_ms, format_args!("{msg}"));
    }

    /// Push a formatted message, truncated to [`LOG_LINE_LENGTH`].
    pub fn record(
        &mut self,
        at_ms: u64,
        args: fmt::Arguments<'_>,
    ) {
        if self.buffer.is_full() {
            self.buffer.pop_front();
        }

        let mut line = Truncating(String::new());
        // Truncation is reported as an error by the writer; keep what fit.
        line.write_fmt(args).ok();

        self.buffer.push_back(LogEntry { at_ms, text: line.0 }).ok();
        self.total = self.total.saturating_add(1);
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> { self.buffer.iter() }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> { self.buffer.back() }

    #[inline]
    pub fn len(&self) -> usize { self.buffer.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.buffer.is_empty() }

    /// Lines ever recorded, including dropped ones.
    #[inline]
    pub const fn total(&self) -> u32 { self.total }
}

/// Writer that keeps characters until the line is full.
struct Truncating(String<LOG_LINE_LENGTH>);

impl Write for Truncating {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            self.0.push(c).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_iter() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.push(10, "first");
        log.push(20, "second");
        assert_eq!(log.len(), 2);

        let texts: std::vec::Vec<&str> = log.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
        assert_eq!(log.latest().map(|e| e.at_ms), Some(20));
    }

    #[test]
    fn test_ring_drops_oldest() {
        let mut log = EventLog::new();
        for i in 0..(LOG_BUFFER_SIZE as u64 + 2) {
            log.record(i, format_args!("event {i}"));
        }
        assert_eq!(log.len(), LOG_BUFFER_SIZE);
        assert_eq!(log.total(), LOG_BUFFER_SIZE as u32 + 2);
        assert_eq!(log.iter().next().map(|e| e.text.as_str()), Some("event 2"));
    }

    #[test]
    fn test_long_lines_truncated() {
        let mut log = EventLog::new();
        let long = "x".repeat(LOG_LINE_LENGTH * 2);
        log.push(0, &long);
        assert_eq!(log.latest().map(|e| e.text.len()), Some(LOG_LINE_LENGTH));
    }

    #[test]
    fn test_formatted_line() {
        let mut log = EventLog::new();
        log.record(5, format_args!("malformed frame 0x{:03X}", 0x3CB));
        assert_eq!(log.latest().map(|e| e.text.as_str()), Some("malformed frame 0x3CB"));
    }
}

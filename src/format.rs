// timberlog: single-sink leveled logging
// format.rs - Entry rendering

use std::fmt;

use chrono::{DateTime, Local};

use crate::level::Severity;

/// Fixed-width local timestamp, e.g. `2025-03-01 09:05:07`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp the way it appears in an entry
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Render one complete entry line, trailing newline included.
///
/// The message is written as-is, with no escaping, so the line is
/// `[<timestamp>] [<LEVEL>] <message>\n`.
pub fn format_entry(at: &DateTime<Local>, level: Severity, args: fmt::Arguments<'_>) -> String {
    format!("[{}] [{}] {}\n", timestamp(at), level, args)
}

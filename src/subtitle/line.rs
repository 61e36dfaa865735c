use serde::{Deserialize, Serialize};

use super::timestamp;

// @module: Normalized subtitle line value

// @struct: One display line built from one or more dialogue records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleLine {
    // @field: Start timestamp as written in the script
    pub start: String,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End timestamp as written in the script
    pub end: String,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Untouched dialogue fragments, in contribution order
    pub raw_subs: Vec<String>,

    // @field: Normalized display text, may span several lines
    pub text: String,
}

impl SubtitleLine {
    /// Create a line from script timestamps, decoding both times
    pub fn from_record(start: &str, end: &str, raw: String, text: String) -> Self {
        SubtitleLine {
            start: start.to_string(),
            start_ms: timestamp::parse_or_zero(start),
            end: end.to_string(),
            end_ms: timestamp::parse_or_zero(end),
            raw_subs: vec![raw],
            text,
        }
    }

    /// Create a line from millisecond times, used by tests and tooling
    pub fn from_millis(start_ms: u64, end_ms: u64, text: &str) -> Self {
        SubtitleLine {
            start: timestamp::format_display(start_ms),
            start_ms,
            end: timestamp::format_display(end_ms),
            end_ms,
            raw_subs: vec![text.to_string()],
            text: text.to_string(),
        }
    }

    /// Midpoint of the display interval in milliseconds
    pub fn midpoint_ms(&self) -> u64 {
        ((self.start_ms as u128 + self.end_ms as u128) / 2) as u64
    }

    /// Midpoint of the display interval in seconds
    pub fn midpoint_secs(&self) -> f64 {
        ((self.start_ms as f64 + self.end_ms as f64) / 2.0) / 1000.0
    }
}

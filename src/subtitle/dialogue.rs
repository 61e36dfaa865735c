/*!
 * Dialogue record extraction from ASS scripts.
 *
 * Only `Dialogue` lines of the `[Events]` section carry visible text. Each
 * has nine fixed fields before the free-text payload, which may itself
 * contain commas.
 */

use log::{debug, warn};

use super::line::SubtitleLine;
use super::override_tags::strip_override_tags;
use super::text::TextNormalizer;

/// Marker that starts a dialogue record
pub const DIALOGUE_MARKER: &str = "Dialogue";

/// Number of fields in a dialogue record, payload included
const DIALOGUE_FIELD_COUNT: usize = 10;

const START_FIELD: usize = 1;
const END_FIELD: usize = 2;

// @struct: Extracts normalized lines from script text
#[derive(Debug, Clone, Default)]
pub struct DialogueExtractor {
    normalizer: TextNormalizer,
}

impl DialogueExtractor {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self { normalizer }
    }

    /// Extract all non-empty dialogue lines, sorted by start time.
    ///
    /// Records with too few fields are skipped. Ties in start time keep
    /// their script order.
    pub fn extract(&self, script: &str) -> Vec<SubtitleLine> {
        let mut lines: Vec<SubtitleLine> = script
            .lines()
            .filter(|line| line.starts_with(DIALOGUE_MARKER))
            .enumerate()
            .filter_map(|(index, record)| self.parse_record(index, record))
            .collect();

        lines.sort_by_key(|line| line.start_ms);
        lines
    }

    // @parses: One dialogue record
    // @returns: None for malformed or empty records
    fn parse_record(&self, index: usize, record: &str) -> Option<SubtitleLine> {
        let fields: Vec<&str> = record.splitn(DIALOGUE_FIELD_COUNT, ',').collect();
        if fields.len() <= END_FIELD {
            warn!("Skipping malformed dialogue record {}: {}", index, record);
            return None;
        }

        let start = fields[START_FIELD];
        let end = fields[END_FIELD];
        let raw = fields[fields.len() - 1].trim();

        let text = self.normalizer.normalize(&clean_payload(raw));
        if text.is_empty() {
            debug!("Dropping empty dialogue record {} at {}", index, start);
            return None;
        }

        let line = SubtitleLine::from_record(start, end, raw.to_string(), text);
        if line.end_ms < line.start_ms {
            warn!(
                "Dialogue record {} ends before it starts ({} -> {})",
                index, line.start, line.end
            );
        }

        Some(line)
    }
}

/// Strip override blocks and expand the ASS escape sequences
pub fn clean_payload(raw: &str) -> String {
    strip_override_tags(raw)
        .trim()
        .replace("\\N", "\n")
        .replace("\\n", "\n")
        .replace("\\h", " ")
}

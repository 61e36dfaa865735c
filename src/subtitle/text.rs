/*!
 * CJK-aware whitespace normalization.
 *
 * Japanese and Chinese subtitle text is typeset without meaningful spaces,
 * so any whitespace in a CJK line is noise from the styling tools. Latin
 * text keeps its spacing but loses repeated whitespace characters.
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Inclusive range of Unicode code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePointRange {
    pub from: u32,
    pub to: u32,
}

impl CodePointRange {
    pub const fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, ch: char) -> bool {
        (self.from..=self.to).contains(&(ch as u32))
    }
}

/// Unicode blocks treated as CJK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CjkRanges(Vec<CodePointRange>);

impl CjkRanges {
    pub fn new(ranges: Vec<CodePointRange>) -> Self {
        Self(ranges)
    }

    pub fn ranges(&self) -> &[CodePointRange] {
        &self.0
    }

    /// Check that every range is ordered and inside the Unicode space
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(anyhow!("At least one CJK range is required"));
        }
        for range in &self.0 {
            if range.from > range.to || range.to > 0x10FFFF {
                return Err(anyhow!(
                    "Invalid CJK range: {:#X}..={:#X}",
                    range.from,
                    range.to
                ));
            }
        }
        Ok(())
    }

    pub fn is_cjk_char(&self, ch: char) -> bool {
        self.0.iter().any(|range| range.contains(ch))
    }

    /// True when the text contains at least one CJK character
    pub fn contains_cjk(&self, text: &str) -> bool {
        text.chars().any(|ch| self.is_cjk_char(ch))
    }
}

impl Default for CjkRanges {
    fn default() -> Self {
        Self(vec![
            // Compatibility ideographs
            CodePointRange::new(0x3300, 0x33FF),
            CodePointRange::new(0xFE30, 0xFE4F),
            CodePointRange::new(0xF900, 0xFAFF),
            CodePointRange::new(0x2F800, 0x2FA1F),
            // Hiragana
            CodePointRange::new(0x3040, 0x309F),
            // Katakana
            CodePointRange::new(0x30A0, 0x30FF),
            // CJK radicals supplement
            CodePointRange::new(0x2E80, 0x2EFF),
            // CJK unified ideographs and extensions A to E
            CodePointRange::new(0x4E00, 0x9FFF),
            CodePointRange::new(0x3400, 0x4DBF),
            CodePointRange::new(0x20000, 0x2A6DF),
            CodePointRange::new(0x2A700, 0x2B73F),
            CodePointRange::new(0x2B740, 0x2B81F),
            CodePointRange::new(0x2B820, 0x2CEAF),
            // Halfwidth and fullwidth forms
            CodePointRange::new(0xFF00, 0xFFEF),
        ])
    }
}

// @struct: Whitespace normalizer driven by a CJK range table
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    ranges: CjkRanges,
}

impl TextNormalizer {
    pub fn new(ranges: CjkRanges) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &CjkRanges {
        &self.ranges
    }

    /// Strip all whitespace from CJK text, collapse repeats otherwise
    pub fn normalize(&self, text: &str) -> String {
        if self.ranges.contains_cjk(text) {
            text.chars().filter(|ch| !ch.is_whitespace()).collect()
        } else {
            collapse_repeated_whitespace(text)
        }
    }
}

/// Drop a whitespace character when it repeats the character before it.
///
/// Different whitespace characters in a row are kept, so `"a\t b"` is left
/// alone while `"a  b"` becomes `"a b"`.
pub fn collapse_repeated_whitespace(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    out.push(first);

    let mut prev = first;
    for ch in chars {
        if !ch.is_whitespace() || ch != prev {
            out.push(ch);
        }
        prev = ch;
    }

    out
}

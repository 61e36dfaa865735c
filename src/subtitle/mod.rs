/*!
 * ASS dialogue parsing and line cleanup.
 *
 * - `timestamp`: `H:MM:SS.ff` codec
 * - `override_tags`: `{...}` block and drawing-mode stripping
 * - `text`: CJK-aware whitespace normalization
 * - `dialogue`: dialogue record extraction
 * - `merge`: adjacency merge and same-start collapse
 */

pub mod dialogue;
pub mod line;
pub mod merge;
pub mod override_tags;
pub mod text;
pub mod timestamp;

pub use dialogue::DialogueExtractor;
pub use line::SubtitleLine;
pub use merge::{collapse_by_start, combine_adjacent};
pub use override_tags::strip_override_tags;
pub use text::{CjkRanges, CodePointRange, TextNormalizer};

/*!
 * Frame-to-line alignment.
 *
 * Pairs each line's midpoint with the first decoded frame at or after it.
 * Both sequences are sorted by time, so one forward pass over the frame
 * stream serves every line: the cursor is never rewound, and each search
 * resumes right after the previously matched frame.
 */

use crate::subtitle::SubtitleLine;

/// Alignment target for one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Midpoint {
    /// Index of the line in the slice the midpoints were built from
    pub line_index: usize,

    /// Midpoint in seconds
    pub secs: f64,

    /// Midpoint in whole milliseconds
    pub ms: u64,
}

/// Outcome of one alignment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentSummary {
    /// Lines that received a frame
    pub matched: usize,

    /// Lines left without a frame
    pub unmatched: usize,

    /// Whether the frame stream ran out before every line was matched
    pub exhausted: bool,
}

/// Build line midpoints sorted ascending (stable for equal midpoints)
pub fn midpoints(lines: &[SubtitleLine]) -> Vec<Midpoint> {
    let mut points: Vec<Midpoint> = lines
        .iter()
        .enumerate()
        .map(|(line_index, line)| Midpoint {
            line_index,
            secs: line.midpoint_secs(),
            ms: line.midpoint_ms(),
        })
        .collect();

    points.sort_by(|a, b| a.secs.total_cmp(&b.secs));
    points
}

/// Walk sorted midpoints and a time-ordered frame stream together.
///
/// `midpoints` must already be sorted ascending. For each midpoint, frames
/// are consumed until one with a timestamp at or after it turns up; that
/// frame goes to `on_match` and is not offered again. When the stream ends
/// first, the remaining midpoints are counted as unmatched and the pass
/// stops. An error from `on_match` stops the pass and is returned.
pub fn align<F, I, E>(
    midpoints: &[Midpoint],
    frames: I,
    mut on_match: impl FnMut(&Midpoint, f64, F) -> Result<(), E>,
) -> Result<AlignmentSummary, E>
where
    I: IntoIterator<Item = (f64, F)>,
{
    let mut cursor = frames.into_iter();
    let mut summary = AlignmentSummary::default();

    for (position, midpoint) in midpoints.iter().enumerate() {
        match cursor.by_ref().find(|(time, _)| *time >= midpoint.secs) {
            Some((time, frame)) => {
                on_match(midpoint, time, frame)?;
                summary.matched += 1;
            }
            None => {
                summary.unmatched = midpoints.len() - position;
                summary.exhausted = true;
                break;
            }
        }
    }

    Ok(summary)
}

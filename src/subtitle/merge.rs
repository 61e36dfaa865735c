/*!
 * Line merging passes.
 *
 * Fansub scripts often repeat one line over back-to-back intervals (for
 * karaoke or styling effects) and stack several records at the same start
 * time (signs, outlines, shadows). Both passes take a slice and build a new
 * vector; input lines are never modified.
 */

use std::collections::HashSet;

use super::line::SubtitleLine;

/// Merge chains of identical-text lines whose end and start times touch.
///
/// For every unconsumed line, in input order, the chain grows by the first
/// unconsumed line whose `start_ms` equals the chain tail's `end_ms` and
/// whose text equals the tail's text. The merged line spans from the head's
/// start to the largest end found in the chain.
pub fn combine_adjacent(lines: &[SubtitleLine]) -> Vec<SubtitleLine> {
    let mut consumed = vec![false; lines.len()];
    let mut merged = Vec::with_capacity(lines.len());

    for head_index in 0..lines.len() {
        if consumed[head_index] {
            continue;
        }
        consumed[head_index] = true;

        let head = &lines[head_index];
        let chain = collect_chain(lines, head_index, &mut consumed);

        if chain.is_empty() {
            merged.push(head.clone());
        } else {
            let chain: Vec<&SubtitleLine> = chain.iter().map(|&i| &lines[i]).collect();
            merged.push(merge_chain(head, &chain));
        }
    }

    merged
}

// @returns: Indices of the chain following the head, in discovery order
fn collect_chain(lines: &[SubtitleLine], head_index: usize, consumed: &mut [bool]) -> Vec<usize> {
    let mut chain = Vec::new();
    let mut tail = &lines[head_index];

    while let Some(next_index) = (head_index + 1..lines.len()).find(|&i| {
        !consumed[i] && lines[i].start_ms == tail.end_ms && lines[i].text == tail.text
    }) {
        consumed[next_index] = true;
        chain.push(next_index);
        tail = &lines[next_index];
    }

    chain
}

// @creates: Spanning line from a head and its chain
fn merge_chain(head: &SubtitleLine, chain: &[&SubtitleLine]) -> SubtitleLine {
    // First line holding the largest end time
    let mut last = head;
    for (position, &line) in chain.iter().enumerate() {
        if position == 0 || line.end_ms > last.end_ms {
            last = line;
        }
    }

    let mut raw_subs = head.raw_subs.clone();
    raw_subs.extend(chain.iter().flat_map(|line| line.raw_subs.iter().cloned()));

    SubtitleLine {
        start: head.start.clone(),
        start_ms: head.start_ms,
        end: last.end.clone(),
        end_ms: last.end_ms,
        raw_subs,
        text: head.text.clone(),
    }
}

/// Collapse runs of consecutive lines sharing a start time into one line.
///
/// Texts are deduplicated in first-seen order and joined with a line
/// break. Timing comes from the first line of the run. Input is expected
/// to be sorted by `start_ms`; only consecutive lines are grouped.
pub fn collapse_by_start(lines: &[SubtitleLine]) -> Vec<SubtitleLine> {
    lines
        .chunk_by(|a, b| a.start_ms == b.start_ms)
        .map(collapse_run)
        .collect()
}

// @creates: One line from a run of simultaneous lines
fn collapse_run(run: &[SubtitleLine]) -> SubtitleLine {
    let first = &run[0];

    let mut seen = HashSet::new();
    let texts: Vec<&str> = run
        .iter()
        .map(|line| line.text.as_str())
        .filter(|text| seen.insert(*text))
        .collect();

    SubtitleLine {
        start: first.start.clone(),
        start_ms: first.start_ms,
        end: first.end.clone(),
        end_ms: first.end_ms,
        raw_subs: run.iter().flat_map(|line| line.raw_subs.iter().cloned()).collect(),
        text: texts.join("\n"),
    }
}

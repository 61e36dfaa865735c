/*!
 * Timestamp codec for ASS dialogue times.
 *
 * ASS scripts carry times as `H:MM:SS.ff` (centiseconds). Some tools emit a
 * comma separator or a millisecond fraction, both are accepted on input.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Timestamp regex, anchored at the start only
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})[.,](\d{2,3})").unwrap()
});

/// Parse a `H:MM:SS.ff` (or `H:MM:SS,fff`) timestamp to milliseconds.
///
/// Returns `None` when the text does not have that shape or does not fit
/// in `u64` milliseconds. Two fraction digits are centiseconds, three are
/// milliseconds.
pub fn parse(text: &str) -> Option<u64> {
    let caps = TIMESTAMP_REGEX.captures(text)?;

    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    let fraction = &caps[4];
    let fraction_value: u64 = fraction.parse().ok()?;

    // 10^(3 - digits)
    let scale = if fraction.len() == 2 { 10 } else { 1 };

    // Hours are unbounded; a value past u64 milliseconds is not a timestamp
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes * 60_000 + seconds * 1_000 + fraction_value * scale)
}

/// Parse a timestamp, treating anything unparseable as `0`.
pub fn parse_or_zero(text: &str) -> u64 {
    match parse(text) {
        Some(ms) => ms,
        None => {
            log::debug!("Unparseable timestamp '{}', using 0", text);
            0
        }
    }
}

/// Format milliseconds as `H{sep}MM{sep}SS{frac_sep}ff`.
///
/// The fraction is centiseconds; every component is truncated.
pub fn format(ms: u64, major_separator: char, fraction_separator: char) -> String {
    let centis = (ms % 1_000) / 10;
    let seconds = (ms / 1_000) % 60;
    let minutes = (ms / 60_000) % 60;
    let hours = ms / 3_600_000;

    format!(
        "{}{}{:02}{}{:02}{}{:02}",
        hours, major_separator, minutes, major_separator, seconds, fraction_separator, centis
    )
}

/// Format milliseconds in the ASS display form `H:MM:SS.ff`.
pub fn format_display(ms: u64) -> String {
    format(ms, ':', '.')
}

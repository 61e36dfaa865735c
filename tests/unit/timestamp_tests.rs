/*!
 * Tests for the timestamp codec
 */

use subframe::subtitle::timestamp;

#[test]
fn test_parse_withDisplayTimestamps_shouldRoundTrip() {
    for text in ["0:00:00.00", "0:00:01.50", "1:23:45.67", "12:00:00.99"] {
        let ms = timestamp::parse(text).unwrap();
        assert_eq!(timestamp::format_display(ms), text);
    }
}

#[test]
fn test_format_display_withCentisecondAlignedMillis_shouldParseBack() {
    // Walk a spread of values up to 100 hours, including every unit boundary
    let mut ms = 0u64;
    while ms < 360_000_000 {
        assert_eq!(timestamp::parse(&timestamp::format_display(ms)), Some(ms), "ms = {}", ms);
        ms += 9_990;
    }
    for ms in [10, 990, 59_990, 60_000, 3_599_990, 3_600_000, 35_999_990, 36_000_000] {
        assert_eq!(timestamp::parse(&timestamp::format_display(ms)), Some(ms), "ms = {}", ms);
    }
}

#[test]
fn test_parse_withOverflowingHours_shouldReturnNone() {
    assert_eq!(timestamp::parse("99999999999999:00:00.00"), None);
    assert_eq!(timestamp::parse("5124095576031:00:00.00"), None);
    assert_eq!(timestamp::parse("5124095576030:59:59.99"), None);
    assert_eq!(timestamp::parse("5124095576030:00:00.00"), Some(18_446_744_073_708_000_000));
}

#[test]
fn test_parse_withTrailingContent_shouldIgnoreIt() {
    assert_eq!(timestamp::parse("0:00:02.00 extra"), Some(2000));
}

#[test]
fn test_parse_withMissingFraction_shouldReturnNone() {
    assert_eq!(timestamp::parse("0:00:02"), None);
    assert_eq!(timestamp::parse(""), None);
    assert_eq!(timestamp::parse(" 0:00:02.00"), None);
}

#[test]
fn test_parse_or_zero_withInvalidText_shouldReturnZero() {
    assert_eq!(timestamp::parse_or_zero("later"), 0);
    assert_eq!(timestamp::parse_or_zero("0:01:00.00"), 60_000);
}

#[test]
fn test_format_withUnderscoreSeparators_shouldBuildFileSafeName() {
    assert_eq!(timestamp::format(2_000, '_', '_'), "0_00_02_00");
    assert_eq!(timestamp::format(3_723_450, '_', '_'), "1_02_03_45");
}

//! Human-readable formatting helpers.

/// Formats a duration given in seconds for display.
///
/// Sub-millisecond values are shown in microseconds, sub-second values in
/// milliseconds and everything else in seconds.
///
/// # Example
///
/// ```
/// use collectors::format::format_duration;
///
/// assert_eq!(format_duration(2.5), "2.5s");
/// assert_eq!(format_duration(0.012), "12ms");
/// assert_eq!(format_duration(0.000_25), "250μs");
/// ```
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{}μs", round_to(seconds * 1_000_000.0, 0))
    } else if seconds < 1.0 {
        format!("{}ms", round_to(seconds * 1000.0, 2))
    } else {
        format!("{}s", round_to(seconds, 2))
    }
}

/// Rounds to `decimals` places and drops trailing zeros.
fn round_to(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    // "-0" reads badly in a badge
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_microseconds() {
        assert_eq!(format_duration(0.0), "0μs");
        assert_eq!(format_duration(0.000_001), "1μs");
        assert_eq!(format_duration(0.000_999), "999μs");
    }

    #[test]
    fn test_format_milliseconds() {
        assert_eq!(format_duration(0.001), "1ms");
        assert_eq!(format_duration(0.1234), "123.4ms");
        assert_eq!(format_duration(0.123_456), "123.46ms");
        assert_eq!(format_duration(0.5), "500ms");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_duration(1.0), "1s");
        assert_eq!(format_duration(2.5), "2.5s");
        assert_eq!(format_duration(3.14159), "3.14s");
        assert_eq!(format_duration(60.0), "60s");
    }

    #[test]
    fn test_format_negative_duration() {
        assert_eq!(format_duration(-0.000_000_1), "0μs");
        assert_eq!(format_duration(-0.5), "-500000μs");
    }
}

/// Format whole seconds as MM:SS.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Strip everything but ASCII digits from a raw time-limit field.
pub fn sanitize_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse a minutes field after sanitizing. Empty, zero, or unparseable
/// input all mean unlimited.
pub fn parse_minutes(raw: &str) -> Option<u64> {
    match sanitize_digits(raw).parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(mins) => Some(mins),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(9), "00:09");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(600), "10:00");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn test_sanitize_digits() {
        assert_eq!(sanitize_digits("10"), "10");
        assert_eq!(sanitize_digits("1a0"), "10");
        assert_eq!(sanitize_digits("-5"), "5");
        assert_eq!(sanitize_digits(" 2 "), "2");
        assert_eq!(sanitize_digits("abc"), "");
        assert_eq!(sanitize_digits(""), "");
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("5"), Some(5));
        assert_eq!(parse_minutes("10"), Some(10));
        assert_eq!(parse_minutes("1x2"), Some(12));
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("0"), None);
        assert_eq!(parse_minutes("abc"), None);
    }

    #[test]
    fn test_parse_minutes_overflow_is_unlimited() {
        assert_eq!(parse_minutes("99999999999999999999999"), None);
    }
}

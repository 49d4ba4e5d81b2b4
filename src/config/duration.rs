//! Compact duration grammar: `30m`, `2h`, `1d`, or a bare number of minutes.

use thiserror::Error;

/// Duration parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration '{0}' (examples: 30m, 2h, 1d)")]
    Invalid(String),
    #[error("duration must be positive")]
    NotPositive,
}

/// Parse a duration string like "30m", "2h", "1d" or "15" into chrono::Duration.
///
/// Units are `m` (minutes), `h` (hours) and `d` (days); the Cyrillic `м`,
/// `ч` and `д` are accepted too. A bare integer means minutes.
pub fn parse_duration(s: &str) -> Result<chrono::Duration, DurationError> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let (num_str, unit) = match s.chars().last() {
        Some(c @ ('m' | 'h' | 'd' | 'м' | 'ч' | 'д')) => (&s[..s.len() - c.len_utf8()], c),
        _ => (s.as_str(), 'm'),
    };

    let num: i64 = num_str
        .parse()
        .map_err(|_| DurationError::Invalid(s.clone()))?;
    if num <= 0 {
        return Err(DurationError::NotPositive);
    }

    let duration = match unit {
        'd' | 'д' => chrono::Duration::try_days(num),
        'h' | 'ч' => chrono::Duration::try_hours(num),
        _ => chrono::Duration::try_minutes(num),
    };
    duration.ok_or(DurationError::Invalid(s))
}

/// Render a duration the way the grammar spells it, largest exact unit first.
pub fn format_duration(d: chrono::Duration) -> String {
    let seconds = d.num_seconds();
    if seconds <= 0 || seconds % 60 != 0 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    if minutes % (24 * 60) == 0 {
        format!("{}d", minutes / (24 * 60))
    } else if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_units() {
        assert_eq!(parse_duration("30m").unwrap().num_minutes(), 30);
        assert_eq!(parse_duration("2h").unwrap().num_hours(), 2);
        assert_eq!(parse_duration("1d").unwrap().num_days(), 1);
        assert_eq!(parse_duration("2H").unwrap().num_hours(), 2);
    }

    #[test]
    fn bare_number_is_minutes() {
        assert_eq!(parse_duration("15").unwrap().num_minutes(), 15);
    }

    #[test]
    fn cyrillic_units() {
        assert_eq!(parse_duration("30м").unwrap().num_minutes(), 30);
        assert_eq!(parse_duration("2ч").unwrap().num_hours(), 2);
        assert_eq!(parse_duration("1д").unwrap().num_days(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_duration(""), Err(DurationError::Empty));
        assert_eq!(parse_duration("0"), Err(DurationError::NotPositive));
        assert_eq!(parse_duration("-5m"), Err(DurationError::NotPositive));
        assert!(matches!(parse_duration("soon"), Err(DurationError::Invalid(_))));
        assert!(matches!(parse_duration("m"), Err(DurationError::Invalid(_))));
        assert!(matches!(
            parse_duration("99999999999999d"),
            Err(DurationError::Invalid(_))
        ));
    }

    #[test]
    fn format_picks_largest_unit() {
        assert_eq!(format_duration(chrono::Duration::hours(1)), "1h");
        assert_eq!(format_duration(chrono::Duration::days(2)), "2d");
        assert_eq!(format_duration(chrono::Duration::minutes(90)), "90m");
        assert_eq!(format_duration(chrono::Duration::seconds(45)), "45s");
    }
}

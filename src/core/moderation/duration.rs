// Duration parsing for timeout commands ("60s", "5m", "1h").

use super::moderation_models::ModerationError;
use std::time::Duration;

/// Parse a string of digits followed by one unit character (`s`, `m` or `h`)
/// into milliseconds.
///
/// Anything unparsable yields `0`, which callers must treat as an invalid
/// duration, never as a zero-length timeout - use [`parse_timeout`] for the
/// checked form.
pub fn parse_duration_ms(input: &str) -> u64 {
    if input.len() < 2 || !input.is_char_boundary(input.len() - 1) {
        return 0;
    }

    let (digits, unit) = input.split_at(input.len() - 1);
    let Ok(value) = digits.parse::<u64>() else {
        return 0;
    };

    match unit {
        "s" => value * 1_000,
        "m" => value * 60 * 1_000,
        "h" => value * 60 * 60 * 1_000,
        _ => 0,
    }
}

/// Checked variant: maps the `0` sentinel to [`ModerationError::InvalidDuration`].
pub fn parse_timeout(input: &str) -> Result<Duration, ModerationError> {
    match parse_duration_ms(input) {
        0 => Err(ModerationError::InvalidDuration(input.to_string())),
        ms => Ok(Duration::from_millis(ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_supported_units() {
        assert_eq!(parse_duration_ms("60s"), 60_000);
        assert_eq!(parse_duration_ms("5m"), 300_000);
        assert_eq!(parse_duration_ms("1h"), 3_600_000);
    }

    #[test]
    fn rejects_bad_units_and_bad_digits() {
        assert_eq!(parse_duration_ms("10x"), 0);
        assert_eq!(parse_duration_ms("abc"), 0);
        assert_eq!(parse_duration_ms("s"), 0);
        assert_eq!(parse_duration_ms(""), 0);
        assert_eq!(parse_duration_ms("1.5h"), 0);
    }

    #[test]
    fn zero_value_is_treated_as_invalid() {
        // "0s" parses to 0 ms, which is the invalid sentinel by design.
        assert_eq!(parse_duration_ms("0s"), 0);
        assert!(matches!(
            parse_timeout("0s"),
            Err(ModerationError::InvalidDuration(_))
        ));
    }

    #[test]
    fn checked_form_returns_a_duration() {
        assert_eq!(parse_timeout("60s").unwrap(), Duration::from_secs(60));
        assert!(matches!(
            parse_timeout("10x"),
            Err(ModerationError::InvalidDuration(_))
        ));
    }
}

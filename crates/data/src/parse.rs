//! Field parsers shared by the store implementations.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::num::ParseFloatError;

// Slash dates are month-first; day-first only when the leading field cannot be a month
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses a calendar date, discarding any time of day.
///
/// Offset-carrying timestamps keep their local wall-clock date; the offset is
/// dropped rather than converted.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .or_else(|| {
                    OFFSET_FORMATS
                        .iter()
                        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                })
                .map(|ts| ts.naive_local().date())
        })
}

/// Parses an optional real number; blank and `NaN` cells are absent.
///
/// # Errors
/// Returns the float parse error for text that is present but not numeric.
pub fn parse_optional_f64(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    s.parse::<f64>().map(Some)
}

/// Parses a share volume. Integral floats such as `1200.0` are accepted
/// because spreadsheet exports often write counts that way.
#[must_use]
pub fn parse_volume(raw: &str) -> Option<u64> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(v as u64)
    } else {
        None
    }
}

/// Parses a strictly positive close price.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    match parse_optional_f64(raw) {
        Ok(Some(v)) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}

/// Optional free-text cell; blank and `NaN` cells are absent.
#[must_use]
pub fn parse_optional_text(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 00:00:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T15:30:00"), Some(d(2024, 1, 5)));
    }

    #[test]
    fn test_slash_dates_are_month_first() {
        assert_eq!(parse_date("05/01/2024"), Some(d(2024, 5, 1)));
        assert_eq!(parse_date("12/31/2024"), Some(d(2024, 12, 31)));
        // a leading field above 12 can only be a day
        assert_eq!(parse_date("25/01/2024"), Some(d(2024, 1, 25)));
        assert_eq!(parse_date("13/13/2024"), None);
    }

    #[test]
    fn test_parse_date_drops_offset_keeping_local_date() {
        // 01:00 at +07:00 is still the 4th in UTC; the local date wins
        assert_eq!(parse_date("2024-01-05T23:30:00+07:00"), Some(d(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 01:00:00+07:00"), Some(d(2024, 1, 5)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_parse_volume_accepts_integral_floats() {
        assert_eq!(parse_volume("1200"), Some(1200));
        assert_eq!(parse_volume("1200.0"), Some(1200));
        assert_eq!(parse_volume("1200.5"), None);
        assert_eq!(parse_volume("-3"), None);
    }

    #[test]
    fn test_parse_price_requires_positive() {
        assert_eq!(parse_price("10.5"), Some(10.5));
        assert_eq!(parse_price("0"), None);
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn test_optional_fields() {
        assert_eq!(parse_optional_f64(""), Ok(None));
        assert_eq!(parse_optional_f64("NaN"), Ok(None));
        assert_eq!(parse_optional_f64("0.25"), Ok(Some(0.25)));
        assert!(parse_optional_f64("x").is_err());
        assert_eq!(parse_optional_text("  "), None);
        assert_eq!(parse_optional_text(" RSI > 70 "), Some("RSI > 70".to_string()));
    }
}

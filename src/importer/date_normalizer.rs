// ==========================================
// Date normalization
// ==========================================
// A sheet cell may carry a Shamsi date, a Gregorian date, or garbage,
// with `-`, `/` or `.` between the components. The year magnitude
// decides the calendar: > 1400 is Shamsi, 1900..=2100 is Gregorian,
// anything else is retried as Shamsi. Every failure collapses to
// Unparseable; an absent date is not an error anywhere downstream.
// ==========================================

use crate::domain::calendar::shamsi_to_gregorian;
use chrono::NaiveDate;

/// Discriminated parse outcome, so callers and tests can tell an
/// intentionally absent date from a parser defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Parsed(NaiveDate),
    Unparseable,
}

impl ParsedDate {
    pub fn as_option(self) -> Option<NaiveDate> {
        match self {
            ParsedDate::Parsed(d) => Some(d),
            ParsedDate::Unparseable => None,
        }
    }
}

const DELIMITERS: [char; 3] = ['-', '/', '.'];

/// Normalize one raw cell value to a Gregorian date.
pub fn normalize_date(raw: &str) -> ParsedDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return ParsedDate::Unparseable;
    }

    let Some(delimiter) = DELIMITERS.iter().copied().find(|d| raw.contains(*d)) else {
        return ParsedDate::Unparseable;
    };

    let parts: Vec<&str> = raw.split(delimiter).collect();
    if parts.len() != 3 {
        return ParsedDate::Unparseable;
    }

    let (Ok(year), Ok(month), Ok(day)) = (
        parts[0].trim().parse::<i32>(),
        parts[1].trim().parse::<u32>(),
        parts[2].trim().parse::<u32>(),
    ) else {
        return ParsedDate::Unparseable;
    };

    // Component bounds check up front; also yields the Gregorian value
    // for the direct branch.
    let Some(as_gregorian) = NaiveDate::from_ymd_opt(year, month, day) else {
        return ParsedDate::Unparseable;
    };

    if year > 1400 {
        match shamsi_to_gregorian(year, month, day) {
            Some(date) => ParsedDate::Parsed(date),
            None => ParsedDate::Unparseable,
        }
    } else if (1900..=2100).contains(&year) {
        ParsedDate::Parsed(as_gregorian)
    } else {
        // Out-of-band year; Shamsi is the better guess for this data.
        match shamsi_to_gregorian(year, month, day) {
            Some(date) => ParsedDate::Parsed(date),
            None => ParsedDate::Unparseable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(y: i32, m: u32, d: u32) -> ParsedDate {
        ParsedDate::Parsed(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_shamsi_with_each_delimiter() {
        assert_eq!(normalize_date("1404-01-26"), parsed(2025, 4, 15));
        assert_eq!(normalize_date("1404/01/27"), parsed(2025, 4, 16));
        assert_eq!(normalize_date("1404.01.28"), parsed(2025, 4, 17));
    }

    #[test]
    fn test_gregorian_passthrough() {
        assert_eq!(normalize_date("2024-01-15"), parsed(2024, 1, 15));
        assert_eq!(normalize_date("2025/12/31"), parsed(2025, 12, 31));
    }

    #[test]
    fn test_out_of_range_day_is_unparseable() {
        assert_eq!(normalize_date("1404-02-30"), ParsedDate::Unparseable);
        assert_eq!(normalize_date("2024-02-30"), ParsedDate::Unparseable);
        assert_eq!(normalize_date("1404-13-01"), ParsedDate::Unparseable);
    }

    #[test]
    fn test_garbage_is_unparseable() {
        assert_eq!(normalize_date("invalid"), ParsedDate::Unparseable);
        assert_eq!(normalize_date(""), ParsedDate::Unparseable);
        assert_eq!(normalize_date("   "), ParsedDate::Unparseable);
        assert_eq!(normalize_date("1404-01"), ParsedDate::Unparseable);
        assert_eq!(normalize_date("1404-01-26-extra"), ParsedDate::Unparseable);
        assert_eq!(normalize_date("1404-ab-26"), ParsedDate::Unparseable);
    }

    #[test]
    fn test_small_year_falls_back_to_shamsi() {
        // year 1390 is neither > 1400 nor in the Gregorian band
        let result = normalize_date("1390-01-01");
        assert_eq!(result, parsed(2011, 3, 21));
    }

    #[test]
    fn test_as_option() {
        assert_eq!(
            normalize_date("2024-01-15").as_option(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(normalize_date("junk").as_option(), None);
    }
}

// ==========================================
// Shamsi (Jalali) <-> Gregorian conversion
// ==========================================
// Arithmetic variant of the 33-year-cycle algorithm; no astronomical
// computation. Accurate for the range this system cares about
// (roughly Gregorian 1900..2100 / Shamsi 1278..1478).
// ==========================================

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Month lengths, non-leap baseline (Esfand = 29; 30 in leap years).
const SHAMSI_MONTH_DAYS: [u32; 12] = [31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];
const GREGORIAN_MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A date in the Shamsi calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShamsiDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ShamsiDate {
    /// Build a Shamsi date, validating month and day-of-month ranges
    /// (33-year-cycle leap rule for Esfand 30).
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 {
            return None;
        }
        let mut max_day = SHAMSI_MONTH_DAYS[(month - 1) as usize];
        if month == 12 && is_shamsi_leap_year(year) {
            max_day = 30;
        }
        if day > max_day {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Formatted as `1404/01/26`.
    pub fn format_slash(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl std::fmt::Display for ShamsiDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Shamsi leap year per the common 33-year cycle.
pub fn is_shamsi_leap_year(year: i32) -> bool {
    (25 * year + 11).rem_euclid(33) < 8
}

/// Convert a Shamsi date to Gregorian.
///
/// Returns `None` for out-of-range month/day components.
pub fn shamsi_to_gregorian(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let shamsi = ShamsiDate::new(year, month, day)?;

    let jy = shamsi.year - 979;
    let mut j_day_no: i64 =
        365 * i64::from(jy) + i64::from(jy / 33) * 8 + i64::from((jy % 33 + 3) / 4);
    for m in 0..(shamsi.month - 1) as usize {
        j_day_no += i64::from(SHAMSI_MONTH_DAYS[m]);
    }
    j_day_no += i64::from(shamsi.day - 1);

    let mut g_day_no = j_day_no + 79;

    let mut gy: i64 = 1600 + 400 * (g_day_no / 146097);
    g_day_no %= 146097;

    let mut leap = true;
    if g_day_no >= 36525 {
        g_day_no -= 1;
        gy += 100 * (g_day_no / 36524);
        g_day_no %= 36524;
        if g_day_no >= 365 {
            g_day_no += 1;
        } else {
            leap = false;
        }
    }

    gy += 4 * (g_day_no / 1461);
    g_day_no %= 1461;
    if g_day_no >= 366 {
        leap = false;
        g_day_no -= 1;
        gy += g_day_no / 365;
        g_day_no %= 365;
    }

    let mut gm = 0usize;
    loop {
        let month_len = i64::from(GREGORIAN_MONTH_DAYS[gm]) + i64::from(gm == 1 && leap);
        if g_day_no < month_len {
            break;
        }
        g_day_no -= month_len;
        gm += 1;
    }

    NaiveDate::from_ymd_opt(gy as i32, gm as u32 + 1, g_day_no as u32 + 1)
}

/// Convert a Gregorian date to Shamsi.
pub fn gregorian_to_shamsi(date: NaiveDate) -> ShamsiDate {
    let gy = i64::from(date.year()) - 1600;
    let gm = (date.month() - 1) as usize;
    let gd = i64::from(date.day()) - 1;

    let mut g_day_no: i64 = 365 * gy + (gy + 3) / 4 - (gy + 99) / 100 + (gy + 399) / 400;
    for m in 0..gm {
        g_day_no += i64::from(GREGORIAN_MONTH_DAYS[m]);
    }
    if gm > 1 && is_gregorian_leap_year(date.year()) {
        g_day_no += 1;
    }
    g_day_no += gd;

    let mut j_day_no = g_day_no - 79;

    let j_np = j_day_no / 12053;
    j_day_no %= 12053;

    let mut jy: i64 = 979 + 33 * j_np + 4 * (j_day_no / 1461);
    j_day_no %= 1461;
    if j_day_no >= 366 {
        jy += (j_day_no - 1) / 365;
        j_day_no = (j_day_no - 1) % 365;
    }

    let mut jm = 0usize;
    while jm < 11 && j_day_no >= i64::from(SHAMSI_MONTH_DAYS[jm]) {
        j_day_no -= i64::from(SHAMSI_MONTH_DAYS[jm]);
        jm += 1;
    }

    ShamsiDate {
        year: jy as i32,
        month: jm as u32 + 1,
        day: j_day_no as u32 + 1,
    }
}

fn is_gregorian_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Gregorian date as a `1404/01/26`-style Shamsi string (report columns).
pub fn to_shamsi_string(date: NaiveDate) -> String {
    gregorian_to_shamsi(date).format_slash()
}

/// Gregorian timestamp as `1404/01/26 14:30` (export columns).
pub fn to_shamsi_datetime_string(dt: NaiveDateTime) -> String {
    format!(
        "{} {:02}:{:02}",
        to_shamsi_string(dt.date()),
        dt.hour(),
        dt.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shamsi_to_gregorian_reference_values() {
        // Nowruz boundaries
        assert_eq!(
            shamsi_to_gregorian(1404, 1, 1),
            NaiveDate::from_ymd_opt(2025, 3, 21)
        );
        assert_eq!(
            shamsi_to_gregorian(1403, 1, 1),
            NaiveDate::from_ymd_opt(2024, 3, 20)
        );
        // mid-year reference value
        assert_eq!(
            shamsi_to_gregorian(1404, 1, 26),
            NaiveDate::from_ymd_opt(2025, 4, 15)
        );
    }

    #[test]
    fn test_leap_esfand() {
        // 1403 is a leap year: Esfand has 30 days
        assert!(is_shamsi_leap_year(1403));
        assert!(!is_shamsi_leap_year(1404));
        assert_eq!(
            shamsi_to_gregorian(1403, 12, 30),
            NaiveDate::from_ymd_opt(2025, 3, 20)
        );
        // Esfand 30 of a non-leap year does not exist
        assert_eq!(shamsi_to_gregorian(1404, 12, 30), None);
    }

    #[test]
    fn test_invalid_components() {
        assert_eq!(shamsi_to_gregorian(1404, 13, 1), None);
        assert_eq!(shamsi_to_gregorian(1404, 0, 1), None);
        assert_eq!(shamsi_to_gregorian(1404, 1, 0), None);
        assert_eq!(shamsi_to_gregorian(1404, 7, 31), None); // Mehr has 30 days
    }

    #[test]
    fn test_gregorian_to_shamsi_reference_values() {
        let sh = gregorian_to_shamsi(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
        assert_eq!((sh.year, sh.month, sh.day), (1404, 1, 26));

        let sh = gregorian_to_shamsi(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!((sh.year, sh.month, sh.day), (1403, 1, 1));
    }

    #[test]
    fn test_round_trip_across_year_boundary() {
        // every day of 1403 and 1404 survives a round trip
        for year in [1403, 1404] {
            for month in 1..=12u32 {
                let last = if month <= 6 {
                    31
                } else if month <= 11 {
                    30
                } else if is_shamsi_leap_year(year) {
                    30
                } else {
                    29
                };
                for day in [1, 15, last] {
                    let g = shamsi_to_gregorian(year, month, day).unwrap();
                    let back = gregorian_to_shamsi(g);
                    assert_eq!((back.year, back.month, back.day), (year, month, day));
                }
            }
        }
    }

    #[test]
    fn test_shamsi_formatting() {
        assert_eq!(
            to_shamsi_string(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()),
            "1404/01/26"
        );
    }
}

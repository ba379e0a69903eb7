//! Gregorian to Jalali (Persian solar calendar) conversion

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cumulative day count before each Gregorian month in a common year.
const GREGORIAN_DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

/// Arithmetic conversion over the 33-year cycle; no lookup tables beyond
/// month lengths.
pub fn gregorian_to_jalali(date: NaiveDate) -> JalaliDate {
    let gy = i64::from(date.year());
    let gm = date.month() as usize;
    let gd = i64::from(date.day());

    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
        + gd
        + GREGORIAN_DAYS_BEFORE_MONTH[gm - 1];

    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    // First six months have 31 days, the next five 30, Esfand 29 or 30
    let (month, day) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    JalaliDate {
        year: jy as i32,
        month: month as u32,
        day: day as u32,
    }
}

/// Replace ASCII digits with Persian digits and `,` with the Arabic comma.
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '0'..='9' => char::from_u32(0x06F0 + (c as u32 - '0' as u32)).unwrap_or(c),
            ',' => '،',
            _ => c,
        })
        .collect()
}

/// Both calendar renderings of one instant, minute precision, 24-hour clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarReading {
    pub gregorian: String,
    pub jalali: String,
}

pub fn reading_at(local: NaiveDateTime) -> CalendarReading {
    let gregorian = local.format("%m/%d/%Y, %H:%M").to_string();
    let jalali_date = gregorian_to_jalali(local.date());
    let jalali = to_persian_digits(&format!(
        "{}, {:02}:{:02}",
        jalali_date,
        local.hour(),
        local.minute()
    ));

    CalendarReading { gregorian, jalali }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jalali(y: i32, m: u32, d: u32) -> JalaliDate {
        gregorian_to_jalali(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_nowruz() {
        assert_eq!(jalali(2024, 3, 20), JalaliDate { year: 1403, month: 1, day: 1 });
        assert_eq!(jalali(2025, 3, 21), JalaliDate { year: 1404, month: 1, day: 1 });
        assert_eq!(jalali(2017, 3, 21), JalaliDate { year: 1396, month: 1, day: 1 });
    }

    #[test]
    fn test_leap_year_end() {
        // 1403 is a leap year, so Esfand has 30 days
        assert_eq!(jalali(2025, 3, 20), JalaliDate { year: 1403, month: 12, day: 30 });
        assert_eq!(jalali(2024, 3, 19), JalaliDate { year: 1402, month: 12, day: 29 });
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(jalali(1979, 2, 11), JalaliDate { year: 1357, month: 11, day: 22 });
        assert_eq!(jalali(2000, 1, 1), JalaliDate { year: 1378, month: 10, day: 11 });
        assert_eq!(jalali(2024, 2, 29), JalaliDate { year: 1402, month: 12, day: 10 });
        assert_eq!(jalali(2026, 10, 17).to_string(), "1405/07/25");
    }

    #[test]
    fn test_consecutive_days_advance_by_one() {
        let mut date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let mut prev = gregorian_to_jalali(date);
        for _ in 0..(366 * 6) {
            date = date.succ_opt().unwrap();
            let next = gregorian_to_jalali(date);
            assert!(next > prev, "{} did not advance past {}", next, prev);
            if next.year == prev.year && next.month == prev.month {
                assert_eq!(next.day, prev.day + 1);
            } else {
                assert_eq!(next.day, 1);
            }
            prev = next;
        }
    }

    #[test]
    fn test_reading_format() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(14, 5, 59)
            .unwrap();
        let reading = reading_at(at);
        assert_eq!(reading.gregorian, "10/17/2026, 14:05");
        assert_eq!(reading.jalali, "۱۴۰۵/۰۷/۲۵، ۱۴:۰۵");
    }

    #[test]
    fn test_to_persian_digits() {
        assert_eq!(to_persian_digits("2024, 09"), "۲۰۲۴، ۰۹");
        assert_eq!(to_persian_digits("abc"), "abc");
    }
}

//! Calendar arithmetic shared by the month-based frequencies.

use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the given month of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 28,
    }
}

/// Moves `anchor` forward by `months`, keeping the anchor's day-of-month when the
/// target month has it and falling back to the target month's last day otherwise.
///
/// Always measured from the anchor, so repeated calls with growing offsets never
/// drift: Jan 31 + 1 is Feb 28/29 while Jan 31 + 2 is Mar 31.
pub fn add_months_clamped(anchor: NaiveDate, months: u32) -> Option<NaiveDate> {
    let month_index = anchor.year() as i64 * 12 + anchor.month0() as i64 + months as i64;
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = month_index.rem_euclid(12) as u32 + 1;
    let day = anchor.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn add_days(anchor: NaiveDate, days: u64) -> Option<NaiveDate> {
    anchor.checked_add_days(chrono::Days::new(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn february_length_follows_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn clamps_to_last_day_of_short_month() {
        assert_eq!(add_months_clamped(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(add_months_clamped(date(2024, 3, 31), 1), Some(date(2024, 4, 30)));
    }

    #[test]
    fn keeps_anchor_day_when_it_fits() {
        assert_eq!(add_months_clamped(date(2024, 1, 31), 2), Some(date(2024, 3, 31)));
        assert_eq!(add_months_clamped(date(2024, 1, 15), 0), Some(date(2024, 1, 15)));
    }

    #[test]
    fn rolls_over_year_boundaries() {
        assert_eq!(add_months_clamped(date(2024, 11, 30), 3), Some(date(2025, 2, 28)));
        assert_eq!(add_months_clamped(date(2024, 12, 15), 12), Some(date(2025, 12, 15)));
        assert_eq!(add_months_clamped(date(2024, 2, 29), 48), Some(date(2028, 2, 29)));
    }

    #[test]
    fn adds_days_across_months() {
        assert_eq!(add_days(date(2024, 1, 25), 10), Some(date(2024, 2, 4)));
    }
}

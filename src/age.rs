//! age.rs
//!
//! Whole-year age and a human-readable "X years, Y months, Z days" breakdown.
//!
//! Both work on UTC calendar dates only. Chrono does not provide a
//! year/month/day diff, so the borrowing rules for the breakdown are
//! implemented manually:
//!   • month underflow (borrowing from years)
//!   • day underflow (borrowing from the previous month)
//!   • leap years and varying month lengths
//!
//! Leap-day births are not special-cased: the birthday comparison uses the raw
//! (month, day) pair, so someone born on Feb 29 has not aged yet on Feb 28 of a
//! non-leap year and ages on Mar 1.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Completed years between `birth` and `as_of`, never negative.
pub fn age_in_years(birth: NaiveDate, as_of: NaiveDate) -> u32 {
    let mut age = as_of.year() - birth.year();

    if (as_of.month(), as_of.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }

    u32::try_from(age).unwrap_or(0)
}

/// Calendar-aware age broken down into years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBreakdown {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

impl AgeBreakdown {
    /// Breakdown of the time elapsed from `birth` to `today`.
    /// A `today` before `birth` yields all zeros.
    pub fn between(birth: NaiveDate, today: NaiveDate) -> Self {
        if today < birth {
            return Self { years: 0, months: 0, days: 0 };
        }

        let mut years = today.year() - birth.year();
        let mut months = today.month() as i32 - birth.month() as i32;
        let mut days = today.day() as i32 - birth.day() as i32;

        // Fix day underflow
        if days < 0 {
            months -= 1;

            let (prev_year, prev_month) = if today.month() == 1 {
                (today.year() - 1, 12)
            } else {
                (today.year(), today.month() - 1)
            };

            days += days_in_month(prev_year, prev_month) as i32;
        }

        // Fix month underflow
        if months < 0 {
            years -= 1;
            months += 12;
        }

        Self { years, months, days }
    }
}

impl fmt::Display for AgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days)
        )
    }
}

fn plural(n: i32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Returns number of days in a given year/month (handles leap years)
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30, // should never occur but keeps function total
    }
}

/// Leap-year rule (Gregorian):
///   - divisible by 4 → leap year
///   - except divisible by 100 → not leap year
///   - except divisible by 400 → leap year
pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

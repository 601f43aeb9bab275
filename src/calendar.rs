//! calendar.rs
//!
//! UTC-safe calendar primitives used by the bucket generators.
//!
//! Every date handled here is a `NaiveDate` that stands for UTC midnight of
//! that calendar day. The only place a wall-clock instant enters is
//! `start_of_day`, which truncates a `DateTime<Utc>` to its UTC date.
//!
//! The generators talk to the `CalendarPrimitives` trait rather than to chrono
//! directly, so a misbehaving provider can be detected up front and tests can
//! substitute one.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use thiserror::Error;

use crate::age::is_leap_year;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("calendar self-check failed: {0}")]
    SelfCheck(String),
}

pub trait CalendarPrimitives {
    /// UTC calendar date of an instant.
    fn start_of_day(&self, at: DateTime<Utc>) -> NaiveDate;

    /// Monday of the ISO week containing `date`.
    fn start_of_iso_week(&self, date: NaiveDate) -> NaiveDate;

    fn start_of_month(&self, date: NaiveDate) -> NaiveDate;

    /// Adds whole months, clamping to the last day of the target month.
    fn add_months(&self, date: NaiveDate, months: i64) -> Option<NaiveDate>;

    /// Adds a (possibly fractional) number of years.
    ///
    /// The fractional part is carried as whole months: `trunc(years * 12)`.
    fn add_years(&self, date: NaiveDate, years: f64) -> Option<NaiveDate> {
        if !years.is_finite() {
            return None;
        }
        let months = (years * 12.0).trunc();
        if months.abs() > i64::MAX as f64 {
            return None;
        }
        self.add_months(date, months as i64)
    }

    fn iso_week_year(&self, date: NaiveDate) -> i32;

    /// 52 or 53.
    fn iso_weeks_in_year(&self, iso_year: i32) -> u32;

    /// Monday of ISO week `week` of `iso_year`.
    fn iso_week_start(&self, iso_year: i32, week: u32) -> Option<NaiveDate>;

    /// Every Monday-aligned week start from the week containing `start` up to
    /// and including the week containing `end`.
    fn weeks_overlapping(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate>;

    /// Probes a handful of known ISO 8601 facts so a broken provider is caught
    /// before any bucket is produced.
    fn self_check(&self) -> Result<(), CalendarError> {
        let probe = |y, m, d| {
            NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| CalendarError::SelfCheck(format!("invalid probe date {y}-{m}-{d}")))
        };

        if self.iso_weeks_in_year(2020) != 53 || self.iso_weeks_in_year(2021) != 52 {
            return Err(CalendarError::SelfCheck(
                "ISO weeks-in-year disagrees with ISO 8601 for 2020/2021".into(),
            ));
        }

        let sunday = probe(2021, 1, 3)?;
        if self.start_of_iso_week(sunday) != probe(2020, 12, 28)? {
            return Err(CalendarError::SelfCheck(
                "start of ISO week for 2021-01-03 is not 2020-12-28".into(),
            ));
        }
        if self.iso_week_year(sunday) != 2020 {
            return Err(CalendarError::SelfCheck(
                "ISO week-year for 2021-01-03 is not 2020".into(),
            ));
        }

        if self.add_months(probe(2021, 1, 31)?, 1) != Some(probe(2021, 2, 28)?) {
            return Err(CalendarError::SelfCheck(
                "month addition does not clamp to month end".into(),
            ));
        }

        Ok(())
    }
}

/// The production calendar, backed by chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoCalendar;

impl CalendarPrimitives for ChronoCalendar {
    fn start_of_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.date_naive()
    }

    fn start_of_iso_week(&self, date: NaiveDate) -> NaiveDate {
        let back = date.weekday().num_days_from_monday();
        date - Days::new(u64::from(back))
    }

    fn start_of_month(&self, date: NaiveDate) -> NaiveDate {
        date.with_day(1).unwrap_or(date)
    }

    fn add_months(&self, date: NaiveDate, months: i64) -> Option<NaiveDate> {
        let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
        if months >= 0 {
            date.checked_add_months(Months::new(magnitude))
        } else {
            date.checked_sub_months(Months::new(magnitude))
        }
    }

    fn iso_week_year(&self, date: NaiveDate) -> i32 {
        date.iso_week().year()
    }

    fn iso_weeks_in_year(&self, iso_year: i32) -> u32 {
        // Dec 28 always falls in the last ISO week of its year.
        NaiveDate::from_ymd_opt(iso_year, 12, 28)
            .map(|d| d.iso_week().week())
            .unwrap_or(52)
    }

    fn iso_week_start(&self, iso_year: i32, week: u32) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)
    }

    fn weeks_overlapping(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let last = self.start_of_iso_week(end);
        let mut week = self.start_of_iso_week(start);
        let mut weeks = Vec::new();

        while week <= last {
            weeks.push(week);
            match week.checked_add_days(Days::new(7)) {
                Some(next) => week = next,
                None => break,
            }
        }

        weeks
    }
}

/// Whether an ISO week-numbering year has 53 weeks: it starts on a Thursday,
/// or it is a leap year starting on a Wednesday.
pub fn has_long_iso_year(year: i32) -> bool {
    let Some(jan1) = NaiveDate::from_ymd_opt(year, 1, 1) else {
        return false;
    };
    match jan1.weekday() {
        Weekday::Thu => true,
        Weekday::Wed => is_leap_year(year),
        _ => false,
    }
}

/// `YYYY-MM-DD`, the format used in bucket labels.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn start_of_day_truncates_to_utc_date() {
        let at = Utc.with_ymd_and_hms(2025, 11, 10, 23, 59, 59).unwrap();
        assert_eq!(ChronoCalendar.start_of_day(at), d(2025, 11, 10));
    }

    #[test]
    fn start_of_iso_week_is_monday() {
        let cal = ChronoCalendar;
        assert_eq!(cal.start_of_iso_week(d(2025, 11, 10)), d(2025, 11, 10));
        assert_eq!(cal.start_of_iso_week(d(2025, 11, 16)), d(2025, 11, 10));
        assert_eq!(cal.start_of_iso_week(d(2021, 1, 3)), d(2020, 12, 28));
    }

    #[test]
    fn add_years_truncates_fraction_to_months() {
        let cal = ChronoCalendar;
        assert_eq!(cal.add_years(d(2000, 1, 15), 78.5), Some(d(2078, 7, 15)));
        // 0.3 * 12 = 3.6 -> 3 months
        assert_eq!(cal.add_years(d(2000, 1, 15), 1.3), Some(d(2001, 4, 15)));
        assert_eq!(cal.add_years(d(2000, 1, 15), f64::NAN), None);
    }

    #[test]
    fn add_years_clamps_leap_day() {
        let cal = ChronoCalendar;
        assert_eq!(cal.add_years(d(2004, 2, 29), 1.0), Some(d(2005, 2, 28)));
        assert_eq!(cal.add_years(d(2004, 2, 29), 4.0), Some(d(2008, 2, 29)));
    }

    #[test]
    fn iso_weeks_in_year_matches_leap_week_rule() {
        let cal = ChronoCalendar;
        for year in 1990..2060 {
            let expected = if has_long_iso_year(year) { 53 } else { 52 };
            assert_eq!(cal.iso_weeks_in_year(year), expected, "year {year}");
        }
        assert_eq!(cal.iso_weeks_in_year(2015), 53);
        assert_eq!(cal.iso_weeks_in_year(2026), 53);
        assert_eq!(cal.iso_weeks_in_year(2024), 52);
    }

    #[test]
    fn iso_week_start_and_year() {
        let cal = ChronoCalendar;
        assert_eq!(cal.iso_week_start(2020, 53), Some(d(2020, 12, 28)));
        assert_eq!(cal.iso_week_start(2021, 53), None);
        assert_eq!(cal.iso_week_year(d(2024, 12, 30)), 2025);
    }

    #[test]
    fn weeks_overlapping_includes_both_edge_weeks() {
        let weeks = ChronoCalendar.weeks_overlapping(d(2025, 11, 12), d(2025, 11, 24));
        assert_eq!(weeks, vec![d(2025, 11, 10), d(2025, 11, 17), d(2025, 11, 24)]);
    }

    #[test]
    fn chrono_calendar_passes_self_check() {
        assert!(ChronoCalendar.self_check().is_ok());
    }
}

//! years.rs
//!
//! Year view: ten year-of-age buckets per row (one row per decade).
//!
//! Temporal state compares ages rather than dates: a bucket is present when
//! its age equals the current age at `now`.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use super::{Bucket, GridError, Row, Span, TemporalState, starts_label, unit_count};
use crate::age::age_in_years;
use crate::calendar::CalendarPrimitives;
use crate::stage::stage_key;

const YEARS_PER_ROW: u32 = 10;

pub fn generate<C>(
    calendar: &C,
    birth: NaiveDate,
    lifespan_years: f64,
    now: DateTime<Utc>,
) -> Result<Vec<Row>, GridError>
where
    C: CalendarPrimitives + ?Sized,
{
    let span = Span::prepare(calendar, birth, lifespan_years, now)?;
    let current_age = age_in_years(span.birth, span.today);

    let total_years = unit_count(lifespan_years, 1);
    let mut rows = Vec::new();

    for decade in 0..total_years.div_ceil(YEARS_PER_ROW) {
        let mut buckets = Vec::new();

        for column in 0..YEARS_PER_ROW {
            let age = decade * YEARS_PER_ROW + column;
            if age >= total_years {
                break;
            }

            let Some(year_start) = calendar.add_years(span.birth, f64::from(age)) else {
                warn!(age, "year outside the supported date range, skipping");
                continue;
            };
            if year_start > span.end {
                continue;
            }

            let state = match age.cmp(&current_age) {
                std::cmp::Ordering::Less => TemporalState::Past,
                std::cmp::Ordering::Equal => TemporalState::Present,
                std::cmp::Ordering::Greater => TemporalState::Future,
            };
            let mut label = format!("Age {age} {}", starts_label(year_start));
            if state == TemporalState::Present {
                label.push_str(" (Current year)");
            }

            buckets.push(Bucket {
                index: column as usize,
                start: year_start,
                age_at_start: age,
                stage: stage_key(age),
                state,
                label,
            });
        }

        if !buckets.is_empty() {
            rows.push(Row {
                index: rows.len(),
                label: format!("Decade starting Age {}", decade * YEARS_PER_ROW),
                buckets,
            });
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ChronoCalendar;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 12, 0, 0, 0).unwrap()
    }

    #[test]
    fn decades_of_ten_years() {
        let rows = generate(&ChronoCalendar, d(2000, 1, 15), 78.5, now()).unwrap();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].label, "Decade starting Age 0");
        assert_eq!(rows[7].label, "Decade starting Age 70");
        assert_eq!(rows[7].buckets.len(), 9);
        assert_eq!(rows[7].buckets.last().unwrap().age_at_start, 78);
    }

    #[test]
    fn state_follows_current_age() {
        let rows = generate(&ChronoCalendar, d(2000, 1, 15), 78.5, now()).unwrap();
        let decade = &rows[2];
        assert_eq!(decade.buckets[4].state, TemporalState::Past);
        assert_eq!(decade.buckets[5].state, TemporalState::Present);
        assert_eq!(decade.buckets[5].label, "Age 25 (Starts UTC: 2025-01-15) (Current year)");
        assert_eq!(decade.buckets[6].state, TemporalState::Future);
    }

    #[test]
    fn leap_day_birth_year_starts_clamp() {
        let rows = generate(&ChronoCalendar, d(2004, 2, 29), 3.0, now()).unwrap();
        let starts: Vec<_> = rows[0].buckets.iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![d(2004, 2, 29), d(2005, 2, 28), d(2006, 2, 28)]);
    }
}

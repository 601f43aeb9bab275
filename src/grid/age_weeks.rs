//! age_weeks.rs
//!
//! Age-relative week view: one row per year of age, ISO-Monday weeks as buckets.
//!
//! Row `age` covers `[birth + age years, birth + age + 1 years)`. Its weeks
//! are the Monday-aligned week starts overlapping that interval, minus any
//! starting on or after the next birthday. A year can still overlap 54 week
//! starts near its edges; rows are capped at 53.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use super::{Bucket, GridError, Row, Span, TemporalState, starts_label, unit_count};
use crate::calendar::{CalendarPrimitives, format_ymd};
use crate::stage::stage_key;

pub const MAX_WEEKS_PER_ROW: usize = 53;

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
    let current_week = calendar.start_of_iso_week(span.today);

    let mut rows = Vec::new();

    for age in 0..unit_count(lifespan_years, 1) {
        let bounds = (
            calendar.add_years(span.birth, f64::from(age)),
            calendar.add_years(span.birth, f64::from(age) + 1.0),
        );
        let (Some(row_start), Some(row_end)) = bounds else {
            warn!(age, "age row outside the supported date range, skipping row");
            continue;
        };
        if row_start >= row_end {
            warn!(age, "start date not before end date, skipping row");
            continue;
        }

        let weeks = weeks_for_row(calendar, age, row_start, row_end);

        let buckets: Vec<Bucket> = weeks
            .into_iter()
            .filter(|week_start| *week_start <= span.end)
            .enumerate()
            .map(|(index, week_start)| {
                let state = TemporalState::relative_to(week_start, current_week);
                let mut label = format!("Age {age}, Week {} {}", index + 1, starts_label(week_start));
                if state == TemporalState::Present {
                    label.push_str(" (Current week)");
                }
                Bucket {
                    index,
                    start: week_start,
                    age_at_start: age,
                    stage: stage_key(age),
                    state,
                    label,
                }
            })
            .collect();

        if !buckets.is_empty() {
            rows.push(Row {
                index: rows.len(),
                label: format!("Age {age}"),
                buckets,
            });
        }
    }

    Ok(rows)
}

/// Week starts displayed for one age row, before the lifespan cut-off.
fn weeks_for_row<C>(calendar: &C, age: u32, row_start: NaiveDate, row_end: NaiveDate) -> Vec<NaiveDate>
where
    C: CalendarPrimitives + ?Sized,
{
    let mut weeks: Vec<NaiveDate> = calendar
        .weeks_overlapping(row_start, row_end)
        .into_iter()
        .filter(|week_start| *week_start < row_end)
        .collect();

    if weeks.len() > MAX_WEEKS_PER_ROW {
        if let Some(dropped) = weeks.get(MAX_WEEKS_PER_ROW) {
            warn!(
                age,
                weeks = weeks.len(),
                dropped = %format_ymd(*dropped),
                "age row overlaps more than 53 weeks, dropping the tail"
            );
        }
        weeks.truncate(MAX_WEEKS_PER_ROW);
    }

    weeks
}

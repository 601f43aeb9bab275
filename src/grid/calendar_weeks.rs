//! calendar_weeks.rs
//!
//! ISO-calendar week view: one row per ISO week-numbering year.
//!
//! Every row holds exactly `iso_weeks_in_year` buckets. Weeks before the ISO
//! week containing the birth date, or starting after the estimated end date,
//! are kept and tagged out-of-bounds so the first and last years render whole.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use super::{Bucket, GridError, Row, Span, TemporalState, starts_label};
use crate::age::age_in_years;
use crate::calendar::CalendarPrimitives;
use crate::stage::stage_key;

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
    let first_week = calendar.start_of_iso_week(span.birth);

    let start_year = calendar.iso_week_year(span.birth);
    let end_year = calendar.iso_week_year(span.end);

    let mut rows = Vec::new();

    for iso_year in start_year..=end_year {
        let weeks_in_year = calendar.iso_weeks_in_year(iso_year);
        let mut buckets = Vec::with_capacity(weeks_in_year as usize);

        for week in 1..=weeks_in_year {
            let Some(week_start) = calendar.iso_week_start(iso_year, week) else {
                warn!(iso_year, week, "could not compute start of ISO week, skipping");
                continue;
            };

            let age = age_in_years(span.birth, week_start);
            let mut label = format!("Year {iso_year}, Week {week} {}", starts_label(week_start));

            let state = if week_start < first_week || week_start > span.end {
                label.push_str(" (Outside lifespan)");
                TemporalState::OutOfBounds
            } else {
                let state = TemporalState::relative_to(week_start, current_week);
                if state == TemporalState::Present {
                    label.push_str(" (Current week)");
                }
                state
            };

            buckets.push(Bucket {
                index: buckets.len(),
                start: week_start,
                age_at_start: age,
                stage: stage_key(age),
                state,
                label,
            });
        }

        if !buckets.is_empty() {
            rows.push(Row {
                index: rows.len(),
                label: format!("Calendar Year {iso_year}"),
                buckets,
            });
        }
    }

    Ok(rows)
}

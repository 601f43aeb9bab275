//! months.rs
//!
//! Month view: twelve month-buckets per row, starting at the birth month.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use super::{Bucket, GridError, Row, Span, TemporalState, starts_label, unit_count};
use crate::age::age_in_years;
use crate::calendar::CalendarPrimitives;
use crate::stage::stage_key;

const MONTHS_PER_ROW: u32 = 12;

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
    let current_month = calendar.start_of_month(span.today);

    let total_months = unit_count(lifespan_years, MONTHS_PER_ROW);
    let mut rows = Vec::new();

    for year_of_life in 0..total_months.div_ceil(MONTHS_PER_ROW) {
        let mut buckets = Vec::new();

        for column in 0..MONTHS_PER_ROW {
            let month_index = year_of_life * MONTHS_PER_ROW + column;
            if month_index >= total_months {
                break;
            }

            let Some(shifted) = calendar.add_months(span.birth, i64::from(month_index)) else {
                warn!(month_index, "month outside the supported date range, skipping");
                continue;
            };
            let month_start = calendar.start_of_month(shifted);
            if month_start > span.end {
                continue;
            }

            let age = age_in_years(span.birth, month_start);
            let state = TemporalState::relative_to(month_start, current_month);
            let mut label = format!(
                "Age {year_of_life}, Month {} {}",
                column + 1,
                starts_label(month_start)
            );
            if state == TemporalState::Present {
                label.push_str(" (Current month)");
            }

            buckets.push(Bucket {
                index: column as usize,
                start: month_start,
                age_at_start: age,
                stage: stage_key(age),
                state,
                label,
            });
        }

        if !buckets.is_empty() {
            rows.push(Row {
                index: rows.len(),
                label: format!("Age {year_of_life}"),
                buckets,
            });
        }
    }

    Ok(rows)
}

//! mod.rs
//!
//! Bucket generators.
//!
//! Each view partitions the interval from birth to the estimated end of life
//! into rows of buckets. All views share the same preamble: the calendar
//! provider is self-checked, the lifespan is validated, and the estimated end
//! date is `add_years(birth, lifespan)`. Generation is a pure function of
//! `(birth, lifespan, now)`; the caller replaces the whole grid on every call.

pub mod age_weeks;
pub mod calendar_weeks;
pub mod months;
pub mod years;

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{CalendarError, CalendarPrimitives};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("date library unavailable")]
    CalendarUnavailable(#[from] CalendarError),

    #[error("estimated lifespan must be a finite, non-negative number of years (got {0})")]
    InvalidLifespan(f64),

    #[error("estimated end of life falls outside the supported date range")]
    DateOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemporalState {
    Past,
    Present,
    Future,
    OutOfBounds,
}

impl TemporalState {
    /// Past/present/future of a period start relative to the current period start.
    pub fn relative_to(start: NaiveDate, current: NaiveDate) -> Self {
        match start.cmp(&current) {
            std::cmp::Ordering::Less => TemporalState::Past,
            std::cmp::Ordering::Equal => TemporalState::Present,
            std::cmp::Ordering::Greater => TemporalState::Future,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemporalState::Past => "past",
            TemporalState::Present => "present",
            TemporalState::Future => "future",
            TemporalState::OutOfBounds => "out-of-bounds",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// One row per year of age, ISO weeks as buckets.
    #[default]
    AgeWeeks,
    /// One row per ISO week-numbering year, full calendar years shown.
    CalendarWeeks,
    /// One row per year of age, months as buckets.
    Months,
    /// One row per decade of age, years as buckets.
    Years,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::AgeWeeks => "age-weeks",
            ViewMode::CalendarWeeks => "calendar-weeks",
            ViewMode::Months => "months",
            ViewMode::Years => "years",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visual unit of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Column position within the row.
    pub index: usize,
    pub start: NaiveDate,
    pub age_at_start: u32,
    pub stage: &'static str,
    pub state: TemporalState,
    pub label: String,
}

/// One unit of the coarser axis: an age-year, an ISO year, or a decade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub index: usize,
    pub label: String,
    pub buckets: Vec<Bucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub view: ViewMode,
    pub rows: Vec<Row>,
}

impl Grid {
    pub fn bucket_count(&self) -> usize {
        self.rows.iter().map(|row| row.buckets.len()).sum()
    }

    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.rows.iter().flat_map(|row| row.buckets.iter())
    }
}

/// Runs the generator selected by `view`.
pub fn generate<C>(
    view: ViewMode,
    calendar: &C,
    birth: NaiveDate,
    lifespan_years: f64,
    now: DateTime<Utc>,
) -> Result<Grid, GridError>
where
    C: CalendarPrimitives + ?Sized,
{
    let rows = match view {
        ViewMode::AgeWeeks => age_weeks::generate(calendar, birth, lifespan_years, now)?,
        ViewMode::CalendarWeeks => calendar_weeks::generate(calendar, birth, lifespan_years, now)?,
        ViewMode::Months => months::generate(calendar, birth, lifespan_years, now)?,
        ViewMode::Years => years::generate(calendar, birth, lifespan_years, now)?,
    };

    tracing::debug!(
        view = view.as_str(),
        rows = rows.len(),
        buckets = rows.iter().map(|r| r.buckets.len()).sum::<usize>(),
        "generated grid"
    );

    Ok(Grid { view, rows })
}

/// Shared per-call context.
pub(crate) struct Span {
    pub birth: NaiveDate,
    /// Estimated end of life; buckets starting after it are not alive.
    pub end: NaiveDate,
    pub today: NaiveDate,
}

impl Span {
    pub(crate) fn prepare<C>(
        calendar: &C,
        birth: NaiveDate,
        lifespan_years: f64,
        now: DateTime<Utc>,
    ) -> Result<Self, GridError>
    where
        C: CalendarPrimitives + ?Sized,
    {
        calendar.self_check()?;

        if !lifespan_years.is_finite() || lifespan_years < 0.0 {
            return Err(GridError::InvalidLifespan(lifespan_years));
        }

        let end = calendar
            .add_years(birth, lifespan_years)
            .ok_or(GridError::DateOutOfRange)?;

        Ok(Self {
            birth,
            end,
            today: calendar.start_of_day(now),
        })
    }
}

/// `ceil(lifespan * per_year)` as a count of units.
pub(crate) fn unit_count(lifespan_years: f64, per_year: u32) -> u32 {
    let units = (lifespan_years * f64::from(per_year)).ceil();
    if units <= 0.0 {
        0
    } else if units >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        units as u32
    }
}

pub(crate) fn starts_label(date: NaiveDate) -> String {
    format!("(Starts UTC: {})", crate::calendar::format_ymd(date))
}

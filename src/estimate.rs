//! Orchestration: birth date + sex → current age, remaining years, lifespan,
//! and the snapshot the bucket generators regenerate from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::age::{AgeBreakdown, age_in_years};
use crate::calendar::CalendarPrimitives;
use crate::expectancy::ExpectancyTable;
use crate::grid::{self, Grid, GridError, ViewMode};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Please enter a valid birth date in the past (got {0}).")]
    BirthDateNotInPast(NaiveDate),

    #[error(
        "Could not retrieve life expectancy data for the selected sex ({sex}) or age ({age}). Please check the input."
    )]
    ExpectancyNotFound { sex: String, age: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub birth_date: NaiveDate,
    pub sex: String,
    pub current_age: u32,
    pub age_breakdown: AgeBreakdown,
    pub remaining_years: f64,
    /// Current age plus remaining years, rounded to one decimal.
    pub total_lifespan_years: f64,
}

impl Estimate {
    pub fn snapshot(&self) -> CalculationSnapshot {
        CalculationSnapshot {
            birth_date: self.birth_date,
            total_lifespan_years: self.total_lifespan_years,
        }
    }
}

/// The minimal state needed to regenerate any view without recomputing the
/// age or the expectancy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationSnapshot {
    pub birth_date: NaiveDate,
    pub total_lifespan_years: f64,
}

pub fn estimate<C>(
    calendar: &C,
    birth_date: NaiveDate,
    sex: &str,
    table: &ExpectancyTable,
    now: DateTime<Utc>,
) -> Result<Estimate, EstimateError>
where
    C: CalendarPrimitives + ?Sized,
{
    let today = calendar.start_of_day(now);
    if birth_date >= today {
        return Err(EstimateError::BirthDateNotInPast(birth_date));
    }

    let current_age = age_in_years(birth_date, today);
    let remaining_years = table
        .remaining_years(i64::from(current_age), sex)
        .ok_or_else(|| EstimateError::ExpectancyNotFound {
            sex: sex.to_string(),
            age: current_age,
        })?;

    let total_lifespan_years = round_tenth(f64::from(current_age) + remaining_years);

    info!(
        %birth_date,
        sex,
        current_age,
        remaining_years,
        total_lifespan_years,
        "computed life expectancy"
    );

    Ok(Estimate {
        birth_date,
        sex: sex.to_string(),
        current_age,
        age_breakdown: AgeBreakdown::between(birth_date, today),
        remaining_years,
        total_lifespan_years,
    })
}

/// Rebuilds the grid for `view` from a stored snapshot.
pub fn regenerate<C>(
    snapshot: CalculationSnapshot,
    view: ViewMode,
    calendar: &C,
    now: DateTime<Utc>,
) -> Result<Grid, GridError>
where
    C: CalendarPrimitives + ?Sized,
{
    grid::generate(
        view,
        calendar,
        snapshot.birth_date,
        snapshot.total_lifespan_years,
        now,
    )
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

//! Life expectancy estimation and lifetime bucketing.
//!
//! Computes whole-year age from UTC dates, looks up remaining years in a
//! bracketed expectancy table, and partitions the estimated lifespan into
//! rows of week, month or year buckets tagged with a life stage and a
//! past/present/future/out-of-bounds state.

pub mod age;
pub mod calendar;
pub mod cli;
pub mod estimate;
pub mod expectancy;
pub mod grid;
pub mod stage;
pub mod svg;

pub use calendar::{CalendarPrimitives, ChronoCalendar};
pub use estimate::{CalculationSnapshot, Estimate, EstimateError, estimate, regenerate};
pub use expectancy::{ExpectancyTable, Sex};
pub use grid::{Bucket, Grid, GridError, Row, TemporalState, ViewMode};

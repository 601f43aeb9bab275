//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::expectancy::Sex;
use crate::grid::ViewMode;

/// Estimate remaining life expectancy and lay a lifetime out as a grid of
/// weeks, months or years.
#[derive(Debug, Parser)]
#[command(name = "lifegrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Birth date (YYYY-MM-DD, interpreted as a UTC calendar day).
    #[arg(long, env = "LIFEGRID_BIRTH_DATE", value_parser = parse_date)]
    pub birth_date: NaiveDate,

    /// Sex used for the expectancy lookup.
    #[arg(long, env = "LIFEGRID_SEX", value_parser = parse_sex)]
    pub sex: Sex,

    /// Grid layout.
    #[arg(long, env = "LIFEGRID_VIEW", value_enum, default_value_t = ViewMode::AgeWeeks)]
    pub view: ViewMode,

    /// Evaluate as of this UTC date instead of today.
    #[arg(long, value_parser = parse_date)]
    pub now: Option<NaiveDate>,

    /// JSON expectancy table; defaults to the built-in US 2021 period life table.
    #[arg(long, env = "LIFEGRID_TABLE")]
    pub table: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Directory the SVG files are written to.
    #[arg(long, env = "LIFEGRID_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `dark_mode.svg` and `light_mode.svg` in the output directory.
    Svg,
    /// Estimate and grid as JSON on stdout.
    Json,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

fn parse_sex(s: &str) -> Result<Sex, String> {
    s.parse()
}

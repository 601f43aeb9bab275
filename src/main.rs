use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use lifegrid::cli::{Cli, OutputFormat};
use lifegrid::svg::{self, Theme};
use lifegrid::{ChronoCalendar, ExpectancyTable, estimate, regenerate};
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let now: DateTime<Utc> = match cli.now {
        Some(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };

    let table = match &cli.table {
        Some(path) => ExpectancyTable::from_path(path)
            .with_context(|| format!("loading expectancy table {}", path.display()))?,
        None => ExpectancyTable::us_2021(),
    };

    let calendar = ChronoCalendar;

    // Calculate age and expectancy
    let estimate = estimate(&calendar, cli.birth_date, cli.sex.as_str(), &table, now)?;

    // Build the grid for the selected view
    let grid = regenerate(estimate.snapshot(), cli.view, &calendar, now)
        .context("Error generating life grid")?;

    match cli.format {
        OutputFormat::Json => {
            let doc = json!({ "estimate": estimate, "grid": grid });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Svg => {
            tokio::fs::create_dir_all(&cli.output_dir)
                .await
                .with_context(|| format!("creating {}", cli.output_dir.display()))?;

            let dark_path = cli.output_dir.join(Theme::Dark.file_name());
            let light_path = cli.output_dir.join(Theme::Light.file_name());
            let svg_dark = svg::generate_svg(&estimate, &grid, Theme::Dark);
            let svg_light = svg::generate_svg(&estimate, &grid, Theme::Light);

            tokio::try_join!(
                tokio::fs::write(&dark_path, svg_dark),
                tokio::fs::write(&light_path, svg_light),
            )
            .context("writing SVG output")?;

            info!(
                buckets = grid.bucket_count(),
                "Generated {} and {}",
                dark_path.display(),
                light_path.display()
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

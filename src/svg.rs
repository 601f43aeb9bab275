//! svg.rs
//!
//! Renders an estimate and its bucket grid as a standalone SVG document:
//! a dotted key/value summary on top, a life-stage legend, then one square
//! per bucket, rows stacked vertically.

use crate::estimate::Estimate;
use crate::grid::{Grid, TemporalState};
use crate::stage::LIFE_STAGES;

const START_Y: i32 = 30;
const LINE_HEIGHT: i32 = 20;
const LEFT_PADDING: f32 = 15.0;
const RIGHT_PADDING: f32 = 30.0;
const CHAR_WIDTH: f32 = 9.6;
const MIN_SUMMARY_CHARS: usize = 50;

const CELL: f32 = 9.0;
const CELL_GAP: f32 = 2.0;
const ROW_LABEL_CHARS: usize = 24;
const LEGEND_SWATCH: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub cc: &'static str,
    pub present: &'static str,
    pub out_of_bounds: &'static str,
}

impl Theme {
    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                key: "#ffa657",
                value: "#a5d6ff",
                cc: "#616e7f",
                present: "#f85149",
                out_of_bounds: "#30363d",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                key: "#d73a49",
                value: "#0366d6",
                cc: "#6a737d",
                present: "#cf222e",
                out_of_bounds: "#eaeef2",
            },
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Theme::Dark => "dark_mode.svg",
            Theme::Light => "light_mode.svg",
        }
    }
}

/// Fill colour per life-stage key.
fn stage_fill(key: &str) -> &'static str {
    match key {
        "infancy" => "#f9d5e5",
        "toddler" => "#f7b7d2",
        "earlychildhood" => "#f4a261",
        "middlechildhood" => "#e9c46a",
        "adolescence" => "#b5e48c",
        "youngadult" => "#52b69a",
        "adulthood" => "#34a0a4",
        "middleadulthood" => "#1a759f",
        "earlysenior" => "#7b6cf6",
        "midsenior" => "#9d4edd",
        _ => "#6c757d",
    }
}

// Utilities for building SVG content

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn build_stat_row(key: &str, value: &str, align_width: usize) -> (String, String, String) {
    let key_part = format!("{key}: ");
    let base_len = key_part.len() + value.len();
    let available = align_width.saturating_sub(base_len);

    let dots = match available {
        0 => "".to_string(),
        1 => " ".to_string(),
        2 => ". ".to_string(),
        n => ".".repeat(n),
    };

    (key_part, dots, value.to_string())
}

fn build_header_line(label: &str, align_width: usize) -> String {
    let base = format!("{label} ");
    let dash_count = align_width.saturating_sub(base.len()) + 2;
    format!("{base}{}", "-".repeat(dash_count))
}

// Summary block: returns (tspans, width, height)

fn build_summary(estimate: &Estimate, grid: &Grid) -> (String, f32, f32) {
    let rows: Vec<(&str, String)> = vec![
        ("Birth date", estimate.birth_date.format("%Y-%m-%d").to_string()),
        ("Sex", estimate.sex.clone()),
        ("Uptime", estimate.age_breakdown.to_string()),
        ("Current age", format!("{} years", estimate.current_age)),
        (
            "Remaining (avg.)",
            format!("{} years", estimate.remaining_years),
        ),
        (
            "Total lifespan (avg.)",
            format!("{} years", estimate.total_lifespan_years),
        ),
        ("View", grid.view.to_string()),
    ];

    let align_width = rows
        .iter()
        .map(|(k, v)| k.len() + 2 + v.len())
        .max()
        .unwrap_or(0)
        .max(MIN_SUMMARY_CHARS);

    let mut out = String::new();
    let header = build_header_line("lifegrid", align_width);
    out.push_str(&format!(
        r#"<tspan x="{LEFT_PADDING}" y="{START_Y}">{}</tspan>
"#,
        escape_xml(&header)
    ));

    for (i, (key, value)) in rows.iter().enumerate() {
        let y = START_Y + (i as i32 + 1) * LINE_HEIGHT;
        let (k, d, v) = build_stat_row(key, value, align_width);
        out.push_str(&format!(
            r#"<tspan x="{LEFT_PADDING}" y="{y}" class="cc">. </tspan><tspan class="key">{}</tspan><tspan class="cc">{}</tspan><tspan class="value">{}</tspan>
"#,
            escape_xml(&k),
            escape_xml(&d),
            escape_xml(&v)
        ));
    }

    let width = LEFT_PADDING + (align_width as f32 + 2.0) * CHAR_WIDTH + RIGHT_PADDING;
    let height = (rows.len() as i32 + 1) as f32 * LINE_HEIGHT as f32 + START_Y as f32;
    (out, width, height)
}

// Legend: one swatch per life stage, wrapped to `max_width`

fn build_legend(top: f32, max_width: f32) -> (String, f32) {
    let mut out = String::new();
    let mut x = LEFT_PADDING;
    let mut y = top;

    for stage in &LIFE_STAGES {
        let item_width = LEGEND_SWATCH + 6.0 + stage.name.len() as f32 * CHAR_WIDTH * 0.8 + 16.0;
        if x + item_width > max_width && x > LEFT_PADDING {
            x = LEFT_PADDING;
            y += LINE_HEIGHT as f32;
        }
        out.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{LEGEND_SWATCH}" height="{LEGEND_SWATCH}" fill="{}" rx="2"/><text x="{}" y="{}" class="legend">{}</text>
"#,
            stage_fill(stage.key),
            x + LEGEND_SWATCH + 6.0,
            y + LEGEND_SWATCH - 1.0,
            escape_xml(stage.name)
        ));
        x += item_width;
    }

    (out, y + LINE_HEIGHT as f32 - top)
}

// Grid, laid out from y = 0: returns (elements, width, height)

fn build_grid(grid: &Grid, colors: &ThemeColors) -> (String, f32, f32) {
    let label_width = ROW_LABEL_CHARS as f32 * CHAR_WIDTH * 0.7;
    let cells_x = LEFT_PADDING + label_width;
    let pitch = CELL + CELL_GAP;

    let mut out = String::new();
    let mut max_columns = 0usize;

    for (r, row) in grid.rows.iter().enumerate() {
        let y = r as f32 * pitch;
        max_columns = max_columns.max(row.buckets.len());

        out.push_str(&format!(
            r#"<text x="{LEFT_PADDING}" y="{}" class="rowlabel">{}</text>
"#,
            y + CELL - 1.0,
            escape_xml(&row.label)
        ));

        for bucket in &row.buckets {
            let x = cells_x + bucket.index as f32 * pitch;
            let (fill, opacity, stroke) = match bucket.state {
                TemporalState::Past => (stage_fill(bucket.stage), "0.35", ""),
                TemporalState::Present => (
                    stage_fill(bucket.stage),
                    "1",
                    r#" stroke-width="2""#,
                ),
                TemporalState::Future => (stage_fill(bucket.stage), "1", ""),
                TemporalState::OutOfBounds => (colors.out_of_bounds, "1", ""),
            };
            let stroke_color = if stroke.is_empty() {
                String::new()
            } else {
                format!(r#" stroke="{}"{stroke}"#, colors.present)
            };
            out.push_str(&format!(
                r#"<rect class="{} stage-{}" x="{x}" y="{y}" width="{CELL}" height="{CELL}" rx="1.5" fill="{fill}" fill-opacity="{opacity}"{stroke_color}><title>{}</title></rect>
"#,
                bucket.state.as_str(),
                bucket.stage,
                escape_xml(&bucket.label)
            ));
        }
    }

    let width = cells_x + max_columns as f32 * pitch + RIGHT_PADDING;
    let height = grid.rows.len() as f32 * pitch;
    (out, width, height)
}

/// Main SVG generation function
pub fn generate_svg(estimate: &Estimate, grid: &Grid, theme: Theme) -> String {
    let colors = theme.colors();

    let (summary, summary_w, summary_h) = build_summary(estimate, grid);
    let (cells, grid_w, grid_h) = build_grid(grid, &colors);

    let w = summary_w.max(grid_w);
    let (legend, legend_h) = build_legend(summary_h, w - RIGHT_PADDING);
    let grid_top = summary_h + legend_h + LINE_HEIGHT as f32;
    let h = grid_top + grid_h + 30.0;

    format!(
        r#"<?xml version='1.0' encoding='UTF-8'?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{w}px" height="{h}px"
     font-family="ConsolasFallback,Consolas,monospace"
     font-size="16px">

<style>
.key      {{ fill: {key}; }}
.value    {{ fill: {value}; }}
.cc       {{ fill: {cc}; }}
.legend   {{ fill: {text}; font-size: 12px; }}
.rowlabel {{ fill: {cc}; font-size: 9px; }}
</style>

<rect width="{w}px" height="{h}px" fill="{bg}" rx="15"/>

<!-- SUMMARY -->
<text fill="{text}" xml:space="preserve">
{summary}
</text>

<!-- LEGEND -->
{legend}
<!-- GRID -->
<g transform="translate(0 {grid_top})">
{cells}
</g>

</svg>
"#,
        bg = colors.bg,
        text = colors.text,
        key = colors.key,
        value = colors.value,
        cc = colors.cc,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::ChronoCalendar;
    use crate::expectancy::ExpectancyTable;
    use crate::estimate::estimate;
    use crate::grid::{ViewMode, generate};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample(view: ViewMode) -> (Estimate, Grid) {
        let now = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
        let birth = NaiveDate::from_ymd_opt(1992, 6, 14).unwrap();
        let est = estimate(&ChronoCalendar, birth, "male", &ExpectancyTable::us_2021(), now).unwrap();
        let grid = generate(view, &ChronoCalendar, birth, est.total_lifespan_years, now).unwrap();
        (est, grid)
    }

    #[test]
    fn stat_row_pads_with_dots() {
        let (k, d, v) = build_stat_row("Sex", "male", 20);
        assert_eq!(k, "Sex: ");
        assert_eq!(d, ".".repeat(11));
        assert_eq!(v, "male");
    }

    #[test]
    fn stat_row_short_padding() {
        assert_eq!(build_stat_row("Key", "vv", 8).1, " ");
        assert_eq!(build_stat_row("Key", "v", 8).1, ". ");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn one_rect_per_bucket() {
        let (est, grid) = sample(ViewMode::Years);
        let svg = generate_svg(&est, &grid, Theme::Dark);
        assert_eq!(svg.matches("<title>").count(), grid.bucket_count());
        assert!(svg.contains("Decade starting Age 0"));
        assert!(svg.contains("(Current year)"));
        assert!(svg.contains("Uptime"));
    }

    #[test]
    fn themes_use_their_background() {
        let (est, grid) = sample(ViewMode::Months);
        assert!(generate_svg(&est, &grid, Theme::Dark).contains("#161b22"));
        assert!(generate_svg(&est, &grid, Theme::Light).contains("#ffffff"));
    }

    #[test]
    fn calendar_view_marks_out_of_bounds() {
        let (est, grid) = sample(ViewMode::CalendarWeeks);
        let svg = generate_svg(&est, &grid, Theme::Light);
        assert!(svg.contains(r#"class="out-of-bounds"#));
        assert!(svg.contains(r#"class="present"#));
    }
}

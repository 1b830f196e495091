//! Per-tire series grouping and chart rendering
//!
//! Rows are grouped by tire name into one (pressure, coefficient) curve per
//! tire. Rows still missing a pressure or coefficient are skipped, not
//! errors; partially filled rows are normal during data entry.

use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::record::{Field, SheetRow};

/// Group used for rows without a tire name.
pub const UNKNOWN_TIRE: &str = "Unknown tire";

// One color per tire group, cycled.
const SERIES_COLORS: [RGBColor; 7] = [
    RGBColor(70, 130, 180),  // steel blue
    RGBColor(178, 34, 34),   // firebrick
    RGBColor(46, 139, 87),   // sea green
    RGBColor(255, 140, 0),   // dark orange
    RGBColor(128, 0, 128),   // purple
    RGBColor(255, 215, 0),   // gold
    RGBColor(0, 0, 0),       // black
];

/// Errors from grouping or rendering
#[derive(Debug, Error)]
pub enum PlotError {
    /// No row carried both a parseable pressure and coefficient
    #[error("no rows with a parseable pressure and coefficient")]
    NoPlottableData,

    /// The plotting backend failed to produce the image
    #[error("chart could not be rendered: {0}")]
    Render(String),
}

/// One tire's curve, points sorted by ascending pressure
#[derive(Debug, Clone, PartialEq)]
pub struct TireSeries {
    /// Trimmed tire name, or [`UNKNOWN_TIRE`]
    pub tire: String,
    /// (pressure in bar, rolling-resistance coefficient)
    pub points: Vec<(f64, f64)>,
}

/// Group rows into per-tire series.
///
/// Accepts rows from either the workbook or the in-memory store. Pressure
/// and coefficient accept `,` or `.` as decimal separator; rows where either
/// fails to parse are dropped silently. Groups appear in first-seen order,
/// each sorted by ascending pressure.
pub fn group_series(rows: &[SheetRow]) -> Result<Vec<TireSeries>, PlotError> {
    let mut series: Vec<TireSeries> = Vec::new();

    for row in rows {
        let name = row.get(Field::TireName).unwrap_or("").trim();
        let name = if name.is_empty() { UNKNOWN_TIRE } else { name };

        let Some(pressure) = parse_point(row.get(Field::TirePressure)) else {
            continue;
        };
        let Some(coefficient) = parse_point(row.get(Field::RollingCoefficient)) else {
            continue;
        };

        match series.iter_mut().find(|group| group.tire == name) {
            Some(group) => group.points.push((pressure, coefficient)),
            None => series.push(TireSeries {
                tire: name.to_string(),
                points: vec![(pressure, coefficient)],
            }),
        }
    }

    if series.is_empty() {
        return Err(PlotError::NoPlottableData);
    }
    for group in &mut series {
        group.points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    debug!(groups = series.len(), "series grouped");
    Ok(series)
}

fn parse_point(raw: Option<&str>) -> Option<f64> {
    let text = raw?.trim().replace(',', ".");
    if text.is_empty() {
        return None;
    }
    text.parse().ok()
}

/// Render the grouped series to a PNG chart.
pub fn render_chart(series: &[TireSeries], path: &Path) -> Result<(), PlotError> {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for group in series {
        for &(x, y) in &group.points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if x_min > x_max {
        return Err(PlotError::NoPlottableData);
    }
    let x_pad = ((x_max - x_min) * 0.05).max(0.05);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-3);

    let root = BitMapBackend::new(path, (840, 520)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Rolling resistance vs Tire pressure", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((x_min - x_pad)..(x_max + x_pad), (y_min - y_pad)..(y_max + y_pad))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Tire pressure / [bar]")
        .y_desc("Rolling resistance C_rr")
        .draw()
        .map_err(render_err)?;

    for (idx, group) in series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(group.points.iter().copied(), &color))
            .map_err(render_err)?
            .label(&group.tire)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
        chart
            .draw_series(
                group
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )
            .map_err(render_err)?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    debug!(path = %path.display(), groups = series.len(), "chart rendered");
    Ok(())
}

fn render_err(e: impl std::fmt::Display) -> PlotError {
    PlotError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn row(name: &str, pressure: &str, crr: &str) -> SheetRow {
        let mut row = SheetRow::default();
        row.insert(Field::TireName.title(), name);
        row.insert(Field::TirePressure.title(), pressure);
        row.insert(Field::RollingCoefficient.title(), crr);
        row
    }

    #[test]
    fn groups_per_tire_and_sorts_by_pressure() {
        let rows = vec![
            row("A", "2.5", "0.07"),
            row("B", "2.0", "0.09"),
            row("A", "2.0", "0.08"),
        ];
        let series = group_series(&rows).unwrap();
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].tire, "A");
        assert_eq!(series[0].points, vec![(2.0, 0.08), (2.5, 0.07)]);
        assert_eq!(series[1].tire, "B");
        assert_eq!(series[1].points, vec![(2.0, 0.09)]);
    }

    #[test]
    fn blank_names_fall_into_the_unknown_group() {
        let rows = vec![row("  ", "2.0", "0.08"), row("", "2.5", "0.07")];
        let series = group_series(&rows).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].tire, UNKNOWN_TIRE);
        assert_eq!(series[0].points.len(), 2);
    }

    #[test]
    fn incomplete_rows_are_skipped_silently() {
        let rows = vec![
            row("A", "", "0.08"),
            row("A", "2.0", "not a number"),
            row("A", "2.5", "0.07"),
        ];
        let series = group_series(&rows).unwrap();
        assert_eq!(series[0].points, vec![(2.5, 0.07)]);
    }

    #[test]
    fn comma_decimals_parse() {
        let rows = vec![row("A", "2,5", "0,07")];
        let series = group_series(&rows).unwrap();
        assert_eq!(series[0].points, vec![(2.5, 0.07)]);
    }

    #[test]
    fn nothing_plottable_is_an_error() {
        let rows = vec![row("A", "", ""), row("B", "x", "y")];
        assert!(matches!(group_series(&rows), Err(PlotError::NoPlottableData)));
        assert!(matches!(group_series(&[]), Err(PlotError::NoPlottableData)));
    }

    #[test]
    fn chart_renders_to_a_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plot.png");
        let series = group_series(&[row("A", "2.0", "0.08"), row("A", "2.5", "0.07")]).unwrap();

        match render_chart(&series, &path) {
            Ok(()) => {
                let size = std::fs::metadata(&path).unwrap().len();
                assert!(size > 0);
            }
            // headless environments without system fonts cannot rasterise labels
            Err(PlotError::Render(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
}

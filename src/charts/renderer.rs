//! Static Chart Renderer
//! Draws a chart spec to a PNG file with plotters.
//!
//! Layout matches the interactive chart: one horizontal bar per ranked row,
//! the highest value on top, bars colored on the chart's sequential scheme.

use crate::charts::scale::color_for;
use crate::charts::ChartSpec;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Draw(String),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to serialize chart spec: {0}")]
    Json(#[from] serde_json::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `spec` as a PNG at `path`, sized by its width and height.
    pub fn render_png(spec: &ChartSpec, path: &Path) -> Result<(), RenderError> {
        let bars = spec.bars();
        let n = bars.len().max(1);
        let x_max = match spec.value_max() {
            max if max > 0.0 => max,
            _ => 1.0,
        };
        let scheme = spec.scheme().to_string();

        let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 18))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(120)
            .build_cartesian_2d(0f64..x_max, (0..n).into_segmented())
            .map_err(draw_err)?;

        // Segment 0 is at the bottom; the first ranked row goes on top.
        let label_for = |segment: &SegmentValue<usize>| -> String {
            match segment {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) if *i < bars.len() => {
                    bars[bars.len() - 1 - *i].0.clone()
                }
                _ => String::new(),
            }
        };

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(spec.encoding.x.title.as_str())
            .y_desc(spec.encoding.y.title.as_str())
            .y_labels(n)
            .y_label_formatter(&label_for)
            .draw()
            .map_err(draw_err)?;

        let rows = bars.len();
        chart
            .draw_series(bars.iter().enumerate().map(|(rank, (_, value))| {
                let segment = rows - 1 - rank;
                let (r, g, b) = color_for(&scheme, *value, x_max);
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(segment)),
                        (*value, SegmentValue::Exact(segment + 1)),
                    ],
                    RGBColor(r, g, b).filled(),
                );
                bar.set_margin(4, 4, 0, 0);
                bar
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        info!(path = %path.display(), bars = rows, "Chart exported");
        Ok(())
    }

    /// Write the chart spec as pretty JSON.
    pub fn write_json(spec: &ChartSpec, path: &Path) -> Result<(), RenderError> {
        let json = spec.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Chart spec exported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::BarChartOptions;
    use crate::stats::{RankedResult, RankedRow, ValueFormat};

    #[test]
    fn json_export_round_trips() {
        let ranked = RankedResult::new(
            "Source_Airport",
            "routes",
            ValueFormat::Integer,
            vec![RankedRow::new("ATL", 4.0), RankedRow::new("ORD", 2.0)],
        );
        let spec = ChartSpec::bar(
            &ranked,
            &BarChartOptions {
                title: "Hubs".to_string(),
                value_title: "Routes".to_string(),
                label_title: "Airport".to_string(),
                scheme: "blues".to_string(),
                width: 600,
                height: 400,
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubs.json");
        StaticChartRenderer::write_json(&spec, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: ChartSpec = serde_json::from_str(&text).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn json_export_to_missing_dir_is_io_error() {
        let ranked = RankedResult::new("a", "b", ValueFormat::Integer, Vec::new());
        let spec = ChartSpec::bar(
            &ranked,
            &BarChartOptions {
                title: String::new(),
                value_title: String::new(),
                label_title: String::new(),
                scheme: "tealblues".to_string(),
                width: 10,
                height: 10,
            },
        );
        let err = StaticChartRenderer::write_json(&spec, Path::new("/nonexistent/dir/spec.json"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Io { .. }));
    }
}

//! Chart Viewer Widget
//! Right side panel: bar chart, summary sentence and preview table of the
//! current dashboard view.

use chartboard::charts::scale::color_for;
use chartboard::charts::{ChartSpec, TablePreview};
use chartboard::dashboards::RenderedView;
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, Plot};

const CHART_HEIGHT: f32 = 400.0;
const BAR_WIDTH: f64 = 0.7;

/// Scrollable display of one rendered view, or an informational message.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<RenderedView>,
    pub message: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: RenderedView) {
        self.view = Some(view);
        self.message = None;
    }

    /// Replace the chart with a message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.view = None;
        self.message = Some(message.into());
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = &self.message {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(message).size(16.0).color(Color32::GRAY));
            });
            return;
        }

        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&view.chart.title).size(18.0).strong());
                });
                ui.add_space(10.0);

                if view.is_empty() {
                    ui.label(
                        RichText::new("No rows match this selection.")
                            .size(14.0)
                            .color(Color32::GRAY),
                    );
                } else {
                    Self::draw_bar_chart(ui, &view.chart);
                }

                if let Some(summary) = &view.summary {
                    ui.add_space(10.0);
                    ui.label(RichText::new(summary).size(14.0).strong());
                }

                ui.add_space(15.0);
                ui.label(RichText::new("📋 Data Preview").size(14.0).strong());
                ui.add_space(5.0);
                Self::draw_preview(ui, &view.preview);
            });
    }

    /// Horizontal bars, first ranked row on top.
    fn draw_bar_chart(ui: &mut egui::Ui, spec: &ChartSpec) {
        let bars = spec.bars();
        let n = bars.len();
        let max = spec.value_max();
        let scheme = spec.scheme().to_string();

        let labels: Vec<String> = bars.iter().rev().map(|(label, _)| label.clone()).collect();

        let plot_bars: Vec<Bar> = bars
            .iter()
            .enumerate()
            .map(|(rank, (label, value))| {
                let (r, g, b) = color_for(&scheme, *value, max);
                Bar::new((n - 1 - rank) as f64, *value)
                    .name(label)
                    .width(BAR_WIDTH)
                    .fill(Color32::from_rgb(r, g, b))
            })
            .collect();

        Plot::new(format!("bar_{}", spec.title))
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(max)
            .x_axis_label(spec.encoding.x.title.clone())
            .y_axis_label(spec.encoding.y.title.clone())
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx - mark.value).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(plot_bars).horizontal());
            });
    }

    fn draw_preview(ui: &mut egui::Ui, preview: &TablePreview) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("preview_table")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong().size(12.0));
                        for column in &preview.columns {
                            ui.label(RichText::new(column).strong().size(12.0));
                        }
                        ui.end_row();

                        for (i, row) in preview.rows.iter().enumerate() {
                            ui.label(RichText::new(i.to_string()).size(12.0).color(Color32::GRAY));
                            for cell in row {
                                ui.label(RichText::new(cell).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

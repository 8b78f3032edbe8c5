//! Chartboard Main Application
//! Main window with control panel and chart viewer.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DashboardKind};
use chartboard::charts::StaticChartRenderer;
use chartboard::dashboards::{FlightsDashboard, MbtiDashboard, PipelineError, RenderedView, UploadState};
use chartboard::data::{DataLoader, Source};
use chartboard::DashboardConfig;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// Remote dataset loading result from background thread
enum LoadResult {
    Complete(FlightsDashboard),
    Error(String),
}

/// Main application window.
pub struct ChartboardApp {
    config: DashboardConfig,
    loader: Arc<DataLoader>,
    mbti: MbtiDashboard,
    upload: UploadState,
    flights: Option<FlightsDashboard>,

    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async remote loading
    load_rx: Option<Receiver<LoadResult>>,
}

impl ChartboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        loader: Arc<DataLoader>,
        mbti: MbtiDashboard,
    ) -> Self {
        let mut control_panel = ControlPanel::new();
        control_panel.update_mbti_types(mbti.types().to_vec());

        let mut app = Self {
            config,
            loader,
            mbti,
            upload: UploadState::default(),
            flights: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
        };
        app.refresh();
        app
    }

    /// Re-run the pipeline of the active dashboard for the current widget values.
    fn refresh(&mut self) {
        let settings = self.control_panel.settings.clone();

        let result: Option<Result<RenderedView, PipelineError>> = match settings.dashboard {
            DashboardKind::Mbti => Some(self.mbti.render(&settings.mbti_type, &self.config)),
            DashboardKind::Upload => match self.upload.dashboard() {
                Some(dashboard) => Some(dashboard.render(&settings.upload_type, &self.config)),
                None => {
                    let message = self.upload.message().unwrap_or_default();
                    self.chart_viewer.set_message(message);
                    None
                }
            },
            DashboardKind::Flights => match &self.flights {
                Some(flights) => Some(flights.render(
                    &settings.airline,
                    settings.flights_tab,
                    &self.config,
                )),
                None => {
                    self.chart_viewer.set_message(if self.load_rx.is_some() {
                        "Loading routes and airports..."
                    } else {
                        "Route and airport data are not loaded yet."
                    });
                    None
                }
            },
        };

        match result {
            Some(Ok(view)) => {
                self.control_panel.export_enabled = !view.is_empty();
                self.chart_viewer.set_view(view);
            }
            Some(Err(e)) => {
                warn!(error = %e, "Render failed");
                self.control_panel.export_enabled = false;
                self.chart_viewer.set_message(e.to_string());
            }
            None => self.control_panel.export_enabled = false,
        }
    }

    /// Handle CSV upload: read the chosen file and load it through the cache
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        self.upload = match std::fs::read(&path) {
            Ok(bytes) => UploadState::from_upload(&self.loader, &file_name, bytes),
            Err(e) => UploadState::Failed(e.to_string()),
        };

        match &self.upload {
            UploadState::Ready { dashboard, .. } => {
                self.control_panel.update_upload_types(dashboard.types().to_vec());
                self.control_panel.upload_name = Some(file_name);
                self.control_panel.set_status("Upload loaded");
            }
            UploadState::Failed(reason) => {
                error!(%reason, "Upload failed");
                self.control_panel.update_upload_types(Vec::new());
                self.control_panel.upload_name = None;
                self.control_panel.set_status(format!("Error: {}", reason));
            }
            UploadState::Waiting => {}
        }
    }

    /// Fetch routes and airports in a background thread
    fn start_flights_load(&mut self) {
        if self.load_rx.is_some() || self.flights.is_some() {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.control_panel.flights_loading = true;
        self.control_panel.set_status("Loading flight datasets...");

        let loader = Arc::clone(&self.loader);
        let routes = Source::Url(self.config.routes_url.clone());
        let airports = Source::Url(self.config.airports_url.clone());

        thread::spawn(move || {
            let result = match FlightsDashboard::load(&loader, &routes, &airports) {
                Ok(dashboard) => LoadResult::Complete(dashboard),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for remote loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(flights)) => {
                info!(airlines = flights.airlines().len(), "Flight datasets ready");
                self.control_panel.update_airlines(flights.airlines().to_vec());
                self.control_panel.flights_loading = false;
                self.control_panel.set_status("Flight datasets loaded");
                self.flights = Some(flights);
                self.refresh();
            }
            Ok(LoadResult::Error(reason)) => {
                error!(%reason, "Flight datasets unavailable");
                self.control_panel.flights_loading = false;
                self.control_panel.set_status(format!("Error: {}", reason));
                if self.control_panel.settings.dashboard == DashboardKind::Flights {
                    self.chart_viewer
                        .set_message(format!("Flight data unavailable: {}", reason));
                }
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                // Put receiver back while the thread is still working
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.control_panel.flights_loading = false;
                self.control_panel.set_status("Error: loader thread stopped");
                self.refresh();
            }
        }
    }

    fn handle_export_png(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("chart.png")
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::render_png(&view.chart, &path) {
            Ok(()) => {
                self.control_panel
                    .set_status(format!("PNG exported: {}", path.display()));
                if let Err(e) = open::that(&path) {
                    warn!(error = %e, "Could not open exported chart");
                }
            }
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }

    fn handle_export_spec(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("Vega-Lite JSON", &["json"])
            .set_file_name("chart.vl.json")
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::write_json(&view.chart, &path) {
            Ok(()) => self
                .control_panel
                .set_status(format!("Chart spec exported: {}", path.display())),
            Err(e) => self.control_panel.set_status(format!("Error: {}", e)),
        }
    }
}

impl eframe::App for ChartboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.load_rx.is_some() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SelectionChanged => {
                            if self.control_panel.settings.dashboard == DashboardKind::Flights {
                                self.start_flights_load();
                            }
                            self.refresh();
                        }
                        ControlPanelAction::BrowseCsv => {
                            self.handle_browse_csv();
                            self.refresh();
                        }
                        ControlPanelAction::LoadFlights => {
                            self.start_flights_load();
                            self.refresh();
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportSpec => self.handle_export_spec(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartboard::data::{Fetcher, LoaderError};
    use polars::prelude::*;
    use std::sync::mpsc::Sender;

    struct OfflineFetcher;

    impl Fetcher for OfflineFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
            Err(LoaderError::DataUnavailable {
                source_desc: url.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    /// App on `dashboard` with a flights load in flight.
    fn loading_app(dashboard: DashboardKind) -> (ChartboardApp, Sender<LoadResult>) {
        let table = df!(
            "Country" => ["Korea", "Japan"],
            "INTJ" => [0.05, 0.06],
        )
        .unwrap();
        let mbti = MbtiDashboard::new(Arc::new(table)).unwrap();

        let mut control_panel = ControlPanel::new();
        control_panel.update_mbti_types(mbti.types().to_vec());

        let (tx, rx) = channel();
        let mut app = ChartboardApp {
            config: DashboardConfig::default(),
            loader: Arc::new(DataLoader::new(Box::new(OfflineFetcher))),
            mbti,
            upload: UploadState::default(),
            flights: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: Some(rx),
        };
        app.refresh();
        assert!(app.chart_viewer.view.is_some());

        app.control_panel.settings.dashboard = dashboard;
        (app, tx)
    }

    #[test]
    fn returning_to_flights_while_loading_replaces_previous_chart() {
        let (mut app, _tx) = loading_app(DashboardKind::Flights);
        app.refresh();

        assert!(app.chart_viewer.view.is_none());
        assert_eq!(
            app.chart_viewer.message.as_deref(),
            Some("Loading routes and airports...")
        );
    }

    #[test]
    fn load_error_leaves_other_dashboards_alone() {
        let (mut app, tx) = loading_app(DashboardKind::Mbti);
        tx.send(LoadResult::Error("timed out".to_string())).unwrap();
        app.check_load_results();

        assert!(app.load_rx.is_none());
        assert!(app.chart_viewer.view.is_some());
        assert!(app.control_panel.status.contains("timed out"));
    }

    #[test]
    fn load_error_is_shown_on_flights() {
        let (mut app, tx) = loading_app(DashboardKind::Flights);
        tx.send(LoadResult::Error("timed out".to_string())).unwrap();
        app.check_load_results();

        assert!(app.chart_viewer.view.is_none());
        assert_eq!(
            app.chart_viewer.message.as_deref(),
            Some("Flight data unavailable: timed out")
        );
    }

    #[test]
    fn stopped_loader_thread_refreshes_current_dashboard() {
        let (mut app, tx) = loading_app(DashboardKind::Flights);
        drop(tx);
        app.check_load_results();

        assert!(app.load_rx.is_none());
        assert_eq!(
            app.chart_viewer.message.as_deref(),
            Some("Route and airport data are not loaded yet.")
        );
    }
}

//! Chartboard - Top-10 dashboards over MBTI and flight-route data
//!
//! Loads the bundled MBTI table up front and opens the dashboard window.

mod gui;

use anyhow::Context;
use chartboard::dashboards::MbtiDashboard;
use chartboard::data::{DataLoader, Source};
use chartboard::DashboardConfig;
use eframe::egui;
use gui::ChartboardApp;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chartboard=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let config = DashboardConfig::discover()?;
    let loader = Arc::new(DataLoader::with_http(Duration::from_secs(
        config.http_timeout_secs,
    ))?);

    // The bundled table is required; fail before opening the window
    let mbti = MbtiDashboard::load(&loader, &Source::File(config.mbti_csv.clone()))
        .with_context(|| format!("loading bundled dataset {}", config.mbti_csv.display()))?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Chartboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Chartboard",
        options,
        Box::new(move |cc| Ok(Box::new(ChartboardApp::new(cc, config, loader, mbti)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {}", e))
}

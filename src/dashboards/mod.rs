//! Dashboards - one pure render function per dashboard
//!
//! A dashboard owns its loaded tables and turns the current widget values
//! into a [`RenderedView`]. Nothing is cached between renders.

pub mod flights;
pub mod mbti;

pub use flights::{FlightsDashboard, FlightsTab};
pub use mbti::{MbtiDashboard, UploadState};

use crate::charts::{ChartSpec, TablePreview};
use crate::data::LoaderError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Table is missing column {0}")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub chart: ChartSpec,
    pub preview: TablePreview,
    /// One-sentence summary of a derived metric
    pub summary: Option<String>,
}

impl RenderedView {
    /// No rows survived selection; the UI shows a placeholder instead of a chart.
    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }
}

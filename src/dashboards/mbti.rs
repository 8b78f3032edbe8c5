//! MBTI-by-country dashboard: top countries for one personality type.

use crate::charts::{BarChartOptions, ChartSpec, TablePreview};
use crate::config::DashboardConfig;
use crate::dashboards::{PipelineError, RenderedView};
use crate::data::processor::{category_columns, select_category};
use crate::data::schema::{missing_column, COUNTRY};
use crate::data::{CsvLayout, DataLoader, Source};
use crate::stats::metrics::{column_mean, percent};
use crate::stats::ranking::{top_n_by_value, ValueFormat};
use polars::prelude::*;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct MbtiDashboard {
    table: Arc<DataFrame>,
    types: Vec<String>,
}

impl MbtiDashboard {
    pub fn new(table: Arc<DataFrame>) -> Result<Self, PipelineError> {
        if let Some(missing) = missing_column(&table, &[COUNTRY]) {
            return Err(PipelineError::MissingColumn(missing.to_string()));
        }
        let types = category_columns(&table, &[COUNTRY]);
        Ok(Self { table, types })
    }

    /// Load a headered MBTI CSV through the shared loader.
    pub fn load(loader: &DataLoader, source: &Source) -> Result<Self, PipelineError> {
        let table = loader.load(source, CsvLayout::Headered)?;
        Self::new(table)
    }

    /// Selectable types, in file order.
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Top countries for `mbti_type`, with percent column and the mean share
    /// over every country in the table.
    pub fn render(
        &self,
        mbti_type: &str,
        config: &DashboardConfig,
    ) -> Result<RenderedView, PipelineError> {
        if !self.types.iter().any(|t| t == mbti_type) {
            return Err(PipelineError::UnknownCategory(mbti_type.to_string()));
        }

        let sub = select_category(&self.table, COUNTRY, mbti_type)?;
        let ranked = top_n_by_value(
            &sub,
            COUNTRY,
            mbti_type,
            config.top_n,
            ValueFormat::Decimal(4),
        )?;
        let ranked = percent(&ranked);
        debug!(mbti_type, rows = ranked.len(), "Ranked countries");

        let chart = ChartSpec::bar(
            &ranked,
            &BarChartOptions {
                title: format!(
                    "Countries with the highest share of {} (Top {})",
                    mbti_type, config.top_n
                ),
                value_title: "Share (%)".to_string(),
                label_title: "Country".to_string(),
                scheme: config.color_scheme.clone(),
                width: config.chart_width,
                height: config.chart_height,
            },
        );

        // Mean over the full table, not the ranked subset
        let summary = column_mean(&self.table, mbti_type)?.map(|mean| {
            format!(
                "Average share of {} across all countries: {:.2}%",
                mbti_type,
                mean * 100.0
            )
        });

        Ok(RenderedView {
            preview: TablePreview::from_ranked(&ranked),
            chart,
            summary,
        })
    }
}

/// Upload dashboard lifecycle. Starts waiting for a file.
#[derive(Clone, Default)]
pub enum UploadState {
    #[default]
    Waiting,
    Ready {
        file_name: String,
        dashboard: MbtiDashboard,
    },
    Failed(String),
}

impl UploadState {
    /// Load an uploaded CSV. Failures are kept as a message, not returned.
    pub fn from_upload(loader: &DataLoader, file_name: &str, bytes: Vec<u8>) -> Self {
        let source = Source::upload(file_name, bytes);
        match MbtiDashboard::load(loader, &source) {
            Ok(dashboard) => UploadState::Ready {
                file_name: file_name.to_string(),
                dashboard,
            },
            Err(e) => UploadState::Failed(e.to_string()),
        }
    }

    pub fn dashboard(&self) -> Option<&MbtiDashboard> {
        match self {
            UploadState::Ready { dashboard, .. } => Some(dashboard),
            _ => None,
        }
    }

    /// Informational message shown instead of a chart.
    pub fn message(&self) -> Option<String> {
        match self {
            UploadState::Waiting => {
                Some("Upload a CSV with a Country column and one column per MBTI type.".to_string())
            }
            UploadState::Failed(reason) => Some(format!("Could not read the uploaded file: {}", reason)),
            UploadState::Ready { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> MbtiDashboard {
        let df = df!(
            "Country" => ["A", "B", "C"],
            "Type" => [0.5, 0.9, 0.3],
            "Other" => [0.5, 0.1, 0.7],
        )
        .unwrap();
        MbtiDashboard::new(Arc::new(df)).unwrap()
    }

    #[test]
    fn example_scenario() {
        let view = dashboard().render("Type", &DashboardConfig::default()).unwrap();

        let bars = view.chart.bars();
        let labels: Vec<&str> = bars.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["B", "A", "C"]);

        let percents: Vec<&str> = view.preview.rows.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(percents, vec!["90.00", "50.00", "30.00"]);

        assert_eq!(
            view.summary.as_deref(),
            Some("Average share of Type across all countries: 56.67%")
        );
    }

    #[test]
    fn mean_does_not_depend_on_top_n() {
        let config = DashboardConfig {
            top_n: 1,
            ..DashboardConfig::default()
        };
        let view = dashboard().render("Type", &config).unwrap();
        assert_eq!(view.preview.rows.len(), 1);
        assert_eq!(
            view.summary.as_deref(),
            Some("Average share of Type across all countries: 56.67%")
        );
    }

    #[test]
    fn types_exclude_country() {
        assert_eq!(dashboard().types(), &["Type".to_string(), "Other".to_string()]);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = dashboard()
            .render("Country", &DashboardConfig::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownCategory(_)));
    }

    #[test]
    fn table_without_country_is_rejected() {
        let df = df!("Nation" => ["A"], "INTJ" => [0.1]).unwrap();
        let err = MbtiDashboard::new(Arc::new(df)).err().unwrap();
        assert!(matches!(err, PipelineError::MissingColumn(c) if c == "Country"));
    }

    #[test]
    fn upload_states() {
        let loader = DataLoader::with_http(std::time::Duration::from_secs(1)).unwrap();

        let waiting = UploadState::default();
        assert!(waiting.dashboard().is_none());
        assert!(waiting.message().is_some());

        let ready = UploadState::from_upload(&loader, "mbti.csv", b"Country,INTJ\nA,0.4\n".to_vec());
        assert!(ready.message().is_none());
        assert_eq!(ready.dashboard().unwrap().types(), &["INTJ".to_string()]);

        let failed = UploadState::from_upload(&loader, "empty.csv", Vec::new());
        assert!(matches!(failed, UploadState::Failed(_)));
        assert!(failed.message().unwrap().contains("empty upload"));
    }
}

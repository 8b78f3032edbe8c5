//! Chartboard - ranked bar-chart dashboards over tabular data.
//!
//! Every dashboard runs the same pipeline: load a table once, select the
//! rows or columns for the current widget value, aggregate into a small
//! ranked result, derive a metric, and render a chart spec plus a preview.

pub mod charts;
pub mod config;
pub mod dashboards;
pub mod data;
pub mod stats;

pub use config::DashboardConfig;

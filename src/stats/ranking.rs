//! Ranking Module
//! Top-N and group-count aggregation with a stable tie-break.

use crate::data::processor::{float_values, string_values};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::HashMap;

/// How a numeric column is shown in previews and tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Fixed number of decimal places
    Decimal(usize),
    /// Whole numbers (row counts)
    Integer,
}

impl ValueFormat {
    pub fn render(self, value: f64) -> String {
        match self {
            ValueFormat::Decimal(places) => format!("{:.*}", places, value),
            ValueFormat::Integer => format!("{:.0}", value),
        }
    }

    /// d3-format string used in chart tooltips.
    pub fn d3(self) -> String {
        match self {
            ValueFormat::Decimal(places) => format!(".{}f", places),
            ValueFormat::Integer => "d".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub label: String,
    pub value: f64,
    /// Per-row derived metric, set by a deriver such as [`crate::stats::metrics::percent`]
    pub derived: Option<f64>,
}

impl RankedRow {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            derived: None,
        }
    }
}

/// At most N rows sorted descending by `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub label_field: String,
    pub value_field: String,
    pub value_format: ValueFormat,
    pub derived_field: Option<String>,
    pub derived_format: ValueFormat,
    pub rows: Vec<RankedRow>,
}

impl RankedResult {
    pub fn new(
        label_field: impl Into<String>,
        value_field: impl Into<String>,
        value_format: ValueFormat,
        rows: Vec<RankedRow>,
    ) -> Self {
        Self {
            label_field: label_field.into(),
            value_field: value_field.into(),
            value_format,
            derived_field: None,
            derived_format: ValueFormat::Decimal(2),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Field a chart should plot: the derived one when present.
    pub fn plotted_field(&self) -> &str {
        self.derived_field.as_deref().unwrap_or(&self.value_field)
    }

    pub fn plotted_format(&self) -> ValueFormat {
        if self.derived_field.is_some() {
            self.derived_format
        } else {
            self.value_format
        }
    }

    /// Value of a row in the plotted field.
    pub fn plotted_value(&self, row: &RankedRow) -> f64 {
        match (&self.derived_field, row.derived) {
            (Some(_), Some(derived)) => derived,
            _ => row.value,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }
}

/// Sort pairs descending by value, keeping input order among equal values,
/// and keep the first `n`.
pub fn rank_pairs(pairs: Vec<(String, f64)>, n: usize) -> Vec<RankedRow> {
    let mut pairs = pairs;
    // Vec::sort_by is stable
    pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    pairs.truncate(n);
    pairs
        .into_iter()
        .map(|(label, value)| RankedRow::new(label, value))
        .collect()
}

/// Rank table rows by a numeric column.
///
/// Rows with a null label or a null/NaN value are dropped first, so the
/// result holds `min(n, eligible rows)` rows.
pub fn top_n_by_value(
    df: &DataFrame,
    label_col: &str,
    value_col: &str,
    n: usize,
    value_format: ValueFormat,
) -> PolarsResult<RankedResult> {
    let labels = string_values(df, label_col)?;
    let values = float_values(df, value_col)?;

    let pairs: Vec<(String, f64)> = labels
        .into_iter()
        .zip(values)
        .filter_map(|(label, value)| match (label, value) {
            (Some(label), Some(value)) if !value.is_nan() => Some((label, value)),
            _ => None,
        })
        .collect();

    Ok(RankedResult::new(
        label_col,
        value_col,
        value_format,
        rank_pairs(pairs, n),
    ))
}

/// Count rows per key and rank the keys by count.
///
/// Every row counts, so repeated rows for the same key add up. Null keys are
/// skipped. Groups with equal counts keep the order of their first appearance.
pub fn group_count<I>(keys: I, n: usize) -> Vec<RankedRow>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut order: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for key in keys.into_iter().flatten() {
        match index.get(&key) {
            Some(&i) => order[i].1 += 1.0,
            None => {
                index.insert(key.clone(), order.len());
                order.push((key, 1.0));
            }
        }
    }

    rank_pairs(order, n)
}

/// Group-count a table column into a ranked result.
pub fn group_count_column(
    df: &DataFrame,
    key_col: &str,
    count_field: &str,
    n: usize,
) -> PolarsResult<RankedResult> {
    let keys = string_values(df, key_col)?;
    Ok(RankedResult::new(
        key_col,
        count_field,
        ValueFormat::Integer,
        group_count(keys, n),
    ))
}

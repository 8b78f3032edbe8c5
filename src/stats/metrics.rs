//! Metric Deriver
//! Percent conversion and means over ranked results and full tables.

use crate::data::processor::float_values;
use crate::stats::ranking::{RankedResult, ValueFormat};
use polars::prelude::*;
use statrs::statistics::Statistics;

pub const PERCENT_FIELD: &str = "percent";

/// Copy of `ranked` with a `percent` column equal to `value * 100`.
///
/// No rounding is applied; formatting happens at display time.
pub fn percent(ranked: &RankedResult) -> RankedResult {
    let mut derived = ranked.clone();
    derived.derived_field = Some(PERCENT_FIELD.to_string());
    derived.derived_format = ValueFormat::Decimal(2);
    for row in &mut derived.rows {
        row.derived = Some(row.value * 100.0);
    }
    derived
}

/// Arithmetic mean of a slice, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Mean of every non-null value in a column of the full table.
///
/// Callers pass the unfiltered table: the mean does not depend on which rows
/// made it into a ranking.
pub fn column_mean(df: &DataFrame, column: &str) -> PolarsResult<Option<f64>> {
    let values: Vec<f64> = float_values(df, column)?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect();
    Ok(mean(&values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ranking::{top_n_by_value, RankedRow};

    fn example() -> DataFrame {
        df!(
            "Country" => ["A", "B", "C"],
            "Type" => [0.5, 0.9, 0.3],
        )
        .unwrap()
    }

    #[test]
    fn percent_is_exact_product() {
        let ranked = top_n_by_value(&example(), "Country", "Type", 10, ValueFormat::Decimal(4))
            .unwrap();
        let with_percent = percent(&ranked);

        assert_eq!(with_percent.derived_field.as_deref(), Some("percent"));
        for row in &with_percent.rows {
            assert_eq!(row.derived, Some(row.value * 100.0));
        }
        let percents: Vec<f64> = with_percent.rows.iter().filter_map(|r| r.derived).collect();
        assert_eq!(percents, vec![0.9 * 100.0, 0.5 * 100.0, 0.3 * 100.0]);
        assert!((percents[0] - 90.0).abs() < 1e-9);
        assert!((percents[2] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn percent_leaves_input_untouched() {
        let ranked = RankedResult::new(
            "Country",
            "Type",
            ValueFormat::Decimal(4),
            vec![RankedRow::new("A", 0.25)],
        );
        let _ = percent(&ranked);
        assert_eq!(ranked.derived_field, None);
        assert_eq!(ranked.rows[0].derived, None);
    }

    #[test]
    fn mean_uses_full_column() {
        let mean = column_mean(&example(), "Type").unwrap().unwrap();
        assert!((mean - (0.5 + 0.9 + 0.3) / 3.0).abs() < 1e-12);
        assert_eq!(format!("{:.2}", mean * 100.0), "56.67");
    }

    #[test]
    fn mean_skips_nulls_and_handles_empty() {
        let df = df!("Type" => [Some(1.0), None, Some(3.0)]).unwrap();
        assert_eq!(column_mean(&df, "Type").unwrap(), Some(2.0));

        let empty = df!("Type" => Vec::<f64>::new()).unwrap();
        assert_eq!(column_mean(&empty, "Type").unwrap(), None);
        assert_eq!(mean(&[]), None);
    }
}

//! Data Processor Module
//! Row and column selection plus typed column extraction.

use polars::prelude::*;

/// Project a table onto its identifier column and one category column.
pub fn select_category(df: &DataFrame, id_col: &str, category: &str) -> PolarsResult<DataFrame> {
    df.select([id_col, category])
}

/// Keep rows where `column` equals `value`. No match yields an empty frame.
pub fn filter_equals(df: &DataFrame, column: &str, value: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col(column).eq(lit(value)))
        .collect()
}

/// All column names except the identifier columns, in table order.
pub fn category_columns(df: &DataFrame, id_columns: &[&str]) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| !id_columns.contains(&name.as_str()))
        .collect()
}

/// Distinct non-null values of a column, sorted.
pub fn unique_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
    let mut values: Vec<String> = string_values(df, column)?
        .into_iter()
        .flatten()
        .collect();
    values.sort();
    values.dedup();
    Ok(values)
}

/// Column cells as strings, nulls preserved.
pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Column cells as floats. Cells that do not parse as numbers are an error.
pub fn float_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .strict_cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Column cells as integers. Cells that do not parse as integers are an error.
pub fn int_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<i64>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .strict_cast(&DataType::Int64)?;
    Ok(series.i64()?.into_iter().collect())
}

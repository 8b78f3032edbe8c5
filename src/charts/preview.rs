//! Tabular preview of a ranked result, formatted for display.

use crate::stats::RankedResult;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TablePreview {
    pub fn from_ranked(ranked: &RankedResult) -> Self {
        let mut columns = vec![ranked.label_field.clone(), ranked.value_field.clone()];
        if let Some(derived) = &ranked.derived_field {
            columns.push(derived.clone());
        }

        let rows = ranked
            .rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone(), ranked.value_format.render(row.value)];
                if ranked.derived_field.is_some() {
                    cells.push(
                        row.derived
                            .map(|v| ranked.derived_format.render(v))
                            .unwrap_or_default(),
                    );
                }
                cells
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::metrics::percent;
    use crate::stats::{RankedRow, ValueFormat};

    #[test]
    fn formats_value_and_percent_columns() {
        let ranked = percent(&RankedResult::new(
            "Country",
            "INTJ",
            ValueFormat::Decimal(4),
            vec![RankedRow::new("B", 0.9), RankedRow::new("A", 0.123_456)],
        ));

        let preview = TablePreview::from_ranked(&ranked);
        assert_eq!(preview.columns, vec!["Country", "INTJ", "percent"]);
        assert_eq!(preview.rows[0], vec!["B", "0.9000", "90.00"]);
        assert_eq!(preview.rows[1], vec!["A", "0.1235", "12.35"]);
    }

    #[test]
    fn counts_render_as_integers() {
        let ranked = RankedResult::new(
            "Source_Airport",
            "routes",
            ValueFormat::Integer,
            vec![RankedRow::new("ATL", 12.0)],
        );
        let preview = TablePreview::from_ranked(&ranked);
        assert_eq!(preview.columns, vec!["Source_Airport", "routes"]);
        assert_eq!(preview.rows[0], vec!["ATL", "12"]);
    }

    #[test]
    fn empty_result_keeps_header() {
        let ranked = RankedResult::new("Country", "INTJ", ValueFormat::Decimal(4), Vec::new());
        let preview = TablePreview::from_ranked(&ranked);
        assert!(preview.is_empty());
        assert_eq!(preview.columns.len(), 2);
    }
}

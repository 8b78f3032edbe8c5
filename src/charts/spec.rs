//! Declarative Chart Spec
//! Vega-Lite style bar chart description built from a ranked result.

use crate::stats::RankedResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Headroom above the largest bar on the value axis.
pub const DOMAIN_HEADROOM: f64 = 1.1;

/// 1-based position of a row in the ranking, one band per row.
pub const RANK_FIELD: &str = "rank";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    pub corner_radius_end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Ordinal,
    Nominal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    /// Vega expression producing the tick text
    pub label_expr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub scale: Scale,
    /// Always serialized; `null` hides the legend
    pub legend: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub x: PositionChannel,
    pub y: PositionChannel,
    pub color: ColorChannel,
    pub tooltip: Vec<TooltipChannel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub values: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub mark: Mark,
    pub data: InlineData,
    pub encoding: Encoding,
}

/// Labels and sizing for a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartOptions {
    pub title: String,
    pub value_title: String,
    pub label_title: String,
    pub scheme: String,
    pub width: u32,
    pub height: u32,
}

impl ChartSpec {
    /// Horizontal bar chart of a ranked result.
    ///
    /// Bars follow the ranked order; the value axis and the color encode the
    /// plotted field (the derived column when present). The band axis is the
    /// row rank, so repeated labels stay separate bars; tick text shows labels.
    pub fn bar(ranked: &RankedResult, options: &BarChartOptions) -> Self {
        let plotted = ranked.plotted_field().to_string();
        let format = ranked.plotted_format();

        let values: Vec<Map<String, Value>> = ranked
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut record = Map::new();
                record.insert(RANK_FIELD.to_string(), Value::from(i + 1));
                record.insert(ranked.label_field.clone(), Value::from(row.label.clone()));
                record.insert(ranked.value_field.clone(), Value::from(row.value));
                if let (Some(field), Some(derived)) = (&ranked.derived_field, row.derived) {
                    record.insert(field.clone(), Value::from(derived));
                }
                record
            })
            .collect();

        let max = ranked
            .rows
            .iter()
            .map(|row| ranked.plotted_value(row))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
        let domain = max.map(|m| [0.0, m * DOMAIN_HEADROOM]);

        ChartSpec {
            title: options.title.clone(),
            width: options.width,
            height: options.height,
            mark: Mark {
                kind: MarkKind::Bar,
                corner_radius_end: 8.0,
            },
            data: InlineData { values },
            encoding: Encoding {
                x: PositionChannel {
                    field: plotted.clone(),
                    field_type: FieldType::Quantitative,
                    title: options.value_title.clone(),
                    sort: None,
                    scale: Some(Scale {
                        domain,
                        scheme: None,
                    }),
                    axis: None,
                },
                y: PositionChannel {
                    field: RANK_FIELD.to_string(),
                    field_type: FieldType::Ordinal,
                    title: options.label_title.clone(),
                    sort: Some("ascending".to_string()),
                    scale: None,
                    axis: Some(Axis {
                        label_expr: label_expr(ranked),
                    }),
                },
                color: ColorChannel {
                    field: plotted.clone(),
                    field_type: FieldType::Quantitative,
                    scale: Scale {
                        domain: None,
                        scheme: Some(options.scheme.clone()),
                    },
                    legend: None,
                },
                tooltip: vec![
                    TooltipChannel {
                        field: ranked.label_field.clone(),
                        field_type: FieldType::Nominal,
                        title: options.label_title.clone(),
                        format: None,
                    },
                    TooltipChannel {
                        field: plotted,
                        field_type: FieldType::Quantitative,
                        title: options.value_title.clone(),
                        format: Some(format.d3()),
                    },
                ],
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.values.is_empty()
    }

    /// `(label, plotted value)` pairs in chart order.
    pub fn bars(&self) -> Vec<(String, f64)> {
        self.data
            .values
            .iter()
            .map(|record| {
                let label = record
                    .get(self.label_field())
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let value = record
                    .get(&self.encoding.x.field)
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                (label, value)
            })
            .collect()
    }

    /// Field holding the row labels: the first tooltip entry.
    pub fn label_field(&self) -> &str {
        self.encoding
            .tooltip
            .first()
            .map(|t| t.field.as_str())
            .unwrap_or(&self.encoding.y.field)
    }

    /// Upper bound of the value axis.
    pub fn value_max(&self) -> f64 {
        self.encoding
            .x
            .scale
            .as_ref()
            .and_then(|s| s.domain)
            .map(|[_, hi]| hi)
            .unwrap_or(1.0)
    }

    pub fn scheme(&self) -> &str {
        self.encoding
            .color
            .scale
            .scheme
            .as_deref()
            .unwrap_or(crate::charts::scale::DEFAULT_SCHEME)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `["B","A"][datum.value - 1]`: rank tick to label.
fn label_expr(ranked: &RankedResult) -> String {
    let labels = serde_json::to_string(&ranked.labels()).unwrap_or_else(|_| "[]".to_string());
    format!("{}[datum.value - 1]", labels)
}

//! Typed chart data produced by the data pipeline.

use crate::cell::{CellValue, ChartDataSource};
use crate::chart_type::ChartTypeBits;
use serde::{Deserialize, Serialize};

/// Orientation of the series in the source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Each row of the range is one sequence (category or series).
    #[default]
    Row,
    /// Each column of the range is one sequence; the grid is transposed first.
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryType {
    /// Band axis of text labels.
    Text,
    /// Numeric axis.
    Linear,
}

/// Declared and derived structure of a data source.
///
/// Fields left `None` are inferred by the pipeline; the resolved values are written back into
/// the context so they can be persisted and shown to the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartDataConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_type: Option<CategoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_indexes: Option<Vec<usize>>,
    pub direction: Direction,
    pub aggregate: bool,
}

/// Mutable state threaded through the data operators.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataContext {
    pub data_source: ChartDataSource,
    pub data_config: ChartDataConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataItem {
    pub value: CellValue,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesItem {
    pub value: Option<f64>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Row of the (post-transform) data source holding the category.
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub items: Vec<DataItem>,
    /// Stable per-item join keys (`"{position}_{label}"`).
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Row of the (post-transform) data source holding the series.
    pub index: usize,
    pub name: String,
    pub items: Vec<SeriesItem>,
}

impl Series {
    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.items.iter().map(|item| item.value)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub series: Vec<Series>,
}

impl ChartData {
    /// Number of data points per series.
    pub fn item_count(&self) -> usize {
        match &self.category {
            Some(category) => category.items.len(),
            None => self.series.first().map(|s| s.items.len()).unwrap_or(0),
        }
    }

    /// Label of the `position`-th data point; the 1-based position without a category.
    pub fn category_label(&self, position: usize) -> String {
        self.category
            .as_ref()
            .and_then(|c| c.items.get(position))
            .map(|item| item.label.clone())
            .unwrap_or_else(|| (position + 1).to_string())
    }

    /// Join key of the `position`-th data point.
    pub fn category_key(&self, position: usize) -> String {
        self.category
            .as_ref()
            .and_then(|c| c.keys.get(position).cloned())
            .unwrap_or_else(|| category_key(position, &(position + 1).to_string()))
    }
}

/// Join key stamped on category items.
pub fn category_key(position: usize, label: &str) -> String {
    format!("{position}_{label}")
}

/// Chart data with its resolved chart type: the input of spec conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartTypeBits,
    #[serde(flatten)]
    pub data: ChartData,
}

impl ChartConfig {
    pub fn new(chart_type: ChartTypeBits, data: ChartData) -> Self {
        Self { chart_type, data }
    }
}

//! Data pipeline: raw cell grid + data config -> [`ChartData`].
//!
//! The pipeline is an ordered list of operators over a shared [`ChartDataContext`]. Each operator
//! may rewrite the data source (transpose, aggregation) and fills in the parts of the data config
//! it is responsible for. The canonical order is:
//!
//! 1. [`direction`]: transpose column-oriented ranges
//! 2. [`header`]: majority-vote header detection
//! 3. [`category`]: category row detection and type inference
//! 4. [`series`]: series index resolution
//! 5. [`aggregate`]: optional grouping of duplicate categories
//!
//! [`get_output`] then assembles the typed chart data from the final context.

pub mod aggregate;
pub mod category;
pub mod direction;
pub mod header;
pub mod series;

use crate::cell::ChartDataSource;
use crate::data::{
    Category, CategoryType, ChartData, ChartDataConfig, ChartDataContext, DataItem, Series,
    SeriesItem, category_key,
};

pub type DataOperatorFn = fn(context: &mut ChartDataContext);

#[derive(Debug, Clone)]
pub struct DataOperator {
    pub id: &'static str,
    pub apply: DataOperatorFn,
}

#[derive(Debug, Clone)]
pub struct DataPipeline {
    operators: Vec<DataOperator>,
}

impl Default for DataPipeline {
    fn default() -> Self {
        Self::canonical()
    }
}

impl DataPipeline {
    /// A pipeline without operators.
    pub fn empty() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    pub fn canonical() -> Self {
        let mut pipeline = Self::empty();

        // The order is significant: every operator reads what the previous ones resolved.
        pipeline.add_fn("direction", direction::apply_direction);
        pipeline.add_fn("header", header::detect_headers);
        pipeline.add_fn("category", category::detect_category);
        pipeline.add_fn("series", series::resolve_series);
        pipeline.add_fn("aggregate", aggregate::aggregate_categories);

        pipeline
    }

    pub fn add(&mut self, operator: DataOperator) {
        self.operators.push(operator);
    }

    pub fn add_fn(&mut self, id: &'static str, apply: DataOperatorFn) {
        self.add(DataOperator { id, apply });
    }

    pub fn operator_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operators.iter().map(|op| op.id)
    }

    pub fn build_context(
        &self,
        data_source: ChartDataSource,
        data_config: ChartDataConfig,
    ) -> ChartDataContext {
        let mut context = ChartDataContext {
            data_source,
            data_config,
        };
        for op in &self.operators {
            (op.apply)(&mut context);
        }
        tracing::debug!(
            rows = context.data_source.len(),
            category = ?context.data_config.category_index,
            series = ?context.data_config.series_indexes,
            "data pipeline finished"
        );
        context
    }

    /// Runs the operators and assembles the output in one step.
    pub fn run(&self, data_source: ChartDataSource, data_config: ChartDataConfig) -> ChartData {
        get_output(&self.build_context(data_source, data_config))
    }
}

/// Runs the canonical pipeline.
pub fn build_context(data_source: ChartDataSource, data_config: ChartDataConfig) -> ChartDataContext {
    DataPipeline::canonical().build_context(data_source, data_config)
}

/// Assembles category and series from a finished context.
///
/// Every series gets exactly as many items as the category (or, without a category, as the
/// longest series row); missing cells become empty items.
pub fn get_output(context: &ChartDataContext) -> ChartData {
    let config = &context.data_config;
    let source = &context.data_source;

    let category = config
        .category_index
        .and_then(|index| source.get(index).map(|row| (index, row)))
        .map(|(index, row)| {
            let items: Vec<DataItem> = row
                .iter()
                .map(|value| DataItem {
                    value: value.clone(),
                    label: value.display(),
                })
                .collect();
            let keys = items
                .iter()
                .enumerate()
                .map(|(position, item)| category_key(position, &item.label))
                .collect();
            Category {
                index,
                name: header_name(config, index).unwrap_or_else(|| "Category".to_string()),
                category_type: config.category_type.unwrap_or(CategoryType::Text),
                items,
                keys,
            }
        });

    let series_rows: Vec<usize> = config
        .series_indexes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .copied()
        .filter(|index| *index < source.len())
        .collect();

    let width = match &category {
        Some(category) => category.items.len(),
        None => series_rows
            .iter()
            .map(|index| source[*index].len())
            .max()
            .unwrap_or(0),
    };

    let series = series_rows
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let row = &source[index];
            let items = (0..width)
                .map(|item| {
                    let cell = row.get(item).cloned().unwrap_or_default();
                    SeriesItem {
                        value: cell.as_number(),
                        label: cell.display(),
                    }
                })
                .collect();
            Series {
                index,
                name: header_name(config, index)
                    .unwrap_or_else(|| format!("Series {}", position + 1)),
                items,
            }
        })
        .collect();

    ChartData { category, series }
}

fn header_name(config: &ChartDataConfig, index: usize) -> Option<String> {
    config
        .headers
        .as_ref()?
        .get(index)
        .filter(|name| !name.trim().is_empty())
        .cloned()
}

use crate::cell::CellValue;
use crate::data::{CategoryType, ChartDataContext};
use indexmap::IndexMap;

/// Collapses duplicate text categories, summing every other row per group.
///
/// Groups keep the order in which their label first appears. Cells that are not numeric count
/// as zero. Runs only when aggregation is enabled and the category is text.
pub fn aggregate_categories(context: &mut ChartDataContext) {
    let config = &context.data_config;
    if !config.aggregate || config.category_type != Some(CategoryType::Text) {
        return;
    }
    let Some(category_index) = config.category_index else {
        return;
    };
    let Some(category_row) = context.data_source.get(category_index) else {
        return;
    };

    let mut groups: IndexMap<String, (CellValue, Vec<usize>)> = IndexMap::new();
    for (position, cell) in category_row.iter().enumerate() {
        groups
            .entry(cell.display())
            .or_insert_with(|| (cell.clone(), Vec::new()))
            .1
            .push(position);
    }

    if groups.len() == category_row.len() {
        return;
    }
    tracing::debug!(
        items = category_row.len(),
        groups = groups.len(),
        "aggregating duplicate categories"
    );

    for (index, row) in context.data_source.iter_mut().enumerate() {
        *row = if index == category_index {
            groups.values().map(|(first, _)| first.clone()).collect()
        } else {
            groups
                .values()
                .map(|(_, positions)| {
                    let sum = positions
                        .iter()
                        .map(|p| row.get(*p).and_then(CellValue::as_number).unwrap_or(0.0))
                        .sum();
                    CellValue::Number(sum)
                })
                .collect()
        };
    }
}

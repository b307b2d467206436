use crate::cell::ChartDataSource;
use crate::data::{ChartDataContext, Direction};

/// Transposes column-oriented sources so every sequence becomes a row.
pub fn apply_direction(context: &mut ChartDataContext) {
    if context.data_config.direction == Direction::Column {
        context.data_source = transpose(&context.data_source);
    }
}

/// Swaps rows and columns.
///
/// The input is treated as rectangular: the first row defines the column count, cells missing
/// from shorter rows become empty and cells beyond it are dropped.
pub fn transpose(source: &ChartDataSource) -> ChartDataSource {
    let Some(first) = source.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|column| {
            source
                .iter()
                .map(|row| row.get(column).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}

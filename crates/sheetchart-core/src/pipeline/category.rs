use crate::cell::CellValue;
use crate::data::{CategoryType, ChartDataContext};

/// Picks the category row and infers its type.
///
/// A configured category index is kept and only its type is inferred. Otherwise the row with the
/// most text cells becomes the category; ties go to the lowest index and rows without any text
/// never qualify, so purely numeric data has no category.
pub fn detect_category(context: &mut ChartDataContext) {
    let source = &context.data_source;
    let config = &mut context.data_config;

    if config.category_index.is_none() {
        let mut best: Option<usize> = None;
        let mut best_count = 0usize;
        for (index, row) in source.iter().enumerate() {
            let count = row.iter().filter(|cell| cell.is_text()).count();
            if count > best_count {
                best = Some(index);
                best_count = count;
            }
        }
        config.category_index = best;
    }

    let Some(row) = config.category_index.and_then(|index| source.get(index)) else {
        tracing::debug!("no category row");
        config.category_type = None;
        return;
    };

    if config.category_type.is_none() {
        config.category_type = Some(infer_category_type(row));
    }
}

pub fn infer_category_type(row: &[CellValue]) -> CategoryType {
    if row.iter().any(CellValue::is_text) {
        CategoryType::Text
    } else {
        CategoryType::Linear
    }
}

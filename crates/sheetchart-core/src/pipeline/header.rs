use crate::cell::CellValue;
use crate::data::ChartDataContext;

/// Detects a header cell at the start of every row.
///
/// The first cell of each row is a header candidate. When text candidates are not outnumbered by
/// numeric ones (blank candidates count for neither), the candidates become the headers and are
/// removed from their rows. This is a majority vote, not a guarantee: a numeric first column
/// that is meant as a header is left in place, and a text first column that is meant as data is
/// taken as headers.
///
/// With headers already configured the first cells are stripped without voting; configured names
/// win over the cell text position by position.
pub fn detect_headers(context: &mut ChartDataContext) {
    let source = &mut context.data_source;
    if source.is_empty() {
        return;
    }

    if let Some(configured) = context.data_config.headers.take() {
        let headers = source
            .iter_mut()
            .enumerate()
            .map(|(index, row)| {
                let cell = take_first(row);
                configured
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| cell.display())
            })
            .collect();
        context.data_config.headers = Some(headers);
        return;
    }

    let mut text_count = 0usize;
    let mut number_count = 0usize;
    for row in source.iter() {
        match row.first() {
            Some(CellValue::Text(_)) => text_count += 1,
            Some(CellValue::Number(_)) => number_count += 1,
            _ => {}
        }
    }

    if text_count < number_count {
        tracing::debug!(text_count, number_count, "no header column detected");
        return;
    }

    let headers = source
        .iter_mut()
        .map(|row| take_first(row).display())
        .collect();
    context.data_config.headers = Some(headers);
}

fn take_first(row: &mut Vec<CellValue>) -> CellValue {
    if row.is_empty() {
        CellValue::Empty
    } else {
        row.remove(0)
    }
}

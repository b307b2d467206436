use crate::data::ChartDataContext;
use rustc_hash::FxHashSet;

/// Resolves which rows are plotted as series.
///
/// Every row other than the category row is a candidate. A configured list is filtered to the
/// candidates and keeps its own order; without one, all candidates are used in source order.
pub fn resolve_series(context: &mut ChartDataContext) {
    let rows = context.data_source.len();
    let category = context.data_config.category_index;
    let is_candidate = |index: usize| index < rows && Some(index) != category;

    let resolved = match context.data_config.series_indexes.take() {
        Some(configured) => {
            let mut seen = FxHashSet::default();
            configured
                .into_iter()
                .filter(|index| is_candidate(*index) && seen.insert(*index))
                .collect()
        }
        None => (0..rows).filter(|index| is_candidate(*index)).collect(),
    };

    context.data_config.series_indexes = Some(resolved);
}

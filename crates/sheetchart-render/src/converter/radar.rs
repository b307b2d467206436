use crate::settings::RenderSettings;
use crate::spec::{CATEGORY_FIELD, RenderSpec, SERIES_FIELD, VALUE_FIELD};
use serde_json::{Value, json};
use sheetchart_core::{ChartConfig, ChartStyle};

/// One radar series per data series; the indicators are the category labels.
pub fn convert_radar(
    config: &ChartConfig,
    _style: &ChartStyle,
    _settings: &RenderSettings,
) -> RenderSpec {
    let data = &config.data;
    let indicator: Vec<Value> = (0..data.item_count())
        .map(|position| json!({ "name": data.category_label(position) }))
        .collect();

    let series: Vec<Value> = data
        .series
        .iter()
        .map(|series| {
            let id = format!("radar-{}", series.index);
            let values: Vec<Value> = series
                .items
                .iter()
                .enumerate()
                .map(|(position, item)| {
                    json!({
                        CATEGORY_FIELD: data.category_label(position),
                        VALUE_FIELD: item.value,
                        SERIES_FIELD: series.name,
                        "key": data.category_key(position),
                        "seriesIndex": series.index,
                    })
                })
                .collect();
            json!({
                "id": id,
                "type": "radar",
                "data": { "id": id, "values": values },
                "categoryField": CATEGORY_FIELD,
                "valueField": VALUE_FIELD,
                "seriesField": SERIES_FIELD,
                "seriesIndexes": [series.index],
            })
        })
        .collect();

    RenderSpec::from_value(json!({
        "type": "radar",
        "indicator": indicator,
        "series": series,
        "axes": [
            { "id": "angle", "orient": "angle", "type": "band" },
            { "id": "radius", "orient": "radius", "type": "linear" }
        ],
    }))
}

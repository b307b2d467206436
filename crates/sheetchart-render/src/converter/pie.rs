use crate::settings::RenderSettings;
use crate::spec::{CATEGORY_FIELD, RenderSpec, VALUE_FIELD};
use serde_json::{Value, json};
use sheetchart_core::{ChartConfig, ChartStyle};

/// One pie series from the first data series, one sector per category item.
pub fn convert_pie(config: &ChartConfig, _style: &ChartStyle, _settings: &RenderSettings) -> RenderSpec {
    let data = &config.data;
    let series: Vec<Value> = data
        .series
        .first()
        .map(|first| {
            let values: Vec<Value> = first
                .items
                .iter()
                .enumerate()
                .map(|(position, item)| {
                    json!({
                        CATEGORY_FIELD: data.category_label(position),
                        VALUE_FIELD: item.value,
                        "key": data.category_key(position),
                        "seriesIndex": first.index,
                    })
                })
                .collect();
            json!({
                "id": "pie",
                "type": "pie",
                "data": { "id": "pie", "values": values },
                "categoryField": CATEGORY_FIELD,
                "valueField": VALUE_FIELD,
                "seriesName": first.name,
                "seriesIndexes": [first.index],
            })
        })
        .into_iter()
        .collect();

    RenderSpec::from_value(json!({
        "type": "pie",
        "series": series,
    }))
}

//! Cartesian and combination charts.
//!
//! Every data series resolves a sub type (its own chart type for plain cartesian charts, the
//! per-series override or the positional default for combination charts) and a value-axis side.
//! Series sharing both are drawn by one renderer series, distinguished by `seriesField`.

use crate::settings::RenderSettings;
use crate::spec::{RenderSpec, SERIES_FIELD, X_FIELD, Y_FIELD};
use indexmap::IndexMap;
use serde_json::{Value, json};
use sheetchart_core::chart_type::{self, ChartTypeBits};
use sheetchart_core::{CategoryType, ChartConfig, ChartData, ChartStyle, Series};

pub const CATEGORY_AXIS_ID: &str = "category";

/// Which value axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSide {
    Left,
    Right,
}

impl AxisSide {
    pub fn axis_id(self) -> &'static str {
        match self {
            Self::Left => "value-left",
            Self::Right => "value-right",
        }
    }

    fn orient(self, horizontal: bool) -> &'static str {
        match (self, horizontal) {
            (Self::Left, false) => "left",
            (Self::Right, false) => "right",
            (Self::Left, true) => "bottom",
            (Self::Right, true) => "top",
        }
    }
}

/// A data series with its resolved sub type and axis side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSeries {
    /// Source index of the data series.
    pub index: usize,
    pub sub_type: ChartTypeBits,
    pub side: AxisSide,
}

/// Resolves the sub type and side of every plotted series, dropping those without a cartesian
/// sub type.
pub fn resolve_series(
    config: &ChartConfig,
    style: &ChartStyle,
    settings: &RenderSettings,
) -> Vec<ResolvedSeries> {
    let combination = config.chart_type.base_on(ChartTypeBits::COMBINATION);
    config
        .data
        .series
        .iter()
        .enumerate()
        .filter_map(|(position, series)| {
            let series_style = style.series_style(series.index);
            let sub_type = if combination {
                series_style
                    .chart_type
                    .unwrap_or_else(|| settings.combination.for_position(position))
            } else {
                config.chart_type
            };
            let sub_type = chart_type::base_type(sub_type);
            if sub_type.is_none() || !chart_type::is_cartesian(sub_type) {
                tracing::debug!(series = series.index, %sub_type, "series has no cartesian sub type; skipped");
                return None;
            }
            let side = if series_style.right_y_axis == Some(true) {
                AxisSide::Right
            } else {
                AxisSide::Left
            };
            Some(ResolvedSeries {
                index: series.index,
                sub_type,
                side,
            })
        })
        .collect()
}

pub fn convert_cartesian(
    config: &ChartConfig,
    style: &ChartStyle,
    settings: &RenderSettings,
) -> RenderSpec {
    let horizontal = config.chart_type.has(ChartTypeBits::HORIZONTAL);
    build(config, style, settings, horizontal)
}

/// Combination charts are always vertical.
pub fn convert_combination(
    config: &ChartConfig,
    style: &ChartStyle,
    settings: &RenderSettings,
) -> RenderSpec {
    build(config, style, settings, false)
}

#[derive(Default)]
struct Bucket {
    series_indexes: Vec<usize>,
    values: Vec<Value>,
}

fn build(
    config: &ChartConfig,
    style: &ChartStyle,
    settings: &RenderSettings,
    horizontal: bool,
) -> RenderSpec {
    let data = &config.data;
    let resolved = resolve_series(config, style, settings);

    let mut buckets: IndexMap<(ChartTypeBits, AxisSide), Bucket> = IndexMap::new();
    for entry in &resolved {
        let Some(series) = data.series.iter().find(|s| s.index == entry.index) else {
            continue;
        };
        let bucket = buckets.entry((entry.sub_type, entry.side)).or_default();
        bucket.series_indexes.push(series.index);
        bucket.values.extend(datums(data, series));
    }

    let mut series_specs = Vec::with_capacity(buckets.len());
    let mut sides: IndexMap<AxisSide, Vec<String>> = IndexMap::new();
    for ((sub_type, side), bucket) in buckets {
        let type_name = chart_type::to_render_string(sub_type).unwrap_or("line");
        let id = format!("{type_name}-{}", side.axis_id());
        sides.entry(side).or_default().push(id.clone());

        let category_field = if sub_type == ChartTypeBits::COLUMN {
            json!([X_FIELD, SERIES_FIELD])
        } else {
            json!(X_FIELD)
        };
        let (x_field, y_field) = if horizontal {
            (json!(Y_FIELD), category_field)
        } else {
            (category_field, json!(Y_FIELD))
        };

        let mut spec = json!({
            "id": id,
            "type": type_name,
            "data": { "id": id, "values": bucket.values },
            "xField": x_field,
            "yField": y_field,
            "seriesField": SERIES_FIELD,
            "seriesIndexes": bucket.series_indexes,
            "valueAxisId": side.axis_id(),
        });
        if horizontal {
            spec["direction"] = json!("horizontal");
        }
        series_specs.push(spec);
    }

    if sides.is_empty() {
        sides.insert(AxisSide::Left, Vec::new());
    }

    let category_linear = data
        .category
        .as_ref()
        .is_some_and(|c| c.category_type == CategoryType::Linear);
    let mut axes = vec![json!({
        "id": CATEGORY_AXIS_ID,
        "role": "category",
        "orient": if horizontal { "left" } else { "bottom" },
        "type": if category_linear { "linear" } else { "band" },
    })];
    for (side, series_ids) in sides {
        axes.push(json!({
            "id": side.axis_id(),
            "role": "value",
            "orient": side.orient(horizontal),
            "type": "linear",
            "seriesId": series_ids,
        }));
    }

    RenderSpec::from_value(json!({
        "type": chart_type::to_render_string(config.chart_type).unwrap_or("common"),
        "series": series_specs,
        "axes": axes,
    }))
}

fn datums<'a>(data: &'a ChartData, series: &'a Series) -> impl Iterator<Item = Value> + 'a {
    let linear = data
        .category
        .as_ref()
        .is_some_and(|c| c.category_type == CategoryType::Linear);
    series.items.iter().enumerate().map(move |(position, item)| {
        let x = match data.category.as_ref().and_then(|c| c.items.get(position)) {
            Some(category) if linear => category
                .value
                .as_number()
                .map(Value::from)
                .unwrap_or_else(|| Value::from(category.label.clone())),
            _ => Value::from(data.category_label(position)),
        };
        json!({
            X_FIELD: x,
            Y_FIELD: item.value,
            SERIES_FIELD: series.name,
            "seriesIndex": series.index,
            "key": data.category_key(position),
        })
    })
}

//! Per-series styling and data labels.
//!
//! A renderer series may draw several data series (one per `seriesField` value). Each of them
//! gets an entry in the renderer series' `seriesStyles`, resolved with
//! [`ChartStyle::series_style`] so the all-series fallback and the per-series override are
//! combined in one place.

use super::stack::RAW_Y_FIELD;
use super::{OperatorContext, insert_some, label_formatter};
use crate::spec::{
    CATEGORY_FIELD, RenderSpec, SERIES_FIELD, VALUE_FIELD, X_FIELD, Y_FIELD, series_indexes,
};
use serde_json::{Map, Value, json};
use sheetchart_core::style::{
    BorderStyle, DashType, DataLabelStyle, LabelContentType, LabelPosition, PointShape, PointStyle,
};
use sheetchart_core::ChartStyle;

pub(crate) fn dash_array(dash: DashType) -> Value {
    match dash {
        DashType::Solid => json!([]),
        DashType::Dash => json!([4, 4]),
        DashType::Dot => json!([1, 3]),
    }
}

pub(crate) fn label_position(position: LabelPosition) -> &'static str {
    match position {
        LabelPosition::Inside => "inside",
        LabelPosition::Outside => "outside",
        LabelPosition::Top => "top",
        LabelPosition::Bottom => "bottom",
        LabelPosition::Left => "left",
        LabelPosition::Right => "right",
        LabelPosition::Center => "center",
    }
}

fn point_shape(shape: PointShape) -> &'static str {
    match shape {
        PointShape::Circle => "circle",
        PointShape::Square => "square",
        PointShape::Triangle => "triangle",
        PointShape::Diamond => "diamond",
        PointShape::Cross => "cross",
    }
}

fn border_block(entry: &mut Map<String, Value>, border: &BorderStyle) {
    insert_some(entry, "stroke", border.color.as_deref());
    insert_some(entry, "lineWidth", border.width);
    insert_some(entry, "strokeOpacity", border.opacity);
    if let Some(dash) = border.dash_type {
        entry.insert("lineDash".into(), dash_array(dash));
    }
}

fn point_block(point: &PointStyle) -> Map<String, Value> {
    let mut block = Map::new();
    insert_some(&mut block, "shape", point.shape.map(point_shape));
    insert_some(&mut block, "size", point.size);
    insert_some(&mut block, "fill", point.color.as_deref());
    block
}

/// Datum field names of a renderer series.
struct Fields {
    category: &'static str,
    value: &'static str,
    percent: bool,
}

impl Fields {
    fn of(series: &Value) -> Self {
        let cartesian = series.get("categoryField").is_none();
        let percent = series.get("percent").and_then(Value::as_bool) == Some(true);
        Self {
            category: if cartesian { X_FIELD } else { CATEGORY_FIELD },
            value: match (cartesian, percent) {
                (true, true) => RAW_Y_FIELD,
                (true, false) => Y_FIELD,
                (false, _) => VALUE_FIELD,
            },
            percent,
        }
    }
}

pub(crate) fn data_label_block(
    label: &DataLabelStyle,
    formatter: String,
    default_size: f64,
) -> Map<String, Value> {
    let mut block = Map::new();
    block.insert("visible".into(), Value::Bool(label.visible.unwrap_or(false)));
    insert_some(&mut block, "position", label.position.map(label_position));
    block.insert("formatter".into(), Value::from(formatter));
    let mut style = Map::new();
    style.insert(
        "fontSize".into(),
        Value::from(label.font_size.unwrap_or(default_size)),
    );
    insert_some(&mut style, "fill", label.color.as_deref());
    insert_some(&mut style, "fontWeight", super::font_weight(label.bold));
    block.insert("style".into(), Value::Object(style));
    block
}

fn series_entry(
    style: &ChartStyle,
    index: usize,
    name: Option<&str>,
    fields: &Fields,
    font_size: f64,
) -> Value {
    let resolved = style.series_style(index);
    let mut entry = Map::new();
    entry.insert("seriesIndex".into(), Value::from(index));
    insert_some(&mut entry, "seriesName", name);
    insert_some(&mut entry, "color", resolved.color.as_deref());
    insert_some(&mut entry, "fillOpacity", resolved.fill_opacity);
    insert_some(&mut entry, "smooth", resolved.smooth);
    if let Some(border) = &resolved.border {
        border_block(&mut entry, border);
    }
    if let Some(point) = &resolved.point {
        entry.insert("point".into(), Value::Object(point_block(point)));
    }
    if let Some(label) = &resolved.label {
        let content = label.content_type.unwrap_or(LabelContentType::VALUE);
        let percent_token = if fields.percent { Y_FIELD } else { "percent" };
        let formatter = label_formatter(
            content,
            fields.category,
            Some(SERIES_FIELD),
            fields.value,
            percent_token,
        );
        entry.insert(
            "label".into(),
            Value::Object(data_label_block(label, formatter, font_size)),
        );
    }
    Value::Object(entry)
}

pub fn apply_series_style(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let font_size = super::base_font_size(&spec, ctx);
    let data = &ctx.config.data;
    for series in spec.series_mut() {
        // Pie sectors are styled by the pie operator and the theme.
        if series.get("type").and_then(Value::as_str) == Some("pie") {
            continue;
        }
        let fields = Fields::of(series);
        let entries: Vec<Value> = series_indexes(series)
            .into_iter()
            .map(|index| {
                let name = data
                    .series
                    .iter()
                    .find(|s| s.index == index)
                    .map(|s| s.name.as_str());
                series_entry(ctx.style, index, name, &fields, font_size)
            })
            .collect();
        if let Some(series) = series.as_object_mut() {
            series.insert("seriesStyles".into(), Value::Array(entries));
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::cartesian::convert_cartesian;
    use crate::operators::stack::apply_stack;
    use crate::settings::RenderSettings;
    use sheetchart_core::style::SeriesStyle;
    use sheetchart_core::{
        ChartConfig, ChartDataConfig, ChartDataSource, ChartTypeBits, build_context, get_output,
    };

    fn config(chart_type: ChartTypeBits) -> ChartConfig {
        let source: ChartDataSource =
            serde_json::from_value(json!([["", "c0", "c1"], ["A", 10, 30], ["B", 10, 10]]))
                .unwrap();
        ChartConfig::new(
            chart_type,
            get_output(&build_context(source, ChartDataConfig::default())),
        )
    }

    #[test]
    fn per_series_overrides_win_over_the_fallback() {
        let config = config(ChartTypeBits::LINE);
        let mut style = ChartStyle {
            all_series_style: Some(SeriesStyle {
                color: Some("#111".into()),
                smooth: Some(true),
                border: Some(BorderStyle {
                    width: Some(2.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        style.set_series_style(
            2,
            SeriesStyle {
                color: Some("#222".into()),
                border: Some(BorderStyle {
                    dash_type: Some(DashType::Dash),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = apply_series_style(convert_cartesian(&config, &style, &settings), &ctx);
        let styles = spec.series()[0]["seriesStyles"].as_array().unwrap();
        assert_eq!(
            styles[0],
            json!({ "seriesIndex": 1, "seriesName": "A", "color": "#111", "smooth": true, "lineWidth": 2.0 })
        );
        assert_eq!(
            styles[1],
            json!({
                "seriesIndex": 2,
                "seriesName": "B",
                "color": "#222",
                "smooth": true,
                "lineWidth": 2.0,
                "lineDash": [4, 4]
            })
        );
    }

    #[test]
    fn percent_labels_format_from_raw_values() {
        let config = config(ChartTypeBits::COLUMN_PERCENT_STACKED);
        let style = ChartStyle {
            all_series_style: Some(SeriesStyle {
                label: Some(DataLabelStyle {
                    visible: Some(true),
                    content_type: Some(LabelContentType::VALUE | LabelContentType::PERCENTAGE),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = convert_cartesian(&config, &style, &settings);
        let spec = apply_series_style(apply_stack(spec, &ctx), &ctx);
        let label = &spec.series()[0]["seriesStyles"][0]["label"];
        assert_eq!(label["visible"], json!(true));
        assert_eq!(label["formatter"], json!("{rawY} {y}%"));
    }
}

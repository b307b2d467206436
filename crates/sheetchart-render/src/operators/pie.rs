//! Pie and doughnut specifics: radii, padding, half pies, rose pies and sector labels.

use super::series_style::data_label_block;
use super::{OperatorContext, base_font_size, insert_some, label_formatter};
use crate::spec::{CATEGORY_FIELD, RenderSpec, VALUE_FIELD};
use serde_json::{Value, json};
use sheetchart_core::ChartTypeBits;
use sheetchart_core::style::{DataLabelStyle, LabelContentType, LabelPosition, Merge};

pub const OUTER_RADIUS: f64 = 0.8;

pub fn apply_pie(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    if !ctx.config.chart_type.base_on(ChartTypeBits::PIE) {
        return spec;
    }
    let pie = ctx.style.pie.clone().unwrap_or_default();
    let hollow = ctx.config.chart_type.has(ChartTypeBits::HOLLOW);
    let inner_radius = pie
        .doughnut_hole
        .or(hollow.then_some(ctx.settings.doughnut_hole))
        .unwrap_or(0.0)
        .clamp(0.0, OUTER_RADIUS);

    let mut label = DataLabelStyle {
        visible: Some(true),
        position: Some(LabelPosition::Outside),
        content_type: Some(LabelContentType::CATEGORY_NAME | LabelContentType::PERCENTAGE),
        ..Default::default()
    };
    if let Some(user) = &pie.label_style {
        label.merge_from(user);
    }
    let content = label.content_type.unwrap_or(LabelContentType::VALUE);
    let formatter = label_formatter(content, CATEGORY_FIELD, None, VALUE_FIELD, "percent");
    let label_block = data_label_block(&label, formatter, base_font_size(&spec, ctx));

    for series in spec.series_mut() {
        if series.get("type").and_then(Value::as_str) != Some("pie") {
            continue;
        }
        let Some(series) = series.as_object_mut() else {
            continue;
        };
        series.insert("outerRadius".into(), json!(OUTER_RADIUS));
        series.insert("innerRadius".into(), json!(inner_radius));
        if pie.has_padding_angle == Some(true) {
            series.insert("padAngle".into(), json!(ctx.settings.pad_angle));
        }
        if pie.is_half_pie == Some(true) {
            series.insert("startAngle".into(), json!(-180));
            series.insert("endAngle".into(), json!(0));
        }
        if pie.rose_pie == Some(true) {
            series.insert("roseType".into(), json!("radius"));
        }
        if let Some(color) = pie.border_color.as_deref() {
            let mut pie_style = serde_json::Map::new();
            insert_some(&mut pie_style, "stroke", Some(color));
            pie_style.insert("lineWidth".into(), json!(1));
            series.insert("pie".into(), json!({ "style": pie_style }));
        }
        series.insert("label".into(), Value::Object(label_block.clone()));
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::pie::convert_pie;
    use crate::settings::RenderSettings;
    use sheetchart_core::style::PieStyle;
    use sheetchart_core::{
        ChartConfig, ChartDataConfig, ChartDataSource, ChartStyle, build_context, get_output,
    };

    fn run(chart_type: ChartTypeBits, style: &ChartStyle) -> Value {
        let source: ChartDataSource =
            serde_json::from_value(json!([["", "a", "b"], ["s", 1, 3], ["t", 2, 2]])).unwrap();
        let config = ChartConfig::new(
            chart_type,
            get_output(&build_context(source, ChartDataConfig::default())),
        );
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = apply_pie(convert_pie(&config, style, &settings), &ctx);
        spec.series()[0].clone()
    }

    #[test]
    fn doughnut_gets_the_default_hole() {
        let series = run(ChartTypeBits::DOUGHNUT, &ChartStyle::default());
        assert_eq!(series["innerRadius"], json!(0.5));
        assert_eq!(series["outerRadius"], json!(0.8));
        assert_eq!(series["label"]["position"], json!("outside"));
        assert_eq!(series["label"]["formatter"], json!("{category} {percent}%"));

        let plain = run(ChartTypeBits::PIE, &ChartStyle::default());
        assert_eq!(plain["innerRadius"], json!(0.0));
    }

    #[test]
    fn pie_style_toggles() {
        let style = ChartStyle {
            pie: Some(PieStyle {
                doughnut_hole: Some(0.3),
                has_padding_angle: Some(true),
                is_half_pie: Some(true),
                rose_pie: Some(true),
                border_color: Some("#fff".into()),
                label_style: Some(DataLabelStyle {
                    content_type: Some(LabelContentType::VALUE),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };
        let series = run(ChartTypeBits::PIE, &style);
        assert_eq!(series["innerRadius"], json!(0.3));
        assert_eq!(series["padAngle"], json!(1.0));
        assert_eq!(series["startAngle"], json!(-180));
        assert_eq!(series["roseType"], json!("radius"));
        assert_eq!(series["pie"]["style"]["stroke"], json!("#fff"));
        assert_eq!(series["label"]["formatter"], json!("{value}"));
    }

    #[test]
    fn other_charts_are_untouched() {
        let style = ChartStyle::default();
        let config = ChartConfig::new(ChartTypeBits::LINE, Default::default());
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = RenderSpec::from_value(json!({ "series": [{ "type": "pie" }] }));
        assert_eq!(apply_pie(spec.clone(), &ctx), spec);
    }
}

use super::OperatorContext;
use crate::spec::RenderSpec;
use serde_json::{Value, json};
use sheetchart_core::ChartTypeBits;
use sheetchart_core::style::RadarShape;

/// Radar grid shape and area fill.
pub fn apply_radar(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    if !ctx.config.chart_type.base_on(ChartTypeBits::RADAR) {
        return spec;
    }
    let radar = ctx.style.radar.clone().unwrap_or_default();
    let circle = radar.shape == Some(RadarShape::Circle);
    let fill = radar.fill.unwrap_or(false);

    for axis in spec.axes_mut() {
        let Some(axis) = axis.as_object_mut() else {
            continue;
        };
        let grid = crate::spec::object_entry(axis, "grid");
        grid.insert("smooth".into(), Value::Bool(circle));
    }
    for series in spec.series_mut() {
        if series.get("type").and_then(Value::as_str) != Some("radar") {
            continue;
        }
        series["area"] = json!({ "visible": fill });
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::radar::convert_radar;
    use crate::settings::RenderSettings;
    use sheetchart_core::style::RadarStyle;
    use sheetchart_core::{
        ChartConfig, ChartDataConfig, ChartDataSource, ChartStyle, build_context, get_output,
    };

    #[test]
    fn circle_shape_and_fill() {
        let source: ChartDataSource = serde_json::from_value(json!([
            ["", "speed", "power"],
            ["A", 1, 2],
            ["B", 2, 1]
        ]))
        .unwrap();
        let config = ChartConfig::new(
            ChartTypeBits::RADAR,
            get_output(&build_context(source, ChartDataConfig::default())),
        );
        let style = ChartStyle {
            radar: Some(RadarStyle {
                shape: Some(RadarShape::Circle),
                fill: Some(true),
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
        let spec = apply_radar(convert_radar(&config, &style, &settings), &ctx);
        assert!(spec.axes().iter().all(|a| a["grid"]["smooth"] == json!(true)));
        assert!(spec.series().iter().all(|s| s["area"] == json!({ "visible": true })));
    }
}

use super::{OperatorContext, insert_some, label_text_style};
use crate::spec::RenderSpec;
use serde_json::{Map, Value};
use sheetchart_core::style::{LegendPosition, SelectMode};

fn orient(position: LegendPosition) -> &'static str {
    match position {
        LegendPosition::Top => "top",
        LegendPosition::Bottom | LegendPosition::Hide => "bottom",
        LegendPosition::Left => "left",
        LegendPosition::Right => "right",
    }
}

pub fn apply_legend(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    if !spec.has_series() {
        return spec;
    }
    let legend = ctx.style.legend.clone().unwrap_or_default();
    let position = legend.position.unwrap_or(LegendPosition::Bottom);

    let mut block = Map::new();
    block.insert("visible".into(), Value::Bool(position != LegendPosition::Hide));
    block.insert("orient".into(), Value::from(orient(position)));
    insert_some(
        &mut block,
        "selectMode",
        legend.select_mode.map(|mode| match mode {
            SelectMode::Single => "single",
            SelectMode::Multiple => "multiple",
        }),
    );
    if let Some(label) = &legend.label {
        let mut item = Map::new();
        item.insert("label".into(), Value::Object(label_text_style(label)));
        block.insert("item".into(), Value::Object(item));
    }
    spec.set("legends", Value::Object(block));
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RenderSettings;
    use serde_json::json;
    use sheetchart_core::style::{LabelStyle, LegendStyle};
    use sheetchart_core::{ChartConfig, ChartStyle, ChartTypeBits};

    fn run(spec: RenderSpec, style: &ChartStyle) -> RenderSpec {
        let config = ChartConfig::new(ChartTypeBits::LINE, Default::default());
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        apply_legend(spec, &ctx)
    }

    #[test]
    fn hidden_legend_keeps_its_block() {
        let style = ChartStyle {
            legend: Some(LegendStyle {
                position: Some(LegendPosition::Hide),
                select_mode: Some(SelectMode::Single),
                label: Some(LabelStyle {
                    color: Some("#333".into()),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };
        let spec = run(RenderSpec::from_value(json!({ "series": [{}] })), &style);
        assert_eq!(
            spec.get("legends"),
            Some(&json!({
                "visible": false,
                "orient": "bottom",
                "selectMode": "single",
                "item": { "label": { "fill": "#333" } }
            }))
        );
    }

    #[test]
    fn specs_without_series_get_no_legend() {
        let spec = run(RenderSpec::empty(), &ChartStyle::default());
        assert!(spec.get("legends").is_none());
    }
}

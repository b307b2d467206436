use super::OperatorContext;
use crate::spec::{RenderSpec, VALUE_FIELD, Y_FIELD, series_values_mut};
use serde_json::{Value, json};
use sheetchart_core::style::InvalidValueType;

/// How empty cells are drawn: as zero, linked over, or as a gap.
///
/// `zero` rewrites empty values in the data itself; `link` and `break` are left to the renderer.
pub fn apply_invalid_value(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    if !spec.has_series() {
        return spec;
    }
    let mode = ctx.style.invalid_value_type.unwrap_or_default();
    let name = match mode {
        InvalidValueType::Zero => "zero",
        InvalidValueType::Link => "link",
        InvalidValueType::Break => "break",
    };
    spec.set("invalidType", json!(name));

    for series in spec.series_mut() {
        if series.is_object() {
            series["invalidType"] = json!(name);
        }
        if mode != InvalidValueType::Zero {
            continue;
        }
        let Some(values) = series_values_mut(series) else {
            continue;
        };
        for datum in values.iter_mut() {
            for field in [Y_FIELD, VALUE_FIELD] {
                if datum.get(field).is_some_and(Value::is_null) {
                    datum[field] = json!(0.0);
                }
            }
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RenderSettings;
    use sheetchart_core::{ChartConfig, ChartStyle, ChartTypeBits};

    fn run(mode: Option<InvalidValueType>) -> RenderSpec {
        let style = ChartStyle {
            invalid_value_type: mode,
            ..Default::default()
        };
        let config = ChartConfig::new(ChartTypeBits::LINE, Default::default());
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = RenderSpec::from_value(json!({
            "series": [{ "data": { "values": [{ "y": null }, { "y": 2.0 }] } }]
        }));
        apply_invalid_value(spec, &ctx)
    }

    #[test]
    fn zero_fills_empty_values() {
        let spec = run(Some(InvalidValueType::Zero));
        assert_eq!(spec.get("invalidType"), Some(&json!("zero")));
        assert_eq!(
            crate::spec::series_values(&spec.series()[0]),
            [json!({ "y": 0.0 }), json!({ "y": 2.0 })]
        );
    }

    #[test]
    fn seriesless_specs_are_left_alone() {
        let style = ChartStyle {
            invalid_value_type: Some(InvalidValueType::Zero),
            ..Default::default()
        };
        let config = ChartConfig::new(ChartTypeBits::NONE, Default::default());
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = apply_invalid_value(RenderSpec::empty(), &ctx);
        assert!(spec.is_empty());
    }

    #[test]
    fn gaps_by_default() {
        let spec = run(None);
        assert_eq!(spec.series()[0]["invalidType"], json!("break"));
        assert_eq!(crate::spec::series_values(&spec.series()[0])[0], json!({ "y": null }));
    }
}

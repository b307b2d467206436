//! Theme palette and series colors.
//!
//! A series without an explicit color takes the palette entry at the ordinal of its data series,
//! so colors stay stable when a combination chart regroups series into different renderer series.

use super::OperatorContext;
use crate::spec::RenderSpec;
use serde_json::{Value, json};

pub fn apply_theme(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let palette = ctx.settings.palette(ctx.style.theme.as_deref());
    if palette.is_empty() || !spec.has_series() {
        return spec;
    }
    spec.set("color", json!(palette));
    if let Some(font_color) = spec.get("fontColor").cloned() {
        spec.object_mut("theme").insert("fontColor".into(), font_color);
    }

    let ordinal = |index: usize| {
        ctx.config
            .data
            .series
            .iter()
            .position(|s| s.index == index)
            .unwrap_or(0)
    };
    let color_at = |position: usize| Value::from(palette[position % palette.len()].as_str());

    for series in spec.series_mut() {
        if series.get("type").and_then(Value::as_str) == Some("pie") {
            // One color per sector.
            series["color"] = json!(palette);
            continue;
        }
        let Some(styles) = series.get_mut("seriesStyles").and_then(Value::as_array_mut) else {
            continue;
        };
        for entry in styles.iter_mut() {
            let Some(entry) = entry.as_object_mut() else {
                continue;
            };
            if entry.contains_key("color") {
                continue;
            }
            let index = entry
                .get("seriesIndex")
                .and_then(Value::as_u64)
                .unwrap_or(0) as usize;
            entry.insert("color".into(), color_at(ordinal(index)));
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RenderSettings;
    use sheetchart_core::data::{ChartData, Series};
    use sheetchart_core::{ChartConfig, ChartStyle, ChartTypeBits};

    fn series(index: usize) -> Series {
        Series {
            index,
            name: format!("s{index}"),
            items: Vec::new(),
        }
    }

    #[test]
    fn seriesless_specs_get_no_palette() {
        let config = ChartConfig::new(ChartTypeBits::NONE, ChartData::default());
        let style = ChartStyle::default();
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = apply_theme(RenderSpec::empty(), &ctx);
        assert!(spec.get("color").is_none());
    }

    #[test]
    fn missing_colors_follow_series_ordinals() {
        let config = ChartConfig::new(
            ChartTypeBits::COMBINATION,
            ChartData {
                category: None,
                series: vec![series(4), series(7), series(9)],
            },
        );
        let style = ChartStyle {
            theme: Some("warm".into()),
            ..Default::default()
        };
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let spec = RenderSpec::from_value(json!({
            "series": [
                { "type": "bar", "seriesStyles": [{ "seriesIndex": 4 }] },
                { "type": "line", "seriesStyles": [{ "seriesIndex": 7, "color": "#000" }, { "seriesIndex": 9 }] }
            ]
        }));
        let spec = apply_theme(spec, &ctx);
        let warm = settings.palette(Some("warm"));
        assert_eq!(spec.get("color"), Some(&json!(warm)));
        assert_eq!(spec.series()[0]["seriesStyles"][0]["color"], json!(warm[0]));
        assert_eq!(spec.series()[1]["seriesStyles"][0]["color"], json!("#000"));
        assert_eq!(spec.series()[1]["seriesStyles"][1]["color"], json!(warm[2]));
    }
}

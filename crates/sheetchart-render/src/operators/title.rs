use super::{OperatorContext, base_font_size, font_style, font_weight, insert_some};
use crate::spec::RenderSpec;
use serde_json::{Map, Value};
use sheetchart_core::style::{Position, TextAlign, TitleStyle};

pub(crate) fn title_text_style(title: &TitleStyle, default_size: f64) -> Map<String, Value> {
    let mut style = Map::new();
    style.insert(
        "fontSize".into(),
        Value::from(title.font_size.unwrap_or(default_size)),
    );
    insert_some(&mut style, "fill", title.color.as_deref());
    insert_some(&mut style, "fontWeight", font_weight(title.bold));
    insert_some(&mut style, "fontStyle", font_style(title.italic));
    style
}

pub(crate) fn title_visible(title: &TitleStyle) -> bool {
    title
        .visible
        .unwrap_or_else(|| title.content.as_deref().is_some_and(|c| !c.trim().is_empty()))
}

/// Chart title and subtitle.
pub fn apply_title(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let style = ctx.style;
    if style.title.is_none() && style.subtitle.is_none() {
        return spec;
    }
    let base = base_font_size(&spec, ctx);
    let title = style.title.clone().unwrap_or_default();

    let block = spec.object_mut("title");
    block.insert("visible".into(), Value::Bool(title_visible(&title)));
    insert_some(block, "text", title.content.as_deref());
    block.insert(
        "textStyle".into(),
        Value::Object(title_text_style(&title, (base * 1.5).round())),
    );
    let align = match title.align.unwrap_or(TextAlign::Center) {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    };
    block.insert("align".into(), Value::from(align));
    let orient = match title.position.unwrap_or(Position::Top) {
        Position::Top => "top",
        Position::Bottom => "bottom",
        Position::Left => "left",
        Position::Right => "right",
    };
    block.insert("orient".into(), Value::from(orient));

    if let Some(subtitle) = &style.subtitle {
        if title_visible(subtitle) {
            insert_some(block, "subtext", subtitle.content.as_deref());
            block.insert(
                "subtextStyle".into(),
                Value::Object(title_text_style(subtitle, base)),
            );
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RenderSettings;
    use serde_json::json;
    use sheetchart_core::{ChartConfig, ChartData, ChartStyle, ChartTypeBits};

    #[test]
    fn title_defaults_scale_with_the_base_font() {
        let style = ChartStyle {
            title: Some(TitleStyle {
                content: Some("Revenue".into()),
                bold: Some(true),
                ..Default::default()
            }),
            subtitle: Some(TitleStyle {
                content: Some("2024".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = ChartConfig::new(ChartTypeBits::LINE, ChartData::default());
        let settings = RenderSettings::default();
        let ctx = OperatorContext {
            style: &style,
            config: &config,
            settings: &settings,
            instance: None,
        };
        let mut spec = RenderSpec::empty();
        spec.set("fontSize", json!(12.0));
        let spec = apply_title(spec, &ctx);
        assert_eq!(
            spec.get("title"),
            Some(&json!({
                "visible": true,
                "text": "Revenue",
                "textStyle": { "fontSize": 18.0, "fontWeight": "bold" },
                "align": "center",
                "orient": "top",
                "subtext": "2024",
                "subtextStyle": { "fontSize": 12.0 }
            }))
        );
    }

    #[test]
    fn blank_titles_are_hidden() {
        assert!(!title_visible(&TitleStyle {
            content: Some("  ".into()),
            ..Default::default()
        }));
    }
}

use super::OperatorContext;
use crate::spec::RenderSpec;
use serde_json::Value;

/// Chart-wide font defaults; later operators size their text relative to `fontSize`.
pub fn apply_font(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let size = ctx
        .style
        .font_size
        .filter(|s| *s > 0.0)
        .unwrap_or(ctx.settings.font_size);
    let color = ctx
        .style
        .font_color
        .clone()
        .unwrap_or_else(|| ctx.settings.font_color.clone());
    spec.set("fontSize", Value::from(size));
    spec.set("fontColor", Value::from(color));
    spec
}

use super::{OperatorContext, insert_some};
use crate::spec::RenderSpec;
use serde_json::Value;

/// Chart size and background.
pub fn apply_box(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let style = ctx.style;
    if let Some(width) = style.width.filter(|w| *w > 0.0) {
        spec.set("width", Value::from(width));
    }
    if let Some(height) = style.height.filter(|h| *h > 0.0) {
        spec.set("height", Value::from(height));
    }
    if let Some(color) = style.background_color.as_deref() {
        let background = spec.object_mut("background");
        background.insert("visible".into(), Value::Bool(true));
        insert_some(background, "fill", Some(color));
    }
    spec
}

use super::{OperatorContext, insert_some};
use crate::spec::RenderSpec;
use serde_json::Value;

/// Outer chart border. A zero width hides it.
pub fn apply_border(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let style = ctx.style;
    if style.border_color.is_none() && style.border_width.is_none() {
        return spec;
    }
    let width = style.border_width.unwrap_or(1.0);
    let border = spec.object_mut("border");
    border.insert("visible".into(), Value::Bool(width > 0.0));
    insert_some(border, "stroke", style.border_color.as_deref());
    border.insert("lineWidth".into(), Value::from(width));
    spec
}

//! Style operators: the ordered chain that turns an unstyled render spec into the final one.
//!
//! Every operator is a function `(spec, context) -> spec`. Operators run one after another on the
//! same spec, so later ones observe what earlier ones wrote, but no operator reads keys that only
//! a later one sets. The order is fixed by [`OperatorStage`]:
//!
//! ```text
//! Stack -> Box -> FontSize -> Border -> Title -> SeriesStyle -> Legend -> Axes
//!       -> ChartSpecific -> InvalidValue -> Theme
//! ```
//!
//! Stacking runs first because it rewrites values that label and axis formatting read. Within a
//! stage, operators run in registration order.

pub mod axes;
pub mod border;
pub mod chart_box;
pub mod font;
pub mod invalid_value;
pub mod legend;
pub mod pie;
pub mod radar;
pub mod series_style;
pub mod stack;
pub mod theme;
pub mod title;

use crate::settings::RenderSettings;
use crate::spec::RenderSpec;
use serde::Serialize;
use serde_json::{Map, Value};
use sheetchart_core::style::{LabelContentType, LabelStyle};
use sheetchart_core::{ChartConfig, ChartStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperatorStage {
    Stack,
    Box,
    FontSize,
    Border,
    Title,
    SeriesStyle,
    Legend,
    Axes,
    ChartSpecific,
    InvalidValue,
    Theme,
}

impl OperatorStage {
    pub const ALL: [OperatorStage; 11] = [
        Self::Stack,
        Self::Box,
        Self::FontSize,
        Self::Border,
        Self::Title,
        Self::SeriesStyle,
        Self::Legend,
        Self::Axes,
        Self::ChartSpecific,
        Self::InvalidValue,
        Self::Theme,
    ];
}

/// The render target a spec is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInstance {
    pub chart_id: String,
    pub engine: String,
}

/// Everything an operator may read besides the spec itself.
#[derive(Debug, Clone, Copy)]
pub struct OperatorContext<'a> {
    pub style: &'a ChartStyle,
    pub config: &'a ChartConfig,
    pub settings: &'a RenderSettings,
    /// `None` when the spec is built headless (no engine attached).
    pub instance: Option<&'a RenderInstance>,
}

pub type SpecOperatorFn = fn(spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec;

#[derive(Debug, Clone)]
pub struct SpecOperator {
    pub stage: OperatorStage,
    pub name: &'static str,
    pub apply: SpecOperatorFn,
}

#[derive(Debug, Clone)]
pub struct OperatorChain {
    operators: Vec<SpecOperator>,
}

impl Default for OperatorChain {
    fn default() -> Self {
        Self::canonical()
    }
}

impl OperatorChain {
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    pub fn canonical() -> Self {
        let mut chain = Self::new();
        chain.add(OperatorStage::Stack, "stack", stack::apply_stack);
        chain.add(OperatorStage::Box, "box", chart_box::apply_box);
        chain.add(OperatorStage::FontSize, "font-size", font::apply_font);
        chain.add(OperatorStage::Border, "border", border::apply_border);
        chain.add(OperatorStage::Title, "title", title::apply_title);
        chain.add(OperatorStage::SeriesStyle, "series-style", series_style::apply_series_style);
        chain.add(OperatorStage::Legend, "legend", legend::apply_legend);
        chain.add(OperatorStage::Axes, "axes", axes::apply_axes);
        chain.add(OperatorStage::ChartSpecific, "pie", pie::apply_pie);
        chain.add(OperatorStage::ChartSpecific, "radar", radar::apply_radar);
        chain.add(OperatorStage::InvalidValue, "invalid-value", invalid_value::apply_invalid_value);
        chain.add(OperatorStage::Theme, "theme", theme::apply_theme);
        chain
    }

    /// Registers an operator at the end of its stage.
    pub fn add(&mut self, stage: OperatorStage, name: &'static str, apply: SpecOperatorFn) {
        self.operators.push(SpecOperator { stage, name, apply });
        // Stable: registration order is kept within a stage.
        self.operators.sort_by_key(|op| op.stage);
    }

    /// Removes every operator called `name`; `true` if one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.operators.len();
        self.operators.retain(|op| op.name != name);
        self.operators.len() < before
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.operators.iter().map(|op| op.name).collect()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn apply(&self, spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
        self.operators
            .iter()
            .fold(spec, |spec, op| (op.apply)(spec, ctx))
    }
}

/// Inserts `key` only when `value` is present.
pub(crate) fn insert_some<T: Serialize>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value.and_then(|v| serde_json::to_value(v).ok()) {
        map.insert(key.to_string(), value);
    }
}

pub(crate) fn font_weight(bold: Option<bool>) -> Option<&'static str> {
    bold.map(|b| if b { "bold" } else { "normal" })
}

pub(crate) fn font_style(italic: Option<bool>) -> Option<&'static str> {
    italic.map(|i| if i { "italic" } else { "normal" })
}

/// Text style block of a label (`{fontSize, fill, fontWeight, fontStyle}`).
pub(crate) fn label_text_style(label: &LabelStyle) -> Map<String, Value> {
    let mut style = Map::new();
    insert_some(&mut style, "fontSize", label.font_size);
    insert_some(&mut style, "fill", label.color.as_deref());
    insert_some(&mut style, "fontWeight", font_weight(label.bold));
    insert_some(&mut style, "fontStyle", font_style(label.italic));
    style
}

/// Base font size written by the font-size operator.
pub(crate) fn base_font_size(spec: &RenderSpec, ctx: &OperatorContext<'_>) -> f64 {
    spec.get("fontSize")
        .and_then(Value::as_f64)
        .unwrap_or(ctx.settings.font_size)
}

/// Label template for `content`, using datum field names.
///
/// `value_field` is the absolute value; percent-stacked series pass their raw field so labels
/// keep showing absolute numbers.
pub(crate) fn label_formatter(
    content: LabelContentType,
    category_field: &str,
    series_field: Option<&str>,
    value_field: &str,
    percent_token: &str,
) -> String {
    let mut parts = Vec::new();
    if content.contains(LabelContentType::CATEGORY_NAME) {
        parts.push(format!("{{{category_field}}}"));
    }
    if let Some(series_field) = series_field.filter(|_| content.contains(LabelContentType::SERIES_NAME)) {
        parts.push(format!("{{{series_field}}}"));
    }
    if content.contains(LabelContentType::VALUE) {
        parts.push(format!("{{{value_field}}}"));
    }
    if content.contains(LabelContentType::PERCENTAGE) {
        parts.push(format!("{{{percent_token}}}%"));
    }
    parts.join(" ")
}

//! Stacking and percent normalization.
//!
//! Plain cartesian charts stack according to their chart-type bits. Combination charts have no
//! stack bits; there the style's `stackType` applies to bar and area series only.
//!
//! In percent mode every value becomes `value / total * 100`, where the total is the sum of
//! absolute values of all percent-stacked series on the same value axis at the same category.
//! The untouched data is kept under the series' `rawData`, and each datum keeps its absolute
//! value under `rawY` for label formatting.

use super::OperatorContext;
use crate::spec::{RenderSpec, X_FIELD, Y_FIELD, object_entry, series_values, series_values_mut};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Value, json};
use sheetchart_core::chart_type::{self, ChartTypeBits, StackMode};

pub const RAW_Y_FIELD: &str = "rawY";

fn stack_mode(series: &Value, ctx: &OperatorContext<'_>) -> Option<StackMode> {
    let kind = series.get("type").and_then(Value::as_str)?;
    if !matches!(kind, "bar" | "line" | "area") {
        return None;
    }
    let chart = ctx.config.chart_type;
    if chart.base_on(ChartTypeBits::COMBINATION) {
        matches!(kind, "bar" | "area")
            .then_some(ctx.style.stack_type)
            .flatten()
    } else {
        chart_type::stack_mode(chart)
    }
}

fn axis_of(series: &Value) -> String {
    series
        .get("valueAxisId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn datum_key(datum: &Value) -> String {
    datum
        .get("key")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn apply_stack(mut spec: RenderSpec, ctx: &OperatorContext<'_>) -> RenderSpec {
    let mut totals: FxHashMap<(String, String), f64> = FxHashMap::default();
    let mut percent_axes: FxHashSet<String> = FxHashSet::default();
    let mut percent_series = Vec::new();

    for (position, series) in spec.series_mut().iter_mut().enumerate() {
        let Some(mode) = stack_mode(series, ctx) else {
            continue;
        };
        series["stack"] = json!(true);

        // Stacked bars must share one band per category, so the series grouping is dropped.
        if series.get("type").and_then(Value::as_str) == Some("bar") {
            let field = if series.get("direction").and_then(Value::as_str) == Some("horizontal") {
                "yField"
            } else {
                "xField"
            };
            series[field] = json!(X_FIELD);
        }

        if mode == StackMode::Percent {
            series["percent"] = json!(true);
            let axis = axis_of(series);
            for datum in series_values(series) {
                if let Some(v) = datum.get(Y_FIELD).and_then(Value::as_f64) {
                    *totals.entry((axis.clone(), datum_key(datum))).or_default() += v.abs();
                }
            }
            percent_axes.insert(axis);
            percent_series.push(position);
        }
    }

    if percent_series.is_empty() {
        return spec;
    }
    tracing::debug!(series = percent_series.len(), "percent-normalizing stacked series");

    for position in percent_series {
        let Some(series) = spec.series_mut().get_mut(position) else {
            continue;
        };
        let axis = axis_of(series);
        let raw = series_values(series).to_vec();
        series["rawData"] = json!({ "values": raw });

        if let Some(values) = series_values_mut(series) {
            for datum in values.iter_mut() {
                let Some(v) = datum.get(Y_FIELD).and_then(Value::as_f64) else {
                    continue;
                };
                let total = totals
                    .get(&(axis.clone(), datum_key(datum)))
                    .copied()
                    .unwrap_or(0.0);
                let percent = if total > 0.0 { v / total * 100.0 } else { 0.0 };
                datum[RAW_Y_FIELD] = json!(v);
                datum[Y_FIELD] = json!(percent);
            }
        }
    }

    for axis in spec.axes_mut() {
        let id = axis.get("id").and_then(Value::as_str).unwrap_or_default();
        if !percent_axes.contains(id) {
            continue;
        }
        axis["min"] = json!(0);
        axis["max"] = json!(100);
        if let Some(axis) = axis.as_object_mut() {
            object_entry(axis, "label").insert("formatter".into(), json!("{label}%"));
        }
    }
    spec.object_mut("tooltip")
        .insert("valueFormatter".into(), json!("{value}%"));

    spec
}

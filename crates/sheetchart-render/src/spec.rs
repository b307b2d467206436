//! The render spec blackboard.
//!
//! A [`RenderSpec`] is the renderer-library-shaped JSON object built by a converter and annotated
//! by the operator chain. Keys are whatever the render engine understands; this module only adds
//! accessors that treat missing `series`/`axes` arrays as empty instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Datum key of the category label.
pub const X_FIELD: &str = "x";
/// Datum key of the numeric value in cartesian series.
pub const Y_FIELD: &str = "y";
/// Datum key of the series name.
pub const SERIES_FIELD: &str = "seriesField";
/// Datum key of the value in pie and radar series.
pub const VALUE_FIELD: &str = "value";
/// Datum key of the category label in pie and radar series.
pub const CATEGORY_FIELD: &str = "category";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderSpec(Value);

impl Default for RenderSpec {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for RenderSpec {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl RenderSpec {
    /// `{}`: the spec of a chart no converter claimed.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Wraps `value`; anything but an object is replaced by `{}`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => Self(value),
            _ => Self::empty(),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_object().is_none_or(Map::is_empty)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.root_mut().insert(key.to_string(), value);
    }

    /// The object under `key`, created (or replacing a non-object) on demand.
    pub fn object_mut(&mut self, key: &str) -> &mut Map<String, Value> {
        object_entry(self.root_mut(), key)
    }

    fn root_mut(&mut self) -> &mut Map<String, Value> {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        match &mut self.0 {
            Value::Object(map) => map,
            _ => unreachable!("root was just made an object"),
        }
    }

    pub fn series(&self) -> &[Value] {
        array(&self.0, "series")
    }

    /// Mutable view of the series; empty (and nothing is inserted) when there are none.
    pub fn series_mut(&mut self) -> &mut [Value] {
        array_mut(&mut self.0, "series")
    }

    pub fn axes(&self) -> &[Value] {
        array(&self.0, "axes")
    }

    pub fn axes_mut(&mut self) -> &mut [Value] {
        array_mut(&mut self.0, "axes")
    }

    /// Whether a converter produced any renderer series.
    pub fn has_series(&self) -> bool {
        !self.series().is_empty()
    }

    /// Renderer type of the chart (`"bar"`, `"common"`, ...).
    pub fn chart_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn array_mut<'a>(value: &'a mut Value, key: &str) -> &'a mut [Value] {
    value
        .get_mut(key)
        .and_then(Value::as_array_mut)
        .map(Vec::as_mut_slice)
        .unwrap_or_default()
}

/// The object under `key` in `map`, created (or replacing a non-object) on demand.
pub fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just made an object"),
    }
}

/// Mutable datum list of a series (`series.data.values`); empty when absent.
pub fn series_values_mut(series: &mut Value) -> Option<&mut Vec<Value>> {
    series
        .get_mut("data")?
        .get_mut("values")?
        .as_array_mut()
}

pub fn series_values(series: &Value) -> &[Value] {
    series
        .get("data")
        .and_then(|data| data.get("values"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Source indexes of the data series a renderer series draws.
pub fn series_indexes(series: &Value) -> Vec<usize> {
    series
        .get("seriesIndexes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|v| usize::try_from(v).ok())
                .collect()
        })
        .unwrap_or_default()
}

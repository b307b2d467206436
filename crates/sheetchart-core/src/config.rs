//! JSON merge shared by the style and settings layers.

use serde_json::Value;

/// Deep-merges `incoming` into `base`.
///
/// Objects merge key by key; every other value (arrays included) replaces the base value. An
/// explicit `null` in `incoming` therefore clears an optional field once deserialized.
pub fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

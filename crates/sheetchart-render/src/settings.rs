//! Render-side defaults: theme palettes, fonts and chart-type fallbacks.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sheetchart_core::ChartTypeBits;
use sheetchart_core::config::deep_merge_value;

pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSettings {
    /// Theme used when the chart style names none (or an unknown one).
    pub default_theme: String,
    /// Color palettes by theme name.
    pub themes: IndexMap<String, Vec<String>>,
    pub font_size: f64,
    pub font_color: String,
    pub combination: CombinationDefaults,
    /// Inner radius ratio of doughnut charts without an explicit hole.
    pub doughnut_hole: f64,
    /// Padding angle (degrees) between pie sectors when padding is on.
    pub pad_angle: f64,
}

/// Sub types of combination-chart series without an explicit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombinationDefaults {
    #[serde(with = "chart_type_name")]
    pub first: ChartTypeBits,
    #[serde(with = "chart_type_name")]
    pub others: ChartTypeBits,
}

impl Default for CombinationDefaults {
    fn default() -> Self {
        Self {
            first: ChartTypeBits::COLUMN,
            others: ChartTypeBits::LINE,
        }
    }
}

impl CombinationDefaults {
    /// Fallback sub type of the series at `position` (0-based, in plot order).
    pub fn for_position(&self, position: usize) -> ChartTypeBits {
        if position == 0 { self.first } else { self.others }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        let mut themes = IndexMap::new();
        themes.insert(
            DEFAULT_THEME.to_string(),
            [
                "#5B8FF9", "#5AD8A6", "#5D7092", "#F6BD16", "#E8684A", "#6DC8EC", "#9270CA",
                "#FF9D4D", "#269A99", "#FF99C3",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        );
        themes.insert(
            "warm".to_string(),
            [
                "#E8684A", "#F6BD16", "#FF9D4D", "#FF99C3", "#9270CA", "#5D7092",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        );
        themes.insert(
            "cool".to_string(),
            [
                "#5B8FF9", "#6DC8EC", "#269A99", "#5AD8A6", "#5D7092", "#9270CA",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        );

        Self {
            default_theme: DEFAULT_THEME.to_string(),
            themes,
            font_size: 12.0,
            font_color: "#1d2129".to_string(),
            combination: CombinationDefaults::default(),
            doughnut_hole: 0.5,
            pad_angle: 1.0,
        }
    }
}

impl RenderSettings {
    /// Defaults with a JSON override deep-merged on top.
    pub fn from_overrides(overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default()).map_err(Error::Settings)?;
        deep_merge_value(&mut base, overrides);
        serde_json::from_value(base).map_err(Error::Settings)
    }

    /// Palette of `theme`, falling back to the default theme.
    pub fn palette(&self, theme: Option<&str>) -> &[String] {
        theme
            .and_then(|name| self.themes.get(name))
            .or_else(|| self.themes.get(&self.default_theme))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Chart types in settings files are written by name (`"column"`), or as raw bits.
mod chart_type_name {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use sheetchart_core::ChartTypeBits;
    use sheetchart_core::chart_type::{from_name, name_of};

    pub fn serialize<S: Serializer>(bits: &ChartTypeBits, serializer: S) -> Result<S::Ok, S::Error> {
        match name_of(*bits) {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_u32(bits.bits()),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Name(String),
        Bits(u32),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChartTypeBits, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Name(name) => {
                from_name(&name).ok_or_else(|| D::Error::custom(format!("unknown chart type: {name}")))
            }
            Raw::Bits(bits) => Ok(ChartTypeBits::from_bits_retain(bits)),
        }
    }
}

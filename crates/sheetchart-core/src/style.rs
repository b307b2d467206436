//! Chart style tree.
//!
//! Every field is optional: a `ChartStyle` is both the full style of a chart and a partial update
//! applied to it. Absent fields are not serialized, so a persisted style only carries what the
//! user actually set.

use crate::chart_type::{ChartTypeBits, StackMode};
use crate::config::deep_merge_value;
use crate::{Error, Result};
use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Field-wise merge where the incoming side wins on present keys.
pub trait Merge {
    fn merge_from(&mut self, other: &Self);
}

macro_rules! impl_merge {
    ($ty:ident { $($field:ident),* $(,)? } $(nested { $($nested:ident),* $(,)? })?) => {
        impl Merge for $ty {
            fn merge_from(&mut self, other: &Self) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )*
                $($(
                    if let Some(incoming) = &other.$nested {
                        match &mut self.$nested {
                            Some(base) => base.merge_from(incoming),
                            None => self.$nested = Some(incoming.clone()),
                        }
                    }
                )*)?
            }
        }
    };
}

bitflags! {
    /// What a data label shows.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LabelContentType: u32 {
        const CATEGORY_NAME = 1 << 0;
        const SERIES_NAME = 1 << 1;
        const VALUE = 1 << 2;
        const PERCENTAGE = 1 << 3;
    }
}

impl Serialize for LabelContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for LabelContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self::from_bits_truncate(u32::deserialize(deserializer)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectMode {
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelPosition {
    Inside,
    Outside,
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TickPosition {
    Inside,
    Outside,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DashType {
    Solid,
    Dash,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RadarShape {
    Polygon,
    Circle,
}

/// How empty numeric cells are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidValueType {
    /// Plot as zero.
    Zero,
    /// Connect the neighbouring points.
    Link,
    /// Leave a gap.
    #[default]
    Break,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
}

impl_merge!(LabelStyle { visible, font_size, color, bold, italic });

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl_merge!(TitleStyle {
    content,
    visible,
    font_size,
    color,
    bold,
    italic,
    align,
    position,
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridLineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

impl_merge!(GridLineStyle { visible, color, width });

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<TickPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl_merge!(TickStyle {
    visible,
    position,
    length,
    width,
    color,
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AxisOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_line: Option<GridLineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<TickStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Number format applied to value labels, e.g. `"0.00"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl_merge!(AxisOptions {
    visible,
    reverse,
    line_visible,
    line_color,
    line_width,
    min,
    max,
    format,
} nested {
    label,
    grid_line,
    tick,
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_mode: Option<SelectMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelStyle>,
}

impl_merge!(LegendStyle { position, select_mode } nested { label });

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_type: Option<DashType>,
}

impl_merge!(BorderStyle {
    color,
    width,
    opacity,
    dash_type,
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<PointShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl_merge!(PointStyle { shape, size, color });

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataLabelStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LabelPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<LabelContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
}

impl_merge!(DataLabelStyle {
    visible,
    position,
    content_type,
    font_size,
    color,
    bold,
});

/// Style of one series, or of all series when used as the fallback.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesStyle {
    /// Sub type of this series in a combination chart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartTypeBits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_y_axis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<PointStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<DataLabelStyle>,
}

impl_merge!(SeriesStyle {
    chart_type,
    right_y_axis,
    color,
    fill_opacity,
    smooth,
} nested {
    border,
    point,
    label,
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PieStyle {
    /// Inner radius ratio in `0..1`; only drawn for doughnut charts unless set explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doughnut_hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_padding_angle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_half_pie: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rose_pie: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_style: Option<DataLabelStyle>,
}

impl_merge!(PieStyle {
    doughnut_hole,
    has_padding_angle,
    is_half_pie,
    rose_pie,
    border_color,
} nested {
    label_style,
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<RadarShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

impl_merge!(RadarStyle { shape, fill });

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    /// Stacking for charts whose type bits carry no stack attribute (combination charts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_type: Option<StackMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_value_type: Option<InvalidValueType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<TitleStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_title: Option<TitleStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_title: Option<TitleStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_y_axis_title: Option<TitleStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<AxisOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<AxisOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_y_axis: Option<AxisOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<LegendStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_series_style: Option<SeriesStyle>,
    /// Per-series overrides keyed by series index.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub series_style_map: IndexMap<String, SeriesStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie: Option<PieStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar: Option<RadarStyle>,
}

impl Merge for ChartStyle {
    fn merge_from(&mut self, other: &Self) {
        macro_rules! scalar {
            ($($field:ident),*) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )*
            };
        }
        macro_rules! nested {
            ($($field:ident),*) => {
                $(
                    if let Some(incoming) = &other.$field {
                        match &mut self.$field {
                            Some(base) => base.merge_from(incoming),
                            None => self.$field = Some(incoming.clone()),
                        }
                    }
                )*
            };
        }

        scalar!(
            width,
            height,
            theme,
            background_color,
            border_color,
            border_width,
            font_size,
            font_color,
            stack_type,
            invalid_value_type
        );
        nested!(
            title,
            subtitle,
            x_axis_title,
            y_axis_title,
            right_y_axis_title,
            x_axis,
            y_axis,
            right_y_axis,
            legend,
            all_series_style,
            pie,
            radar
        );
        for (key, incoming) in &other.series_style_map {
            self.series_style_map
                .entry(key.clone())
                .or_default()
                .merge_from(incoming);
        }
    }
}

impl ChartStyle {
    /// Merges a typed partial style; present fields win.
    pub fn merge(&mut self, partial: &ChartStyle) {
        self.merge_from(partial);
    }

    /// Merges a raw JSON partial style.
    ///
    /// Unlike [`ChartStyle::merge`], an explicit `null` clears the field it names.
    pub fn merge_value(&mut self, partial: &Value) -> Result<()> {
        let mut base = serde_json::to_value(&*self).map_err(Error::Style)?;
        deep_merge_value(&mut base, partial);
        *self = serde_json::from_value(base).map_err(Error::Style)?;
        Ok(())
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::Style)
    }

    /// Resolved style of the series stored at `index` of the data source.
    pub fn series_style(&self, index: usize) -> SeriesStyle {
        merge_series_style(
            self.all_series_style.as_ref(),
            self.series_style_map.get(&index.to_string()),
        )
    }

    pub fn set_series_style(&mut self, index: usize, style: SeriesStyle) {
        self.series_style_map.insert(index.to_string(), style);
    }
}

/// Combines the all-series fallback with a per-series override.
///
/// The override wins on every key it sets; nested objects (border, point, label) are merged
/// rather than replaced. This is the only place series styles are resolved.
pub fn merge_series_style(all: Option<&SeriesStyle>, per_series: Option<&SeriesStyle>) -> SeriesStyle {
    let mut out = all.cloned().unwrap_or_default();
    if let Some(per_series) = per_series {
        out.merge_from(per_series);
    }
    out
}

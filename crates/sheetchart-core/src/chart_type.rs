//! Chart-type taxonomy.
//!
//! Chart types are bit flags: base types occupy the low 16 bits and attribute bits (stacking,
//! orientation, hollow pies) start at bit 16. A concrete chart type is a base type OR-ed with
//! zero or more attributes, e.g. `BAR = COLUMN | HORIZONTAL`.
//!
//! The integer values are persisted in chart snapshots. New base types and attributes must take
//! the next free bit in their range; existing values never change.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChartTypeBits: u32 {
        /// No resolvable chart type.
        const NONE = 0;

        // Base types (bits 1-15)

        const LINE = 1 << 1;
        const COLUMN = 1 << 2;
        const PIE = 1 << 3;
        const AREA = 1 << 4;
        const RADAR = 1 << 5;
        const SCATTER = 1 << 6;
        /// Mixed bar/line/area chart; each series resolves its own sub type.
        const COMBINATION = 1 << 7;

        // Attributes (bits 16+)

        const STACK = 1 << 16;
        const PERCENT_STACK = Self::STACK.bits() | (1 << 17);
        const HORIZONTAL = 1 << 18;
        const HOLLOW = 1 << 19;

        // Derived variants

        const LINE_STACKED = Self::LINE.bits() | Self::STACK.bits();
        const LINE_PERCENT_STACKED = Self::LINE.bits() | Self::PERCENT_STACK.bits();
        const COLUMN_STACKED = Self::COLUMN.bits() | Self::STACK.bits();
        const COLUMN_PERCENT_STACKED = Self::COLUMN.bits() | Self::PERCENT_STACK.bits();
        const BAR = Self::COLUMN.bits() | Self::HORIZONTAL.bits();
        const BAR_STACKED = Self::BAR.bits() | Self::STACK.bits();
        const BAR_PERCENT_STACKED = Self::BAR.bits() | Self::PERCENT_STACK.bits();
        const AREA_STACKED = Self::AREA.bits() | Self::STACK.bits();
        const AREA_PERCENT_STACKED = Self::AREA.bits() | Self::PERCENT_STACK.bits();
        const DOUGHNUT = Self::PIE.bits() | Self::HOLLOW.bits();
    }
}

/// Mask covering every base-type bit.
pub const BASE_MASK: u32 = 0x0000_ffff;
/// Mask covering every attribute bit.
pub const ATTRIBUTE_MASK: u32 = !BASE_MASK;

/// Every named chart type a host can pick, with its kebab-case name.
pub const DEFINED: &[(&str, ChartTypeBits)] = &[
    ("line", ChartTypeBits::LINE),
    ("line-stacked", ChartTypeBits::LINE_STACKED),
    ("line-percent-stacked", ChartTypeBits::LINE_PERCENT_STACKED),
    ("column", ChartTypeBits::COLUMN),
    ("column-stacked", ChartTypeBits::COLUMN_STACKED),
    ("column-percent-stacked", ChartTypeBits::COLUMN_PERCENT_STACKED),
    ("bar", ChartTypeBits::BAR),
    ("bar-stacked", ChartTypeBits::BAR_STACKED),
    ("bar-percent-stacked", ChartTypeBits::BAR_PERCENT_STACKED),
    ("area", ChartTypeBits::AREA),
    ("area-stacked", ChartTypeBits::AREA_STACKED),
    ("area-percent-stacked", ChartTypeBits::AREA_PERCENT_STACKED),
    ("pie", ChartTypeBits::PIE),
    ("doughnut", ChartTypeBits::DOUGHNUT),
    ("radar", ChartTypeBits::RADAR),
    ("scatter", ChartTypeBits::SCATTER),
    ("combination", ChartTypeBits::COMBINATION),
];

/// How values of a chart are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StackMode {
    Stacked,
    Percent,
}

/// True iff every bit of `attr` is set in `bits`.
#[inline]
pub fn has(bits: ChartTypeBits, attr: ChartTypeBits) -> bool {
    bits.bits() & attr.bits() == attr.bits()
}

/// True iff `bits` shares a bit with `base` and is numerically at least `base`.
///
/// This answers "is this chart fundamentally a `base` chart", attributes included:
/// `base_on(BAR_STACKED, COLUMN)` holds, `base_on(LINE, COLUMN)` does not.
#[inline]
pub fn base_on(bits: ChartTypeBits, base: ChartTypeBits) -> bool {
    bits.bits() & base.bits() != 0 && bits.bits() >= base.bits()
}

/// Clears the bits of `attr` from `bits`.
#[inline]
pub fn remove(bits: ChartTypeBits, attr: ChartTypeBits) -> ChartTypeBits {
    ChartTypeBits::from_bits_retain(bits.bits() & !attr.bits())
}

/// Strips every attribute bit.
#[inline]
pub fn base_type(bits: ChartTypeBits) -> ChartTypeBits {
    ChartTypeBits::from_bits_retain(bits.bits() & BASE_MASK)
}

/// Renderer type name of the base type of `bits`.
///
/// Returns `None` for [`ChartTypeBits::NONE`] and for bit patterns that carry no (or more than
/// one) base type.
pub fn to_render_string(bits: ChartTypeBits) -> Option<&'static str> {
    let base = base_type(bits);
    let name = match base {
        b if b == ChartTypeBits::LINE => "line",
        b if b == ChartTypeBits::COLUMN => "bar",
        b if b == ChartTypeBits::PIE => "pie",
        b if b == ChartTypeBits::AREA => "area",
        b if b == ChartTypeBits::RADAR => "radar",
        b if b == ChartTypeBits::SCATTER => "scatter",
        b if b == ChartTypeBits::COMBINATION => "common",
        _ => return None,
    };
    Some(name)
}

/// Chart types drawn on a category/value plane (combination excluded).
pub fn is_cartesian(bits: ChartTypeBits) -> bool {
    let base = base_type(bits);
    base == ChartTypeBits::LINE
        || base == ChartTypeBits::COLUMN
        || base == ChartTypeBits::AREA
        || base == ChartTypeBits::SCATTER
}

/// Stacking requested by the attribute bits.
pub fn stack_mode(bits: ChartTypeBits) -> Option<StackMode> {
    if has(bits, ChartTypeBits::PERCENT_STACK) {
        Some(StackMode::Percent)
    } else if has(bits, ChartTypeBits::STACK) {
        Some(StackMode::Stacked)
    } else {
        None
    }
}

/// Looks up a chart type by its kebab-case name (see [`DEFINED`]).
pub fn from_name(name: &str) -> Option<ChartTypeBits> {
    let name = name.trim();
    DEFINED
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, bits)| *bits)
}

/// Kebab-case name of a defined chart type.
pub fn name_of(bits: ChartTypeBits) -> Option<&'static str> {
    DEFINED.iter().find(|(_, b)| *b == bits).map(|(n, _)| *n)
}

impl ChartTypeBits {
    #[inline]
    pub fn has(self, attr: ChartTypeBits) -> bool {
        has(self, attr)
    }

    #[inline]
    pub fn base_on(self, base: ChartTypeBits) -> bool {
        base_on(self, base)
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.bits() == 0
    }
}

impl fmt::Display for ChartTypeBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match name_of(*self) {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#x}", self.bits()),
        }
    }
}

// Persisted as the raw integer, not the bitflags text form.
impl Serialize for ChartTypeBits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for ChartTypeBits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(ChartTypeBits::from_bits_retain(bits))
    }
}

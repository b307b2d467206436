//! Raw spreadsheet cell values.

use serde::{Deserialize, Serialize};

/// One cell of a data-source range.
///
/// JSON `null` (and cells missing from ragged rows) are [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

/// Row-major grid of cell values, addressed as `source[row][item]`.
pub type ChartDataSource = Vec<Vec<CellValue>>;

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Numeric reading of the cell. Text parses when it holds a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Number(_) => None,
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Self::Empty => None,
        }
    }

    /// Display string as a spreadsheet would show it (`1` rather than `1.0`, blank for empty).
    pub fn display(&self) -> String {
        match self {
            Self::Number(v) => format_number(*v),
            Self::Text(s) => s.clone(),
            Self::Empty => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

/// Formats a number the way JavaScript's `Number#toString` does.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format(v).to_string()
}

/// Builds a [`ChartDataSource`] from rows of anything convertible to [`CellValue`].
///
/// ```
/// use sheetchart_core::cell::{rows, CellValue};
///
/// let source = rows(vec![vec![CellValue::from("a"), CellValue::from(1)]]);
/// assert_eq!(source[0][1], CellValue::Number(1.0));
/// ```
pub fn rows<R, C>(rows: R) -> ChartDataSource
where
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: Into<CellValue>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

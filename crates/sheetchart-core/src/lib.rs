#![forbid(unsafe_code)]

//! Spreadsheet chart core (headless).
//!
//! - [`chart_type`]: bit-flag chart taxonomy
//! - [`pipeline`]: cell grid + data config -> typed chart data
//! - [`model`]: reactive per-chart state, generators and persistence
//!
//! Rendering lives in `sheetchart-render`; this crate has no notion of a render engine.

pub mod cell;
pub mod chart_type;
pub mod config;
pub mod data;
pub mod debounce;
pub mod error;
pub mod generator;
pub mod manager;
pub mod model;
pub mod observable;
pub mod pipeline;
pub mod source;
pub mod style;

pub use cell::{CellValue, ChartDataSource};
pub use chart_type::{ChartTypeBits, StackMode};
pub use data::{
    Category, CategoryType, ChartConfig, ChartData, ChartDataConfig, ChartDataContext, DataItem,
    Direction, Series, SeriesItem,
};
pub use error::{Error, Result};
pub use generator::{ChartGenerator, GeneratorRegistry};
pub use manager::ChartModelManager;
pub use model::{ChartModel, ChartSnapshot, ModelOptions};
pub use observable::{Subject, Subscription};
pub use pipeline::{DataPipeline, build_context, get_output};
pub use source::{CellRange, DataSourceProvider, SheetDataSource};
pub use style::ChartStyle;

#[cfg(test)]
mod tests;

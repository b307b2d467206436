//! Chart-config generators keyed by chart type.

use crate::chart_type::{ChartTypeBits, DEFINED};
use crate::data::{ChartConfig, ChartData};
use rustc_hash::FxHashMap;

/// Turns pipeline output into the config for one chart type.
pub type ChartGenerator = fn(chart_type: ChartTypeBits, data: &ChartData) -> ChartConfig;

/// Generator lookup by exact chart type.
///
/// Registration happens during setup, before any chart model holds the registry; models share it
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: FxHashMap<ChartTypeBits, ChartGenerator>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `generator` for `chart_type`.
    ///
    /// The first registration wins: a second one for the same type is logged and ignored, and
    /// `false` is returned.
    pub fn add_generator(&mut self, chart_type: ChartTypeBits, generator: ChartGenerator) -> bool {
        if self.generators.contains_key(&chart_type) {
            tracing::warn!(%chart_type, "chart generator already registered; ignoring");
            return false;
        }
        self.generators.insert(chart_type, generator);
        true
    }

    pub fn get(&self, chart_type: ChartTypeBits) -> Option<ChartGenerator> {
        self.generators.get(&chart_type).copied()
    }

    pub fn contains(&self, chart_type: ChartTypeBits) -> bool {
        self.generators.contains_key(&chart_type)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Registry with [`default_generator`] for every named chart type.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        for (_, chart_type) in DEFINED {
            reg.add_generator(*chart_type, default_generator);
        }
        reg
    }
}

/// Pairs the chart data with its type unchanged.
pub fn default_generator(chart_type: ChartTypeBits, data: &ChartData) -> ChartConfig {
    ChartConfig::new(chart_type, data.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Series, SeriesItem};

    fn series(index: usize) -> Series {
        Series {
            index,
            name: format!("s{index}"),
            items: vec![SeriesItem {
                value: Some(1.0),
                label: "1".to_string(),
            }],
        }
    }

    fn first_series_only(chart_type: ChartTypeBits, data: &ChartData) -> ChartConfig {
        let mut data = data.clone();
        data.series.truncate(1);
        ChartConfig::new(chart_type, data)
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        let mut reg = GeneratorRegistry::new();
        assert!(reg.add_generator(ChartTypeBits::PIE, first_series_only));
        assert!(!reg.add_generator(ChartTypeBits::PIE, default_generator));

        let data = ChartData {
            category: None,
            series: vec![series(0), series(1)],
        };
        let generator = reg.get(ChartTypeBits::PIE).unwrap();
        assert_eq!(generator(ChartTypeBits::PIE, &data).data.series.len(), 1);
    }

    #[test]
    fn defaults_cover_every_named_type() {
        let reg = GeneratorRegistry::with_defaults();
        assert_eq!(reg.len(), DEFINED.len());
        assert!(!reg.contains(ChartTypeBits::NONE));
        assert!(!reg.contains(ChartTypeBits::STACK));
    }
}

//! Chart config -> render spec.
//!
//! A converter claims a [`ChartConfig`] by chart-type predicate and builds the unstyled render
//! spec: series bindings, data values and axes. The default predicates are disjoint (each one
//! tests a different base type); the registry still picks the first match so hosts can put a
//! more specific converter in front.

pub mod cartesian;
pub mod pie;
pub mod radar;

use crate::settings::RenderSettings;
use crate::spec::RenderSpec;
use sheetchart_core::chart_type::{self, ChartTypeBits};
use sheetchart_core::{ChartConfig, ChartStyle};

pub type CanConvertFn = fn(config: &ChartConfig) -> bool;
pub type ConvertFn =
    fn(config: &ChartConfig, style: &ChartStyle, settings: &RenderSettings) -> RenderSpec;

#[derive(Debug, Clone)]
pub struct Converter {
    pub id: &'static str,
    pub can_convert: CanConvertFn,
    pub convert: ConvertFn,
}

#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: Vec<Converter>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut reg = Self::new();
        reg.add_fn("pie", is_pie, pie::convert_pie);
        reg.add_fn("radar", is_radar, radar::convert_radar);
        reg.add_fn("combination", is_combination, cartesian::convert_combination);
        reg.add_fn("cartesian", is_cartesian, cartesian::convert_cartesian);
        reg
    }
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    pub fn add(&mut self, converter: Converter) {
        self.converters.push(converter);
    }

    pub fn add_fn(&mut self, id: &'static str, can_convert: CanConvertFn, convert: ConvertFn) {
        self.add(Converter {
            id,
            can_convert,
            convert,
        });
    }

    /// Puts `converter` in front of every registered one.
    pub fn prepend(&mut self, converter: Converter) {
        self.converters.insert(0, converter);
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.converters.iter().map(|c| c.id)
    }

    pub fn find(&self, config: &ChartConfig) -> Option<&Converter> {
        self.converters.iter().find(|c| (c.can_convert)(config))
    }

    /// Converts with the first claiming converter; `{}` when none claims the config.
    pub fn convert(
        &self,
        config: &ChartConfig,
        style: &ChartStyle,
        settings: &RenderSettings,
    ) -> RenderSpec {
        match self.find(config) {
            Some(converter) => {
                tracing::debug!(converter = converter.id, chart_type = %config.chart_type, "converting chart config");
                (converter.convert)(config, style, settings)
            }
            None => {
                tracing::debug!(chart_type = %config.chart_type, "no converter for chart type");
                RenderSpec::empty()
            }
        }
    }
}

pub fn is_pie(config: &ChartConfig) -> bool {
    config.chart_type.base_on(ChartTypeBits::PIE)
}

pub fn is_radar(config: &ChartConfig) -> bool {
    config.chart_type.base_on(ChartTypeBits::RADAR)
}

pub fn is_combination(config: &ChartConfig) -> bool {
    config.chart_type.base_on(ChartTypeBits::COMBINATION)
}

pub fn is_cartesian(config: &ChartConfig) -> bool {
    chart_type::is_cartesian(config.chart_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetchart_core::ChartData;
    use sheetchart_core::chart_type::DEFINED;

    #[test]
    fn every_defined_type_is_claimed_by_exactly_one_converter() {
        let reg = ConverterRegistry::default();
        for (name, bits) in DEFINED {
            let config = ChartConfig::new(*bits, ChartData::default());
            let claims = reg.converters.iter().filter(|c| (c.can_convert)(&config)).count();
            assert_eq!(claims, 1, "{name} claimed {claims} times");
        }
    }

    #[test]
    fn unclaimed_configs_convert_to_an_empty_spec() {
        let reg = ConverterRegistry::default();
        let config = ChartConfig::new(ChartTypeBits::NONE, ChartData::default());
        let spec = reg.convert(&config, &ChartStyle::default(), &RenderSettings::default());
        assert!(spec.is_empty());
    }
}

#![forbid(unsafe_code)]

//! Chart config to render spec.
//!
//! A [`ChartConfig`](sheetchart_core::ChartConfig) is converted into an unstyled renderer spec by
//! the first claiming [`converter`], styled by the ordered [`operators`] chain, and handed to a
//! pluggable [`RenderEngine`] through the [`RenderAdapter`].

pub mod converter;
pub mod engine;
pub mod error;
pub mod operators;
pub mod settings;
pub mod spec;

pub use converter::{Converter, ConverterRegistry};
pub use engine::{
    DetachedHosts, EngineConstructor, JsonRenderEngine, RenderAdapter, RenderEngine, RenderEvent,
    RenderHost, RenderHostProvider, RenderLog,
};
pub use error::{Error, Result};
pub use operators::{
    OperatorChain, OperatorContext, OperatorStage, RenderInstance, SpecOperator, SpecOperatorFn,
};
pub use settings::{CombinationDefaults, RenderSettings};
pub use spec::RenderSpec;

/// Builds the finished spec for `config` with the default converters, operators and settings.
pub fn render_spec(
    config: &sheetchart_core::ChartConfig,
    style: &sheetchart_core::ChartStyle,
    settings: &RenderSettings,
) -> RenderSpec {
    let ctx = OperatorContext {
        style,
        config,
        settings,
        instance: None,
    };
    let spec = ConverterRegistry::default().convert(config, style, settings);
    OperatorChain::canonical().apply(spec, &ctx)
}

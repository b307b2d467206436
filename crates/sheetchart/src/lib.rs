#![forbid(unsafe_code)]

//! `sheetchart` turns spreadsheet ranges into declarative chart specs, headless.
//!
//! The core (always available) infers categories and series from raw cell values and keeps one
//! reactive [`ChartModel`] per chart.
//!
//! # Features
//!
//! - `render`: enable config converters, the style operator chain and the render-engine boundary
//!   (`sheetchart::render`), plus [`render::ChartService`] wiring models to an engine.

pub use sheetchart_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use sheetchart_render::converter::{self, Converter, ConverterRegistry};
    pub use sheetchart_render::operators::{
        self, OperatorChain, OperatorContext, OperatorStage, RenderInstance,
    };
    pub use sheetchart_render::settings::{self, CombinationDefaults, RenderSettings};
    pub use sheetchart_render::spec::{self, RenderSpec};
    pub use sheetchart_render::{
        DetachedHosts, JsonRenderEngine, RenderAdapter, RenderEngine, RenderEvent, RenderHost,
        RenderHostProvider, RenderLog, render_spec,
    };

    mod service;

    pub use service::ChartService;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Model(#[from] sheetchart_core::Error),
        #[error(transparent)]
        Render(#[from] sheetchart_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;
}

//! The render-engine boundary.
//!
//! A [`RenderAdapter`] owns one render model per chart id: the host it mounts into, the engine
//! instance drawing there, and the last config, style and spec. The first render of a chart
//! creates its host and engine and calls [`RenderEngine::render`]; later renders update the
//! same engine in place with [`RenderEngine::set_data`].
//!
//! Engines, converters and operators are configured before the first render. Registrations
//! after that are refused with a warning.

use crate::converter::{Converter, ConverterRegistry};
use crate::operators::{OperatorChain, OperatorContext, OperatorStage, RenderInstance, SpecOperatorFn};
use crate::settings::RenderSettings;
use crate::spec::RenderSpec;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use sheetchart_core::{ChartConfig, ChartStyle};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A declarative chart renderer bound to one mount point.
pub trait RenderEngine {
    /// Draws `spec` from scratch.
    fn render(&mut self, spec: &RenderSpec) -> Result<()>;

    /// Updates the drawn chart in place.
    fn set_data(&mut self, spec: &RenderSpec) -> Result<()>;

    fn dispose(&mut self);
}

/// Where a chart is mounted, and how to release it.
pub struct RenderHost {
    pub mount: String,
    on_dispose: Option<Box<dyn FnOnce()>>,
}

impl RenderHost {
    pub fn new(mount: impl Into<String>) -> Self {
        Self {
            mount: mount.into(),
            on_dispose: None,
        }
    }

    pub fn with_on_dispose(mut self, on_dispose: impl FnOnce() + 'static) -> Self {
        self.on_dispose = Some(Box::new(on_dispose));
        self
    }

    pub fn dispose(mut self) {
        if let Some(on_dispose) = self.on_dispose.take() {
            on_dispose();
        }
    }
}

impl fmt::Debug for RenderHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHost")
            .field("mount", &self.mount)
            .field("on_dispose", &self.on_dispose.is_some())
            .finish()
    }
}

pub trait RenderHostProvider {
    fn create_host(&self, chart_id: &str) -> RenderHost;
}

/// Hosts that mount nowhere (`chart-<id>`); used headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHosts;

impl RenderHostProvider for DetachedHosts {
    fn create_host(&self, chart_id: &str) -> RenderHost {
        RenderHost::new(format!("chart-{chart_id}"))
    }
}

pub type EngineConstructor = Rc<dyn Fn(&RenderHost) -> Box<dyn RenderEngine>>;

struct RenderModel {
    engine_name: String,
    engine: Box<dyn RenderEngine>,
    host: Option<RenderHost>,
    config: ChartConfig,
    style: ChartStyle,
    spec: RenderSpec,
}

impl RenderModel {
    fn dispose(&mut self) {
        self.engine.dispose();
        if let Some(host) = self.host.take() {
            host.dispose();
        }
    }
}

pub struct RenderAdapter {
    engines: IndexMap<String, EngineConstructor>,
    active: Option<String>,
    hosts: Box<dyn RenderHostProvider>,
    converters: ConverterRegistry,
    operators: OperatorChain,
    settings: RenderSettings,
    models: IndexMap<String, RenderModel>,
    rendered: bool,
}

impl Default for RenderAdapter {
    fn default() -> Self {
        Self::new(DetachedHosts)
    }
}

impl fmt::Debug for RenderAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderAdapter")
            .field("engines", &self.engines.keys().collect::<Vec<_>>())
            .field("active", &self.active)
            .field("operators", &self.operators.names())
            .field("charts", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RenderAdapter {
    pub fn new(hosts: impl RenderHostProvider + 'static) -> Self {
        Self {
            engines: IndexMap::new(),
            active: None,
            hosts: Box::new(hosts),
            converters: ConverterRegistry::default(),
            operators: OperatorChain::canonical(),
            settings: RenderSettings::default(),
            models: IndexMap::new(),
            rendered: false,
        }
    }

    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn operators(&self) -> &OperatorChain {
        &self.operators
    }

    fn configurable(&self, what: &str, name: &str) -> bool {
        if self.rendered {
            tracing::warn!(what, name, "registration after the first render is not supported; ignoring");
            return false;
        }
        true
    }

    /// Registers an engine constructor under `name`; the first registered engine becomes active.
    ///
    /// A duplicate name keeps the first registration and returns `false`.
    pub fn register_render_engine(
        &mut self,
        name: &str,
        constructor: impl Fn(&RenderHost) -> Box<dyn RenderEngine> + 'static,
    ) -> bool {
        if !self.configurable("render engine", name) {
            return false;
        }
        if self.engines.contains_key(name) {
            tracing::warn!(engine = name, "render engine already registered; ignoring");
            return false;
        }
        self.engines.insert(name.to_string(), Rc::new(constructor));
        if self.active.is_none() {
            self.active = Some(name.to_string());
        }
        true
    }

    /// Selects the engine used for charts rendered from now on.
    pub fn use_engine(&mut self, name: &str) -> Result<()> {
        if !self.engines.contains_key(name) {
            return Err(Error::UnknownEngine {
                name: name.to_string(),
            });
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active_engine(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Puts `converter` in front of the default converters.
    pub fn add_converter(&mut self, converter: Converter) -> bool {
        if !self.configurable("converter", converter.id) {
            return false;
        }
        self.converters.prepend(converter);
        true
    }

    pub fn add_operator(&mut self, stage: OperatorStage, name: &'static str, apply: SpecOperatorFn) -> bool {
        if !self.configurable("operator", name) {
            return false;
        }
        self.operators.add(stage, name, apply);
        true
    }

    pub fn remove_operator(&mut self, name: &str) -> bool {
        self.configurable("operator", name) && self.operators.remove(name)
    }

    /// Converts `config` and runs the operator chain; no engine involved.
    pub fn build_spec(
        &self,
        chart_id: Option<&str>,
        config: &ChartConfig,
        style: &ChartStyle,
    ) -> RenderSpec {
        let instance = chart_id.map(|chart_id| RenderInstance {
            chart_id: chart_id.to_string(),
            engine: self.active.clone().unwrap_or_default(),
        });
        let ctx = OperatorContext {
            style,
            config,
            settings: &self.settings,
            instance: instance.as_ref(),
        };
        let spec = self.converters.convert(config, style, &self.settings);
        self.operators.apply(spec, &ctx)
    }

    /// Renders chart `id`, creating its host and engine on first use.
    pub fn render(&mut self, id: &str, config: &ChartConfig, style: &ChartStyle) -> Result<()> {
        let Some(engine_name) = self.active.clone() else {
            return Err(Error::NoEngine);
        };
        self.rendered = true;
        let spec = self.build_spec(Some(id), config, style);

        // Switching engines re-creates the chart on the new one.
        if self
            .models
            .get(id)
            .is_some_and(|model| model.engine_name != engine_name)
        {
            self.remove(id);
        }

        if let Some(model) = self.models.get_mut(id) {
            tracing::debug!(chart = id, "updating rendered chart");
            model.engine.set_data(&spec)?;
            model.config = config.clone();
            model.style = style.clone();
            model.spec = spec;
            return Ok(());
        }

        let Some(constructor) = self.engines.get(&engine_name).cloned() else {
            return Err(Error::UnknownEngine { name: engine_name });
        };
        let host = self.hosts.create_host(id);
        let mut engine = constructor(&host);
        tracing::debug!(chart = id, engine = %engine_name, mount = %host.mount, "creating render engine");
        if let Err(err) = engine.render(&spec) {
            engine.dispose();
            host.dispose();
            return Err(err);
        }
        self.models.insert(
            id.to_string(),
            RenderModel {
                engine_name,
                engine,
                host: Some(host),
                config: config.clone(),
                style: style.clone(),
                spec,
            },
        );
        Ok(())
    }

    /// Re-renders chart `id` with a new style and its last config. No-op for charts never
    /// rendered.
    pub fn render_style(&mut self, id: &str, style: &ChartStyle) -> Result<()> {
        let Some(config) = self.models.get(id).map(|model| model.config.clone()) else {
            tracing::debug!(chart = id, "style update before any config; skipped");
            return Ok(());
        };
        self.render(id, &config, style)
    }

    /// Disposes the engine and host of chart `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.models.shift_remove(id) {
            Some(mut model) => {
                model.dispose();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for (_, mut model) in self.models.drain(..) {
            model.dispose();
        }
    }

    pub fn spec(&self, id: &str) -> Option<&RenderSpec> {
        self.models.get(id).map(|model| &model.spec)
    }

    pub fn style(&self, id: &str) -> Option<&ChartStyle> {
        self.models.get(id).map(|model| &model.style)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Drop for RenderAdapter {
    fn drop(&mut self) {
        self.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Render { mount: String, spec: Value },
    SetData { mount: String, spec: Value },
    Dispose { mount: String },
}

/// Shared record of what [`JsonRenderEngine`]s were asked to do.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    events: Rc<RefCell<Vec<RenderEvent>>>,
}

impl RenderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.borrow().clone()
    }

    /// Last spec drawn or pushed into `mount`.
    pub fn last_spec(&self, mount: &str) -> Option<Value> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            RenderEvent::Render { mount: m, spec } | RenderEvent::SetData { mount: m, spec }
                if m == mount =>
            {
                Some(spec.clone())
            }
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: RenderEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Engine that records specs as JSON instead of drawing them.
#[derive(Debug)]
pub struct JsonRenderEngine {
    mount: String,
    log: RenderLog,
    disposed: bool,
}

impl JsonRenderEngine {
    pub const NAME: &'static str = "json";

    pub fn new(host: &RenderHost, log: RenderLog) -> Self {
        Self {
            mount: host.mount.clone(),
            log,
            disposed: false,
        }
    }

    /// Constructor for [`RenderAdapter::register_render_engine`], recording into `log`.
    pub fn constructor(log: RenderLog) -> impl Fn(&RenderHost) -> Box<dyn RenderEngine> + 'static {
        move |host| Box::new(Self::new(host, log.clone()))
    }

    fn check_live(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::Engine {
                engine: Self::NAME.to_string(),
                message: format!("engine for {} already disposed", self.mount),
            });
        }
        Ok(())
    }
}

impl RenderEngine for JsonRenderEngine {
    fn render(&mut self, spec: &RenderSpec) -> Result<()> {
        self.check_live()?;
        self.log.push(RenderEvent::Render {
            mount: self.mount.clone(),
            spec: spec.as_value().clone(),
        });
        Ok(())
    }

    fn set_data(&mut self, spec: &RenderSpec) -> Result<()> {
        self.check_live()?;
        self.log.push(RenderEvent::SetData {
            mount: self.mount.clone(),
            spec: spec.as_value().clone(),
        });
        Ok(())
    }

    fn dispose(&mut self) {
        if std::mem::replace(&mut self.disposed, true) {
            return;
        }
        self.log.push(RenderEvent::Dispose {
            mount: self.mount.clone(),
        });
    }
}

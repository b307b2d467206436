//! Reactive chart model.
//!
//! A [`ChartModel`] holds the state of one chart: the chart type, the declared data config and
//! the style, plus a subscription to the host's data source. Whenever the data source, the chart
//! type or the data config changes, the data pipeline reruns and the generator registered for the
//! chart type turns the result into a [`ChartConfig`] published on [`ChartModel::config`].
//! Style changes are published on [`ChartModel::style`] only and never rerun the pipeline.
//!
//! Without a generator for the current chart type (including while the type is still unset) no
//! config is published. This is an expected transient state, not an error.

use crate::cell::ChartDataSource;
use crate::chart_type::ChartTypeBits;
use crate::data::{ChartConfig, ChartDataConfig, ChartDataContext};
use crate::debounce::Debounce;
use crate::generator::GeneratorRegistry;
use crate::observable::{Subject, Subscription};
use crate::pipeline::{DataPipeline, get_output};
use crate::source::{CellRange, DataSourceProvider};
use crate::style::ChartStyle;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// Default coalescing window for data-source edits.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOptions {
    /// Trailing window applied to data-source emissions; zero recomputes synchronously.
    pub debounce: Duration,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl ModelOptions {
    /// Options that recompute on every data-source emission.
    pub fn synchronous() -> Self {
        Self {
            debounce: Duration::ZERO,
        }
    }
}

/// Persisted state of a chart: everything needed to rebuild its model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartTypeBits>,
    #[serde(default)]
    pub style: ChartStyle,
    /// The declared data config (inferred parts are recomputed on load).
    #[serde(default)]
    pub context: ChartDataConfig,
}

impl ChartSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::Snapshot)
    }
}

struct ModelCore {
    id: String,
    generators: Rc<GeneratorRegistry>,
    pipeline: RefCell<Rc<DataPipeline>>,
    provider: Option<Rc<dyn DataSourceProvider>>,
    chart_type: Cell<Option<ChartTypeBits>>,
    data_config: RefCell<ChartDataConfig>,
    data_source: RefCell<Option<ChartDataSource>>,
    pending: RefCell<Debounce<ChartDataSource>>,
    context: RefCell<Option<ChartDataContext>>,
    config: Subject<ChartConfig>,
    style: Subject<ChartStyle>,
    upstream: RefCell<Option<Subscription>>,
    on_dispose: RefCell<Vec<Box<dyn FnOnce(&str)>>>,
    disposed: Cell<bool>,
}

impl ModelCore {
    fn receive_source(&self, source: ChartDataSource) {
        if self.disposed.get() {
            return;
        }
        // The first grid is applied right away; only later edits are coalesced.
        if self.data_source.borrow().is_none() {
            self.apply_source(source);
            return;
        }
        let ready = self.pending.borrow_mut().push(source, Instant::now());
        if let Some(source) = ready {
            self.apply_source(source);
        }
    }

    fn apply_source(&self, source: ChartDataSource) {
        *self.data_source.borrow_mut() = Some(source);
        self.recompute();
    }

    fn recompute(&self) {
        if self.disposed.get() {
            return;
        }
        let Some(chart_type) = self.chart_type.get() else {
            tracing::debug!(chart = %self.id, "chart type unset; no config");
            return;
        };
        let Some(generator) = self.generators.get(chart_type) else {
            tracing::debug!(chart = %self.id, %chart_type, "no generator registered; no config");
            return;
        };
        let Some(source) = self.data_source.borrow().clone() else {
            return;
        };

        let pipeline = Rc::clone(&self.pipeline.borrow());
        let context = pipeline.build_context(source, self.data_config.borrow().clone());
        let data = get_output(&context);
        *self.context.borrow_mut() = Some(context);

        let config = generator(chart_type, &data);
        tracing::debug!(
            chart = %self.id,
            %chart_type,
            series = config.data.series.len(),
            "chart config regenerated"
        );
        self.config.next(config);
    }
}

/// State holder of one chart. Cloning shares the same model.
#[derive(Clone)]
pub struct ChartModel {
    core: Rc<ModelCore>,
}

impl fmt::Debug for ChartModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartModel")
            .field("id", &self.core.id)
            .field("chart_type", &self.core.chart_type.get())
            .field("disposed", &self.core.disposed.get())
            .finish()
    }
}

impl ChartModel {
    /// Creates a model bound to `provider`'s data-source stream.
    pub fn new(
        id: impl Into<String>,
        provider: Rc<dyn DataSourceProvider>,
        generators: Rc<GeneratorRegistry>,
        options: ModelOptions,
    ) -> Self {
        let upstream = provider.source();
        let model = Self::build(id.into(), Some(provider), generators, options);
        model.bind(&upstream);
        model
    }

    /// Creates a model bound to a bare data-source stream (no range control).
    pub fn from_stream(
        id: impl Into<String>,
        upstream: &Subject<ChartDataSource>,
        generators: Rc<GeneratorRegistry>,
        options: ModelOptions,
    ) -> Self {
        let model = Self::build(id.into(), None, generators, options);
        model.bind(upstream);
        model
    }

    fn build(
        id: String,
        provider: Option<Rc<dyn DataSourceProvider>>,
        generators: Rc<GeneratorRegistry>,
        options: ModelOptions,
    ) -> Self {
        Self {
            core: Rc::new(ModelCore {
                id,
                generators,
                pipeline: RefCell::new(Rc::new(DataPipeline::canonical())),
                provider,
                chart_type: Cell::new(None),
                data_config: RefCell::new(ChartDataConfig::default()),
                data_source: RefCell::new(None),
                pending: RefCell::new(Debounce::new(options.debounce)),
                context: RefCell::new(None),
                config: Subject::replay(),
                style: Subject::with_value(ChartStyle::default()),
                upstream: RefCell::new(None),
                on_dispose: RefCell::new(Vec::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    fn bind(&self, upstream: &Subject<ChartDataSource>) {
        let weak: Weak<ModelCore> = Rc::downgrade(&self.core);
        let subscription = upstream.subscribe(move |source| {
            if let Some(core) = weak.upgrade() {
                core.receive_source(source.clone());
            }
        });
        *self.core.upstream.borrow_mut() = Some(subscription);
    }

    /// Replaces the data pipeline (hosts that add their own operators) and regenerates.
    pub fn set_pipeline(&self, pipeline: DataPipeline) {
        if self.is_disposed() {
            return;
        }
        *self.core.pipeline.borrow_mut() = Rc::new(pipeline);
        self.core.recompute();
    }

    pub fn id(&self) -> &str {
        &self.core.id
    }

    /// Stream of generated chart configs (replays the latest).
    pub fn config(&self) -> &Subject<ChartConfig> {
        &self.core.config
    }

    /// Stream of the merged style (replays the latest).
    pub fn style(&self) -> &Subject<ChartStyle> {
        &self.core.style
    }

    pub fn current_style(&self) -> ChartStyle {
        self.core.style.value().unwrap_or_default()
    }

    pub fn current_config(&self) -> Option<ChartConfig> {
        self.core.config.value()
    }

    pub fn chart_type(&self) -> Option<ChartTypeBits> {
        self.core.chart_type.get()
    }

    pub fn data_config(&self) -> ChartDataConfig {
        self.core.data_config.borrow().clone()
    }

    /// Context resolved by the last pipeline run.
    pub fn context(&self) -> Option<ChartDataContext> {
        self.core.context.borrow().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.core.disposed.get()
    }

    /// Sets the chart type and regenerates the config.
    pub fn set_chart(&self, chart_type: ChartTypeBits) {
        if self.is_disposed() {
            return;
        }
        let chart_type = (!chart_type.is_none()).then_some(chart_type);
        self.core.chart_type.set(chart_type);
        self.core.recompute();
    }

    /// Replaces the declared data config and regenerates the config.
    pub fn set_data_config(&self, config: ChartDataConfig) {
        if self.is_disposed() {
            return;
        }
        *self.core.data_config.borrow_mut() = config;
        self.core.recompute();
    }

    /// Edits the declared data config in place and regenerates the config.
    pub fn update_data_config(&self, edit: impl FnOnce(&mut ChartDataConfig)) {
        if self.is_disposed() {
            return;
        }
        edit(&mut self.core.data_config.borrow_mut());
        self.core.recompute();
    }

    /// Deep-merges `partial` into the style and republishes it. Does not rerun the pipeline.
    pub fn set_style(&self, partial: &ChartStyle) {
        if self.is_disposed() {
            return;
        }
        let mut style = self.current_style();
        style.merge(partial);
        self.core.style.next(style);
    }

    /// JSON variant of [`ChartModel::set_style`]; `null` clears a field.
    pub fn set_style_value(&self, partial: &Value) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let mut style = self.current_style();
        style.merge_value(partial)?;
        self.core.style.next(style);
        Ok(())
    }

    /// Moves the source range through the provider; the new values arrive on the stream.
    pub fn set_range(&self, range: CellRange) {
        if self.is_disposed() {
            return;
        }
        match &self.core.provider {
            Some(provider) => provider.set_range(range),
            None => tracing::debug!(chart = %self.core.id, "model has no provider; range ignored"),
        }
    }

    /// Applies a debounced data-source update once its window has elapsed.
    ///
    /// Returns `true` when a pending update was applied.
    pub fn poll(&self, now: Instant) -> bool {
        let ready = self.core.pending.borrow_mut().poll(now);
        match ready {
            Some(source) => {
                self.core.apply_source(source);
                true
            }
            None => false,
        }
    }

    /// Applies a pending data-source update immediately.
    pub fn flush(&self) -> bool {
        let ready = self.core.pending.borrow_mut().flush();
        match ready {
            Some(source) => {
                self.core.apply_source(source);
                true
            }
            None => false,
        }
    }

    pub fn has_pending_update(&self) -> bool {
        self.core.pending.borrow().is_pending()
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            chart_type: self.chart_type(),
            style: self.current_style(),
            context: self.data_config(),
        }
    }

    /// Restores a snapshot: style is republished and the config regenerated once.
    pub fn restore(&self, snapshot: ChartSnapshot) {
        if self.is_disposed() {
            return;
        }
        *self.core.data_config.borrow_mut() = snapshot.context;
        self.core.style.next(snapshot.style);
        self.core.chart_type.set(snapshot.chart_type.filter(|t| !t.is_none()));
        self.core.recompute();
    }

    /// Registers a callback run once when the model is disposed.
    pub fn on_dispose(&self, callback: impl FnOnce(&str) + 'static) {
        if self.is_disposed() {
            callback(&self.core.id);
            return;
        }
        self.core.on_dispose.borrow_mut().push(Box::new(callback));
    }

    /// Unsubscribes from the data source and completes both output streams. Idempotent.
    pub fn dispose(&self) {
        if self.core.disposed.replace(true) {
            return;
        }
        if let Some(subscription) = self.core.upstream.borrow_mut().take() {
            subscription.unsubscribe();
        }
        self.core.pending.borrow_mut().cancel();
        self.core.config.complete();
        self.core.style.complete();

        let callbacks = std::mem::take(&mut *self.core.on_dispose.borrow_mut());
        for callback in callbacks {
            callback(&self.core.id);
        }
        tracing::debug!(chart = %self.core.id, "chart model disposed");
    }
}

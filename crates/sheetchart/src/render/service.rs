//! Chart models wired to a render adapter.

use super::{RenderAdapter, RenderSpec, Result};
use rustc_hash::FxHashMap;
use sheetchart_core::{ChartModel, ChartModelManager, ChartStyle, DataSourceProvider, Subscription};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

type Bindings = Rc<RefCell<FxHashMap<String, Vec<Subscription>>>>;

/// Creates chart models and keeps their render models in sync.
///
/// Every generated config is rendered with the model's latest style; a style change alone
/// re-renders with the last config. Disposing a model (directly or through [`ChartService::remove`])
/// drops its render model, engine and host.
#[derive(Debug)]
pub struct ChartService {
    manager: ChartModelManager,
    adapter: Rc<RefCell<RenderAdapter>>,
    bindings: Bindings,
}

impl ChartService {
    pub fn new(manager: ChartModelManager, adapter: RenderAdapter) -> Self {
        Self {
            manager,
            adapter: Rc::new(RefCell::new(adapter)),
            bindings: Rc::new(RefCell::new(FxHashMap::default())),
        }
    }

    pub fn manager(&self) -> &ChartModelManager {
        &self.manager
    }

    pub fn adapter(&self) -> &Rc<RefCell<RenderAdapter>> {
        &self.adapter
    }

    pub fn create(&self, provider: Rc<dyn DataSourceProvider>) -> ChartModel {
        let model = self.manager.create(provider);
        self.bind(&model);
        model
    }

    pub fn create_with_id(
        &self,
        id: impl Into<String>,
        provider: Rc<dyn DataSourceProvider>,
    ) -> Result<ChartModel> {
        let model = self.manager.create_with_id(id, provider)?;
        self.bind(&model);
        Ok(model)
    }

    fn bind(&self, model: &ChartModel) {
        let id = model.id().to_string();
        let latest_style = Rc::new(RefCell::new(model.current_style()));

        // Style first: the config observer renders with whatever style is current.
        let style_sub = {
            let adapter = Rc::clone(&self.adapter);
            let latest = Rc::clone(&latest_style);
            let id = id.clone();
            model.style().subscribe(move |style: &ChartStyle| {
                *latest.borrow_mut() = style.clone();
                if let Err(err) = adapter.borrow_mut().render_style(&id, style) {
                    tracing::warn!(chart = %id, %err, "style re-render failed");
                }
            })
        };
        let config_sub = {
            let adapter = Rc::clone(&self.adapter);
            let id = id.clone();
            model.config().subscribe(move |config| {
                let style = latest_style.borrow().clone();
                if let Err(err) = adapter.borrow_mut().render(&id, config, &style) {
                    tracing::warn!(chart = %id, %err, "render failed");
                }
            })
        };
        self.bindings
            .borrow_mut()
            .insert(id, vec![style_sub, config_sub]);

        let bindings: Weak<RefCell<FxHashMap<String, Vec<Subscription>>>> =
            Rc::downgrade(&self.bindings);
        let adapter: Weak<RefCell<RenderAdapter>> = Rc::downgrade(&self.adapter);
        model.on_dispose(move |id| {
            if let Some(bindings) = bindings.upgrade() {
                let dropped = bindings.borrow_mut().remove(id);
                drop(dropped);
            }
            if let Some(adapter) = adapter.upgrade() {
                adapter.borrow_mut().remove(id);
            }
        });
    }

    pub fn get(&self, id: &str) -> Option<ChartModel> {
        self.manager.get(id)
    }

    /// Disposes the model and its render model.
    pub fn remove(&self, id: &str) -> bool {
        self.manager.remove(id)
    }

    /// Applies due data-source updates; see [`ChartModelManager::poll_all`].
    pub fn poll(&self, now: Instant) -> usize {
        self.manager.poll_all(now)
    }

    /// Finished spec of the last render of chart `id`.
    pub fn spec(&self, id: &str) -> Option<RenderSpec> {
        self.adapter.borrow().spec(id).cloned()
    }

    pub fn is_bound(&self, id: &str) -> bool {
        self.bindings.borrow().contains_key(id)
    }

    pub fn clear(&self) {
        self.manager.clear();
    }
}

//! Registry of live chart models.

use crate::chart_type::ChartTypeBits;
use crate::generator::{ChartGenerator, GeneratorRegistry};
use crate::model::{ChartModel, ModelOptions};
use crate::source::DataSourceProvider;
use crate::{Error, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Models = Rc<RefCell<IndexMap<String, ChartModel>>>;

/// Creates chart models and keeps them addressable by id.
///
/// Generators are registered on the manager before the first model is created. The registry is
/// shared with every model afterwards and no longer accepts registrations.
#[derive(Debug)]
pub struct ChartModelManager {
    generators: Rc<GeneratorRegistry>,
    models: Models,
    options: ModelOptions,
}

impl Default for ChartModelManager {
    fn default() -> Self {
        Self::new(GeneratorRegistry::with_defaults())
    }
}

impl ChartModelManager {
    pub fn new(generators: GeneratorRegistry) -> Self {
        Self {
            generators: Rc::new(generators),
            models: Rc::new(RefCell::new(IndexMap::new())),
            options: ModelOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers a generator; `false` when the type is taken or models already share the registry.
    pub fn add_generator(&mut self, chart_type: ChartTypeBits, generator: ChartGenerator) -> bool {
        match Rc::get_mut(&mut self.generators) {
            Some(registry) => registry.add_generator(chart_type, generator),
            None => {
                tracing::warn!(%chart_type, "generator registry is shared with live models; ignoring");
                false
            }
        }
    }

    pub fn generators(&self) -> &GeneratorRegistry {
        &self.generators
    }

    /// Creates a model under a fresh unique id.
    pub fn create(&self, provider: Rc<dyn DataSourceProvider>) -> ChartModel {
        let mut id = uuid::Uuid::new_v4().to_string();
        while self.models.borrow().contains_key(&id) {
            id = uuid::Uuid::new_v4().to_string();
        }
        self.insert(id, provider)
    }

    /// Creates a model under a caller-chosen id (e.g. when restoring a workbook).
    pub fn create_with_id(
        &self,
        id: impl Into<String>,
        provider: Rc<dyn DataSourceProvider>,
    ) -> Result<ChartModel> {
        let id = id.into();
        if self.models.borrow().contains_key(&id) {
            return Err(Error::DuplicateChart { id });
        }
        Ok(self.insert(id, provider))
    }

    fn insert(&self, id: String, provider: Rc<dyn DataSourceProvider>) -> ChartModel {
        let model = ChartModel::new(id.clone(), provider, Rc::clone(&self.generators), self.options);

        let models: Weak<RefCell<IndexMap<String, ChartModel>>> = Rc::downgrade(&self.models);
        model.on_dispose(move |id| {
            if let Some(models) = models.upgrade() {
                models.borrow_mut().shift_remove(id);
            }
        });

        self.models.borrow_mut().insert(id, model.clone());
        model
    }

    pub fn get(&self, id: &str) -> Option<ChartModel> {
        self.models.borrow().get(id).cloned()
    }

    /// Disposes and forgets the model; `false` for unknown ids.
    pub fn remove(&self, id: &str) -> bool {
        let model = self.models.borrow_mut().shift_remove(id);
        match model {
            Some(model) => {
                model.dispose();
                true
            }
            None => false,
        }
    }

    /// Ids in creation order.
    pub fn ids(&self) -> Vec<String> {
        self.models.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.models.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.borrow().is_empty()
    }

    /// Polls every model's pending data-source update; returns how many were applied.
    pub fn poll_all(&self, now: std::time::Instant) -> usize {
        let models: Vec<ChartModel> = self.models.borrow().values().cloned().collect();
        models.iter().filter(|model| model.poll(now)).count()
    }

    /// Disposes every model.
    pub fn clear(&self) {
        let models: Vec<ChartModel> = self.models.borrow_mut().drain(..).map(|(_, m)| m).collect();
        for model in models {
            model.dispose();
        }
    }
}

//! Choropleth layer state
//!
//! Owns the loaded dataset and the user's dimension selection, and turns them
//! into paint output for the renderer. The layer never awaits: a load is
//! started with [`ChoroplethLayer::begin_load`], fetched by the caller, and
//! handed back through [`ChoroplethLayer::finish_load`].

use crate::core::config::ChoroplethConfig;
use crate::core::viewport::{Viewport, ViewportFitter};
use crate::data::geojson::{FeatureCollection, MapDocument};
use crate::data::loader::{
    DatasetId, DatasetLoader, DocumentSource, InlineSource, LoadOutcome, LoadTicket,
};
use crate::input::events::PointerEvent;
use crate::input::hover::{HoverResolver, HoverState};
use crate::layers::cache::EncodingCache;
use crate::style::catalog::{DimensionCatalog, SelectedDimension};
use crate::style::opacity::OpacityClassifier;
use crate::style::paint::PaintSpec;
use crate::ui::controls::{ControlPanel, DimensionChange};
use crate::ui::tooltip::TooltipContent;
use crate::{Error, Result};

/// A validated dataset with everything derived from it at load time
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: DatasetId,
    pub collection: FeatureCollection,
    pub catalog: DimensionCatalog,
    pub viewport: Viewport,
}

#[derive(Debug, Clone)]
pub enum LayerState {
    /// Nothing requested yet
    Idle,
    /// Waiting for the outcome of this ticket. No paint output.
    Loading(LoadTicket),
    Ready(Dataset),
    /// Last load failed; a new load may be started
    Failed(String),
}

impl LayerState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LayerState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LayerState::Loading(_))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match self {
            LayerState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }
}

/// Result of handing a load outcome to the layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The dataset is now current
    Applied(DatasetId),
    /// A newer load was started meanwhile; the outcome was discarded
    Superseded,
}

pub struct ChoroplethLayer {
    name: String,
    config: ChoroplethConfig,
    loader: DatasetLoader,
    fitter: ViewportFitter,
    classifier: OpacityClassifier,
    resolver: HoverResolver,
    encodings: EncodingCache,
    state: LayerState,
    selected: Option<SelectedDimension>,
    hover: Option<HoverState>,
}

impl ChoroplethLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), ChoroplethConfig::default())
    }

    /// Create a layer from validated configuration
    pub fn with_config(name: impl Into<String>, config: ChoroplethConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(name.into(), config))
    }

    fn build(name: String, config: ChoroplethConfig) -> Self {
        Self {
            fitter: ViewportFitter::from_config(&config.viewport),
            encodings: EncodingCache::new(config.cache.opacity_capacity),
            classifier: OpacityClassifier::default(),
            resolver: HoverResolver::new(),
            loader: DatasetLoader::new(),
            state: LayerState::Idle,
            selected: None,
            hover: None,
            name,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ChoroplethConfig {
        &self.config
    }

    pub fn state(&self) -> &LayerState {
        &self.state
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.state.dataset()
    }

    pub fn catalog(&self) -> Option<&DimensionCatalog> {
        self.dataset().map(|d| &d.catalog)
    }

    pub fn selected(&self) -> Option<&SelectedDimension> {
        self.selected.as_ref()
    }

    pub fn hover(&self) -> Option<&HoverState> {
        self.hover.as_ref()
    }

    /// Initial camera of the current dataset
    pub fn viewport(&self) -> Option<Viewport> {
        self.dataset().map(|d| d.viewport)
    }

    pub fn encoding_cache(&self) -> &EncodingCache {
        &self.encodings
    }

    /// Starts a load. The current dataset is dropped and any earlier ticket
    /// becomes stale.
    pub fn begin_load(&mut self, source: &dyn DocumentSource) -> LoadTicket {
        let ticket = self.loader.begin(source);
        self.state = LayerState::Loading(ticket.clone());
        self.selected = None;
        self.hover = None;
        ticket
    }

    /// Applies a finished fetch if its ticket is still the latest one.
    ///
    /// Fetch and validation errors move the layer to [`LayerState::Failed`]
    /// and are returned to the caller.
    pub fn finish_load(&mut self, outcome: LoadOutcome) -> Result<LoadStatus> {
        let LoadOutcome { ticket, result } = outcome;

        if !self.loader.is_current(&ticket) {
            log::warn!(
                "discarding load #{} from {}: superseded by #{}",
                ticket.id,
                ticket.source,
                self.loader.latest().unwrap_or_default()
            );
            return Ok(LoadStatus::Superseded);
        }

        match result.and_then(|document| self.prepare(ticket.id, document)) {
            Ok(dataset) => {
                log::info!(
                    "load #{} applied: {} features, {} dimensions, viewport {:?}",
                    dataset.id,
                    dataset.collection.len(),
                    dataset.catalog.len(),
                    dataset.viewport
                );
                self.encodings.retain_dataset(dataset.id);
                self.selected = Some(SelectedDimension::initial(&dataset.catalog));
                self.state = LayerState::Ready(dataset);
                Ok(LoadStatus::Applied(ticket.id))
            }
            Err(e) => {
                log::warn!("load #{} from {} failed: {}", ticket.id, ticket.source, e);
                self.state = LayerState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn prepare(&self, id: DatasetId, document: MapDocument) -> Result<Dataset> {
        let collection = document.into_source()?;
        let catalog = DimensionCatalog::discover(&collection)?;
        let viewport = self.fitter.fit_or_default(&collection);
        Ok(Dataset {
            id,
            collection,
            catalog,
            viewport,
        })
    }

    /// Begin, fetch and finish in one call
    pub async fn load(&mut self, source: &dyn DocumentSource) -> Result<LoadStatus> {
        let ticket = self.begin_load(source);
        let outcome = DatasetLoader::fetch(ticket, source).await;
        self.finish_load(outcome)
    }

    /// Loads an in-memory document without going through a fetch
    pub fn load_document(&mut self, document: MapDocument) -> Result<LoadStatus> {
        let source = InlineSource::new("inline", document);
        let ticket = self.begin_load(&source);
        self.finish_load(LoadOutcome {
            ticket,
            result: Ok(source.into_document()),
        })
    }

    /// Makes `key` the active dimension.
    ///
    /// Label and color come from the catalog. A key the catalog does not know,
    /// or one whose values cannot be classified, is rejected and the previous
    /// selection stays active.
    pub fn select(&mut self, key: &str) -> Result<SelectedDimension> {
        let LayerState::Ready(dataset) = &self.state else {
            return Err(Error::NoDataset);
        };

        let selected = dataset.catalog.select(key)?;
        let classifier = &self.classifier;
        self.encodings.get_or_try_insert(dataset.id, &selected.key, || {
            classifier.classify(&dataset.collection, &selected)
        })?;

        log::info!("dimension selected: {} ({})", selected.key, selected.label);
        self.selected = Some(selected.clone());
        Ok(selected)
    }

    /// Handles a change event from the control panel
    pub fn apply_change(&mut self, change: &DimensionChange) -> Result<SelectedDimension> {
        self.select(&change.key)
    }

    /// Paint for the active dimension, `None` while no dataset is loaded
    pub fn paint(&mut self) -> Result<Option<PaintSpec>> {
        let (LayerState::Ready(dataset), Some(selected)) = (&self.state, &self.selected) else {
            return Ok(None);
        };

        let classifier = &self.classifier;
        let encoding = self
            .encodings
            .get_or_try_insert(dataset.id, &selected.key, || {
                classifier.classify(&dataset.collection, selected)
            })?;

        Ok(Some(PaintSpec::new(selected, encoding)))
    }

    /// Updates hover from a pointer event. Hover is always empty without a dataset.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<&HoverState> {
        self.hover = if self.state.is_ready() {
            self.resolver.resolve(event)
        } else {
            None
        };
        self.hover.as_ref()
    }

    pub fn control_panel(&self) -> Option<ControlPanel> {
        self.catalog()
            .map(|catalog| ControlPanel::from_catalog(self.name.clone(), catalog))
    }

    pub fn tooltip(&self) -> Option<TooltipContent> {
        match (&self.hover, &self.selected) {
            (Some(hover), Some(selected)) => Some(TooltipContent::new(hover, selected)),
            _ => None,
        }
    }
}

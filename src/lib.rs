//! # Choropleth
//!
//! Data-driven visual encoding for choropleth map layers.
//!
//! This library turns a GeoJSON feature collection into everything an external
//! map renderer needs to draw a shaded layer: the selectable dimensions and
//! their colors, a quantized opacity step function for the active dimension,
//! the initial camera that frames the data, and the hovered feature under the
//! pointer. Tile rendering itself is left to the host renderer.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod style;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::ChoroplethConfig,
    geo::{LatLng, LatLngBounds, Point},
    viewport::{Viewport, ViewportFitter},
};

pub use data::{
    geojson::{Feature, FeatureCollection, Geometry, MapDocument},
    loader::{DatasetLoader, DocumentSource, HttpSource, InlineSource, LoadOutcome, LoadTicket},
};

pub use input::{
    events::PointerEvent,
    hover::{HoverResolver, HoverState},
};

pub use layers::choropleth::{ChoroplethLayer, Dataset, LayerState, LoadStatus};

pub use style::{
    catalog::{Dimension, DimensionCatalog, SelectedDimension},
    label::format_label,
    opacity::{classify, OpacityClassifier, OpacityEncoding},
    paint::PaintSpec,
    palette::{palette_color, Color},
};

pub use ui::{
    controls::{ControlPanel, DimensionChange},
    tooltip::TooltipContent,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No visualizable dimensions: the first feature has no non-reserved properties")]
    EmptyDimensionSet,

    #[error("Feature collection has no features")]
    EmptyFeatureCollection,

    #[error("Document has no layer source")]
    MissingSource,

    #[error("Dimension '{key}' has a non-numeric value: {value}")]
    NonNumericDimension { key: String, value: String },

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("No dataset loaded")]
    NoDataset,

    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Http(u16),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the failure happened while fetching a dataset and a retry may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Http(_) | Error::Io(_))
    }
}

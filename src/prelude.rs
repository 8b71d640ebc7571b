//! Prelude module for common choropleth types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use choropleth::prelude::*;`

pub use crate::core::{
    config::{CacheConfig, ChoroplethConfig, ChoroplethProfile, HttpConfig, ViewportConfig},
    geo::{LatLng, LatLngBounds, Point},
    viewport::{Viewport, ViewportFitter},
};

pub use crate::data::{
    geojson::{Feature, FeatureCollection, Geometry, MapDocument, Properties},
    loader::{DatasetLoader, DocumentSource, HttpSource, InlineSource, LoadOutcome, LoadTicket},
};

pub use crate::input::{HoverResolver, HoverState, PointerEvent};

pub use crate::layers::{ChoroplethLayer, Dataset, LayerState, LoadStatus};

pub use crate::style::{
    classify, format_label, palette_color, Color, Dimension, DimensionCatalog, OpacityClassifier,
    OpacityEncoding, PaintSpec, SelectedDimension,
};

pub use crate::ui::{ControlPanel, DimensionChange, TooltipContent};

pub use crate::{Error as ChoroplethError, Result};

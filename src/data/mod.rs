pub mod geojson;
pub mod loader;

pub use geojson::{Feature, FeatureCollection, Geometry, MapDocument, MapLayer, Position, Properties};
pub use loader::{
    DatasetId, DatasetLoader, DocumentSource, HttpSource, InlineSource, LoadOutcome, LoadTicket,
};

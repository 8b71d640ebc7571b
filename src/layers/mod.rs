pub mod cache;
pub mod choropleth;

pub use cache::EncodingCache;
pub use choropleth::{ChoroplethLayer, Dataset, LayerState, LoadStatus};

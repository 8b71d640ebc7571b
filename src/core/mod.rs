pub mod config;
pub mod constants;
pub mod geo;
pub mod viewport;

pub use config::{CacheConfig, ChoroplethConfig, ChoroplethProfile, HttpConfig, ViewportConfig};
pub use self::geo::{LatLng, LatLngBounds, Point};
pub use viewport::{Viewport, ViewportFitter};

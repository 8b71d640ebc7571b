//! Core constants for the encoding engine.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// World size in pixels at zoom 0 for the viewport fit (512px tiles).
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Property keys that describe a feature rather than measure it.
/// These never become a dimension.
pub const RESERVED_KEYS: [&str; 6] = ["_layerId", "name", "density", "population", "state", "updated"];

/// Opacity levels assigned to the five quantize buckets, lowest first.
pub const OPACITY_RAMP: [f64; 5] = [0.2, 0.35, 0.5, 0.65, 0.8];

/// Opacity for values below the first breakpoint.
pub const BASE_OPACITY: f64 = 0.1;

/// Opacity used when every feature shares one value.
pub const FLAT_OPACITY: f64 = 0.2;

/// Default viewport frame in pixels.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (800.0, 600.0);

/// Default padding around the fitted bounds in pixels.
pub const DEFAULT_PADDING: f64 = 12.0;

/// Zoom clamp for point-like extents.
pub const DEFAULT_MAX_ZOOM: f64 = 24.0;

/// Zoom used when the bounds cannot be fitted at all.
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Outline drawn around every region.
pub const OUTLINE_COLOR: &str = "white";

use crate::core::config::ViewportConfig;
use crate::core::geo::{LatLng, LatLngBounds};
use crate::data::geojson::FeatureCollection;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Initial camera for a dataset: center and zoom.
///
/// Produced once per load; pan and zoom after that belong to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

impl Viewport {
    pub fn new(longitude: f64, latitude: f64, zoom: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, crate::constants::DEFAULT_ZOOM)
    }
}

/// Frames a geographic extent inside a pixel viewport under Web Mercator
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportFitter {
    width: f64,
    height: f64,
    padding: f64,
    max_zoom: f64,
    default_zoom: f64,
}

impl ViewportFitter {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self {
            width,
            height,
            padding,
            max_zoom: crate::constants::DEFAULT_MAX_ZOOM,
            default_zoom: crate::constants::DEFAULT_ZOOM,
        }
    }

    pub fn from_config(config: &ViewportConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            padding: config.padding,
            max_zoom: config.max_zoom,
            default_zoom: config.default_zoom,
        }
    }

    /// Sets the zoom used for point-like extents
    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Fits the bounding box of every geometry in the collection
    pub fn fit_collection(&self, collection: &FeatureCollection) -> Result<Viewport> {
        let bounds = collection
            .bounds()
            .ok_or_else(|| Error::DegenerateBounds("collection has no coordinates".into()))?;
        self.fit(&bounds)
    }

    /// Computes the center and zoom that fit `bounds` plus padding into the frame.
    ///
    /// A zero-area box yields an infinite scale, which is clamped to the
    /// maximum zoom. Fails only when no finite zoom exists at all.
    pub fn fit(&self, bounds: &LatLngBounds) -> Result<Viewport> {
        if !bounds.is_finite() {
            return Err(Error::DegenerateBounds(format!("non-finite bounds {:?}", bounds.to_bbox())));
        }

        let target_width = self.width - 2.0 * self.padding;
        let target_height = self.height - 2.0 * self.padding;
        if !(target_width > 0.0 && target_height > 0.0) {
            return Err(Error::DegenerateBounds(format!(
                "padding {} leaves no room in a {}x{} frame",
                self.padding, self.width, self.height
            )));
        }

        let nw = LatLng::new(bounds.north_east.lat, bounds.south_west.lng).to_world();
        let se = LatLng::new(bounds.south_west.lat, bounds.north_east.lng).to_world();

        let size_x = (se.x - nw.x).abs();
        let size_y = (se.y - nw.y).abs();

        // Screen pixels per world unit
        let scale_x = target_width / size_x;
        let scale_y = target_height / size_y;

        let center = LatLng::from_world(nw.midpoint(&se));
        let zoom = scale_x.min(scale_y).abs().log2().min(self.max_zoom);

        if !zoom.is_finite() || !center.is_finite() {
            return Err(Error::DegenerateBounds(format!(
                "no finite zoom for bounds {:?}",
                bounds.to_bbox()
            )));
        }

        Ok(Viewport::new(center.lng, center.lat, zoom))
    }

    /// Like [`ViewportFitter::fit_collection`] but never fails: falls back to the
    /// extent center (or the origin) at the default zoom
    pub fn fit_or_default(&self, collection: &FeatureCollection) -> Viewport {
        match self.fit_collection(collection) {
            Ok(viewport) => viewport,
            Err(e) => {
                log::warn!("viewport fit failed, using default zoom {}: {}", self.default_zoom, e);
                let center = collection
                    .bounds()
                    .map(|b| b.center())
                    .filter(|c| c.is_finite())
                    .unwrap_or_default();
                Viewport::new(center.lng, center.lat, self.default_zoom)
            }
        }
    }
}

impl Default for ViewportFitter {
    fn default() -> Self {
        Self::from_config(&ViewportConfig::default())
    }
}

//! Configuration for the encoding engine
//!
//! Settings can be picked from a preset profile or loaded from JSON. Every
//! section has a sensible default, so a partial JSON document only needs to
//! name the values it changes.

use crate::core::constants::{
    DEFAULT_MAX_ZOOM, DEFAULT_PADDING, DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum ChoroplethProfile {
    /// 800x600 frame with 12px padding
    Standard,
    /// Small embedded frame with a tighter cache
    Compact,
    Custom(ChoroplethConfig),
}

impl ChoroplethProfile {
    pub fn resolve(&self) -> ChoroplethConfig {
        match self {
            Self::Standard => ChoroplethConfig {
                viewport: ViewportConfig {
                    width: DEFAULT_VIEWPORT_SIZE.0,
                    height: DEFAULT_VIEWPORT_SIZE.1,
                    padding: DEFAULT_PADDING,
                    max_zoom: DEFAULT_MAX_ZOOM,
                    default_zoom: DEFAULT_ZOOM,
                },
                cache: CacheConfig { opacity_capacity: 32 },
                http: HttpConfig::default(),
            },
            Self::Compact => ChoroplethConfig {
                viewport: ViewportConfig {
                    width: 400.0,
                    height: 300.0,
                    padding: 6.0,
                    max_zoom: 20.0,
                    default_zoom: DEFAULT_ZOOM,
                },
                cache: CacheConfig { opacity_capacity: 8 },
                http: HttpConfig::default(),
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for ChoroplethProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoroplethConfig {
    pub viewport: ViewportConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        ChoroplethProfile::default().resolve()
    }
}

impl ChoroplethConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        if self.cache.opacity_capacity == 0 {
            return Err(Error::Config("cache.opacity_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Target frame for the initial camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub max_zoom: f64,
    /// Fallback when the data extent cannot be fitted
    pub default_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ChoroplethProfile::Standard.resolve().viewport
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::Config(format!(
                "viewport size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.padding >= 0.0) {
            return Err(Error::Config(format!("padding must be >= 0, got {}", self.padding)));
        }
        if !self.max_zoom.is_finite() || !self.default_zoom.is_finite() {
            return Err(Error::Config("zoom limits must be finite".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of (dataset, dimension) opacity encodings kept
    pub opacity_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        ChoroplethProfile::Standard.resolve().cache
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("choropleth/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

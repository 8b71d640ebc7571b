use crate::core::constants::OUTLINE_COLOR;
use crate::style::catalog::SelectedDimension;
use crate::style::opacity::OpacityEncoding;
use crate::style::palette::Color;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Fill paint for the choropleth layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintSpec {
    /// Key of the property the opacity reads
    pub dimension: String,
    pub fill_color: Color,
    pub fill_opacity: OpacityEncoding,
    pub outline_color: String,
}

impl PaintSpec {
    pub fn new(selected: &SelectedDimension, fill_opacity: OpacityEncoding) -> Self {
        Self {
            dimension: selected.key.clone(),
            fill_color: selected.color,
            fill_opacity,
            outline_color: OUTLINE_COLOR.to_string(),
        }
    }

    /// Paint object in the layout MapLibre-style renderers expect
    pub fn to_style_json(&self) -> Value {
        json!({
            "fill-color": self.fill_color.to_hex(),
            "fill-opacity": self.fill_opacity.to_style_expression(&self.dimension),
            "fill-outline-color": self.outline_color,
        })
    }
}

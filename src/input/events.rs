use crate::core::geo::Point;
use crate::data::geojson::Feature;
use serde::{Deserialize, Serialize};

/// Pointer events delivered by the rendering collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer moved over the map. `features` are the rendered features under
    /// the pointer, topmost first.
    Move {
        position: Point,
        features: Vec<Feature>,
    },
    /// Pointer left the map
    Leave,
}

impl PointerEvent {
    pub fn moved(position: Point, features: Vec<Feature>) -> Self {
        PointerEvent::Move { position, features }
    }

    /// Gets the pixel position, if the pointer is over the map
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Move { position, .. } => Some(*position),
            PointerEvent::Leave => None,
        }
    }

    /// The topmost feature under the pointer
    pub fn topmost(&self) -> Option<&Feature> {
        match self {
            PointerEvent::Move { features, .. } => features.first(),
            PointerEvent::Leave => None,
        }
    }

    pub fn is_leave(&self) -> bool {
        matches!(self, PointerEvent::Leave)
    }
}

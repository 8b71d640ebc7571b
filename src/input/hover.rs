use crate::data::geojson::Feature;
use crate::input::events::PointerEvent;
use serde::{Deserialize, Serialize};

/// Feature under the pointer together with the pointer's pixel position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub feature: Feature,
    pub x: f64,
    pub y: f64,
}

/// Maps pointer events to hover state. Stateless: every event fully
/// replaces the previous result.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoverResolver;

impl HoverResolver {
    pub fn new() -> Self {
        Self
    }

    /// Topmost feature paired with the pointer coordinates, or `None` when
    /// nothing is under the pointer
    pub fn resolve(&self, event: &PointerEvent) -> Option<HoverState> {
        let (position, feature) = match event {
            PointerEvent::Move { position, features } => (*position, features.first()?),
            PointerEvent::Leave => return None,
        };

        log::debug!("hover at ({}, {})", position.x, position.y);

        Some(HoverState {
            feature: feature.clone(),
            x: position.x,
            y: position.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::data::geojson::Properties;
    use serde_json::json;

    fn named(name: &str) -> Feature {
        let mut properties = Properties::new();
        properties.insert("name".to_string(), json!(name));
        Feature::new(None, properties)
    }

    #[test]
    fn test_first_feature_wins() {
        let event = PointerEvent::moved(Point::new(10.0, 20.0), vec![named("Ohio"), named("Iowa")]);
        let state = HoverResolver::new().resolve(&event).unwrap();
        assert_eq!(state.feature, named("Ohio"));
        assert_eq!((state.x, state.y), (10.0, 20.0));
    }

    #[test]
    fn test_empty_features_clear_hover() {
        let event = PointerEvent::moved(Point::new(10.0, 20.0), Vec::new());
        assert!(HoverResolver::new().resolve(&event).is_none());
    }

    #[test]
    fn test_leave_clears_hover() {
        assert!(HoverResolver::new().resolve(&PointerEvent::Leave).is_none());
    }
}

use crate::style::catalog::DimensionCatalog;
use serde::{Deserialize, Serialize};

/// One entry of the dimension picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlOption {
    pub key: String,
    pub label: String,
}

/// What the host UI needs to render the dimension picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPanel {
    /// Title shown above the picker, usually the layer name
    pub name: String,
    /// Numeric dimensions in catalog order
    pub options: Vec<ControlOption>,
    /// Key selected when the panel first appears
    pub default_key: String,
}

impl ControlPanel {
    pub fn from_catalog(name: impl Into<String>, catalog: &DimensionCatalog) -> Self {
        Self {
            name: name.into(),
            options: catalog
                .numeric()
                .map(|d| ControlOption {
                    key: d.key.clone(),
                    label: d.label.clone(),
                })
                .collect(),
            default_key: catalog.default_dimension().key.clone(),
        }
    }

    pub fn option(&self, key: &str) -> Option<&ControlOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Builds the change event for a picked option
    pub fn pick(&self, key: &str) -> Option<DimensionChange> {
        self.option(key).map(|o| DimensionChange::new(o.key.clone()))
    }
}

/// Emitted by the host UI when the user picks a dimension. Only the key
/// travels; label and color are looked up again by the layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionChange {
    pub key: String,
}

impl DimensionChange {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::{Feature, FeatureCollection, Properties};
    use serde_json::json;

    fn catalog_from(properties: serde_json::Value) -> DimensionCatalog {
        let properties: Properties = match properties {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let collection = FeatureCollection::new(vec![Feature::new(None, properties)]);
        DimensionCatalog::discover(&collection).unwrap()
    }

    fn catalog() -> DimensionCatalog {
        catalog_from(json!({
            "cases": 1,
            "name": "Utah",
            "country": "USA",
            "casesPerOneMillion": 2
        }))
    }

    #[test]
    fn test_default_key_is_an_offered_option() {
        let catalog = catalog_from(json!({"country": "USA", "name": "Utah", "deaths": 3}));
        let panel = ControlPanel::from_catalog("COVID-19", &catalog);
        assert_eq!(panel.default_key, "deaths");
        assert!(panel.option(&panel.default_key).is_some());
    }

    #[test]
    fn test_panel_lists_numeric_dimensions() {
        let panel = ControlPanel::from_catalog("COVID-19", &catalog());
        assert_eq!(panel.name, "COVID-19");
        assert_eq!(panel.default_key, "cases");
        assert_eq!(
            panel.options,
            vec![
                ControlOption {
                    key: "cases".to_string(),
                    label: "Cases".to_string()
                },
                ControlOption {
                    key: "casesPerOneMillion".to_string(),
                    label: "Cases/Million".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_pick_only_offered_keys() {
        let panel = ControlPanel::from_catalog("COVID-19", &catalog());
        assert_eq!(
            panel.pick("casesPerOneMillion"),
            Some(DimensionChange::new("casesPerOneMillion"))
        );
        assert_eq!(panel.pick("country"), None);
        assert_eq!(panel.pick("name"), None);
    }
}

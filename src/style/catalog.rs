//! Dimension discovery
//!
//! A dataset's dimensions are the property keys of its first feature, minus
//! the reserved descriptive keys, in document order. Each gets a label and the
//! next palette color. The catalog is rebuilt from scratch for every dataset.

use crate::core::constants::RESERVED_KEYS;
use crate::data::geojson::FeatureCollection;
use crate::style::label::format_label;
use crate::style::palette::{palette_color, Color};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the values of a dimension look like across the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionKind {
    /// Every non-null value is a number
    Numeric,
    /// At least one string/bool/object value, or no values at all
    Other,
}

/// A property that can drive the visual encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub key: String,
    pub label: String,
    pub color: Color,
    pub kind: DimensionKind,
}

impl Dimension {
    pub fn is_numeric(&self) -> bool {
        self.kind == DimensionKind::Numeric
    }
}

/// Ordered set of dimensions for one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionCatalog {
    dimensions: Vec<Dimension>,
}

impl DimensionCatalog {
    /// Builds the catalog from the first feature's property keys.
    ///
    /// Fails with [`Error::EmptyDimensionSet`] when every key is reserved.
    pub fn discover(collection: &FeatureCollection) -> Result<Self> {
        let schema = collection.first().ok_or(Error::EmptyFeatureCollection)?;

        let dimensions: Vec<Dimension> = schema
            .property_keys()
            .filter(|key| !Self::is_reserved(key))
            .enumerate()
            .map(|(index, key)| Dimension {
                key: key.to_string(),
                label: format_label(key),
                color: palette_color(index),
                kind: value_kind(collection, key),
            })
            .collect();

        if dimensions.is_empty() {
            return Err(Error::EmptyDimensionSet);
        }

        log::info!(
            "discovered {} dimensions: {}",
            dimensions.len(),
            dimensions
                .iter()
                .map(|d| d.key.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self { dimensions })
    }

    /// Whether `key` describes a feature rather than measures it
    pub fn is_reserved(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }

    pub fn get(&self, key: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The default active dimension
    pub fn first(&self) -> &Dimension {
        // discover() never builds an empty catalog
        &self.dimensions[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dimension> {
        self.dimensions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.key.as_str())
    }

    /// Dimensions safe to classify
    pub fn numeric(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter().filter(|d| d.is_numeric())
    }

    /// The dimension shown before the user picks one: the first numeric
    /// entry, or the first entry when none is numeric
    pub fn default_dimension(&self) -> &Dimension {
        self.numeric().next().unwrap_or_else(|| self.first())
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Selection for `key` with label and color taken from the catalog
    pub fn select(&self, key: &str) -> Result<SelectedDimension> {
        self.get(key)
            .map(SelectedDimension::from)
            .ok_or_else(|| Error::UnknownDimension(key.to_string()))
    }
}

impl<'a> IntoIterator for &'a DimensionCatalog {
    type Item = &'a Dimension;
    type IntoIter = std::slice::Iter<'a, Dimension>;

    fn into_iter(self) -> Self::IntoIter {
        self.dimensions.iter()
    }
}

fn value_kind(collection: &FeatureCollection, key: &str) -> DimensionKind {
    let mut seen_number = false;
    for value in collection.iter().filter_map(|f| f.property(key)) {
        match value {
            Value::Number(_) => seen_number = true,
            Value::Null => {}
            _ => return DimensionKind::Other,
        }
    }
    if seen_number {
        DimensionKind::Numeric
    } else {
        DimensionKind::Other
    }
}

/// The dimension currently driving the layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedDimension {
    pub key: String,
    pub label: String,
    pub color: Color,
}

impl SelectedDimension {
    /// First catalog entry, label and color copied as-is
    pub fn initial(catalog: &DimensionCatalog) -> Self {
        Self::from(catalog.default_dimension())
    }
}

impl From<&Dimension> for SelectedDimension {
    fn from(dimension: &Dimension) -> Self {
        Self {
            key: dimension.key.clone(),
            label: dimension.label.clone(),
            color: dimension.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::{Feature, Properties};
    use serde_json::json;

    fn collection(rows: Vec<Value>) -> FeatureCollection {
        FeatureCollection::new(
            rows.into_iter()
                .map(|row| {
                    let properties: Properties = match row {
                        Value::Object(map) => map,
                        _ => Properties::new(),
                    };
                    Feature::new(None, properties)
                })
                .collect(),
        )
    }

    #[test]
    fn test_reserved_keys_excluded_in_order() {
        let data = collection(vec![json!({
            "_layerId": 1,
            "name": "Texas",
            "cases": 10,
            "density": 2.5,
            "todayCases": 3,
            "population": 100,
            "state": "TX",
            "updated": 1_600_000_000_000_i64,
            "casesPerOneMillion": 7
        })]);

        let catalog = DimensionCatalog::discover(&data).unwrap();
        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(keys, vec!["cases", "todayCases", "casesPerOneMillion"]);
        for reserved in RESERVED_KEYS {
            assert!(!catalog.contains(reserved));
        }
    }

    #[test]
    fn test_labels_and_colors_assigned() {
        let data = collection(vec![json!({"name": "A", "cases": 1, "todayCases": 2})]);
        let catalog = DimensionCatalog::discover(&data).unwrap();

        let cases = catalog.get("cases").unwrap();
        assert_eq!(cases.label, "Cases");
        assert_eq!(cases.color, palette_color(0));

        let today = catalog.get("todayCases").unwrap();
        assert_eq!(today.label, "Cases Today");
        assert_eq!(today.color, palette_color(1));
    }

    #[test]
    fn test_eleventh_dimension_reuses_first_color() {
        let mut row = serde_json::Map::new();
        for i in 0..11 {
            row.insert(format!("metric{}", i), json!(i));
        }
        let data = collection(vec![Value::Object(row)]);

        let catalog = DimensionCatalog::discover(&data).unwrap();
        assert_eq!(catalog.len(), 11);
        assert_eq!(
            catalog.get("metric10").unwrap().color,
            catalog.get("metric0").unwrap().color
        );
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let data = collection(vec![json!({"b": 1, "a": 2, "c": 3})]);
        let first = DimensionCatalog::discover(&data).unwrap();
        let second = DimensionCatalog::discover(&data).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.first().key, "b");
    }

    #[test]
    fn test_only_reserved_keys_fails() {
        let data = collection(vec![json!({"name": "A", "population": 5})]);
        assert!(matches!(
            DimensionCatalog::discover(&data),
            Err(Error::EmptyDimensionSet)
        ));
    }

    #[test]
    fn test_no_features_fails() {
        assert!(matches!(
            DimensionCatalog::discover(&FeatureCollection::default()),
            Err(Error::EmptyFeatureCollection)
        ));
    }

    #[test]
    fn test_value_kind() {
        let data = collection(vec![
            json!({"cases": 1, "country": "USA", "recovered": null}),
            json!({"cases": null, "country": "USA", "recovered": null}),
        ]);
        let catalog = DimensionCatalog::discover(&data).unwrap();
        assert!(catalog.get("cases").unwrap().is_numeric());
        assert!(!catalog.get("country").unwrap().is_numeric());
        assert!(!catalog.get("recovered").unwrap().is_numeric());
        assert_eq!(catalog.numeric().count(), 1);
    }

    #[test]
    fn test_initial_selection_copies_first_entry() {
        let data = collection(vec![json!({"name": "A", "active": 1, "cases": 2})]);
        let catalog = DimensionCatalog::discover(&data).unwrap();
        let selected = SelectedDimension::initial(&catalog);
        assert_eq!(selected.key, "active");
        assert_eq!(selected.label, "Active");
        assert_eq!(selected.color, palette_color(0));
    }

    #[test]
    fn test_initial_selection_skips_string_dimensions() {
        let data = collection(vec![json!({"country": "USA", "cases": 1, "deaths": 0})]);
        let catalog = DimensionCatalog::discover(&data).unwrap();
        assert_eq!(catalog.first().key, "country");

        let selected = SelectedDimension::initial(&catalog);
        assert_eq!(selected.key, "cases");
        assert_eq!(selected.label, "Cases");
        assert_eq!(selected.color, palette_color(1));
    }

    #[test]
    fn test_initial_selection_without_numeric_dimensions() {
        let data = collection(vec![json!({"country": "USA", "region": "West"})]);
        let catalog = DimensionCatalog::discover(&data).unwrap();
        assert_eq!(SelectedDimension::initial(&catalog).key, "country");
    }

    #[test]
    fn test_select_rederives_from_catalog() {
        let data = collection(vec![json!({"active": 1, "cases": 2})]);
        let catalog = DimensionCatalog::discover(&data).unwrap();

        let selected = catalog.select("cases").unwrap();
        assert_eq!(selected.color, palette_color(1));
        assert!(matches!(
            catalog.select("name"),
            Err(Error::UnknownDimension(k)) if k == "name"
        ));
    }
}

use crate::core::geo::LatLngBounds;
use crate::{Error, Result};
use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Feature properties in document order
pub type Properties = serde_json::Map<String, Value>;

/// A GeoJSON position. Ordinates past longitude/latitude are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    fn to_coord(self) -> geo_types::Coord<f64> {
        geo_types::Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(ordinates: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match ordinates.as_slice() {
            [lng, lat, ..] => Ok(Self::new(*lng, *lat)),
            _ => Err(format!("position needs at least 2 ordinates, got {}", ordinates.len())),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        vec![position.lng, position.lat]
    }
}

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// Converts into the `geo` crate's geometry model
    pub fn to_geo(&self) -> geo_types::Geometry<f64> {
        match self {
            Geometry::Point { coordinates } => {
                geo_types::Point::from(coordinates.to_coord()).into()
            }
            Geometry::LineString { coordinates } => line_string(coordinates).into(),
            Geometry::Polygon { coordinates } => polygon(coordinates).into(),
            Geometry::MultiPoint { coordinates } => geo_types::MultiPoint(
                coordinates
                    .iter()
                    .map(|p| geo_types::Point::from(p.to_coord()))
                    .collect(),
            )
            .into(),
            Geometry::MultiLineString { coordinates } => {
                geo_types::MultiLineString(coordinates.iter().map(|l| line_string(l)).collect())
                    .into()
            }
            Geometry::MultiPolygon { coordinates } => {
                geo_types::MultiPolygon(coordinates.iter().map(|p| polygon(p)).collect()).into()
            }
            Geometry::GeometryCollection { geometries } => {
                geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection(
                    geometries.iter().map(Geometry::to_geo).collect(),
                ))
            }
        }
    }

    /// Bounding box of every coordinate, `None` for empty geometries
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.to_geo().bounding_rect().map(LatLngBounds::from)
    }
}

fn line_string(coordinates: &[Position]) -> geo_types::LineString<f64> {
    geo_types::LineString::new(coordinates.iter().map(|p| p.to_coord()).collect())
}

fn polygon(rings: &[Vec<Position>]) -> geo_types::Polygon<f64> {
    let mut rings = rings.iter().map(|r| line_string(r));
    let exterior = rings
        .next()
        .unwrap_or_else(|| geo_types::LineString::new(Vec::new()));
    geo_types::Polygon::new(exterior, rings.collect())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionType {
    #[default]
    FeatureCollection,
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Properties) -> Self {
        Self {
            kind: FeatureType::Feature,
            id: None,
            geometry,
            properties: Some(properties),
        }
    }

    /// Looks up a property value
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    /// Property keys in document order
    pub fn property_keys(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .flat_map(|p| p.keys().map(String::as_str))
    }

    pub fn numeric_property(&self, key: &str) -> Option<f64> {
        self.property(key).and_then(Value::as_f64)
    }
}

/// Ordered collection of features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            features,
        }
    }

    /// Parses a bare FeatureCollection
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The schema source for dimension discovery
    pub fn first(&self) -> Option<&Feature> {
        self.features.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Gets the bounding box of all features
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(Geometry::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// One entry of a map document's layer list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapLayer {
    #[serde(default)]
    pub source: Option<FeatureCollection>,
}

/// Map document as served to the viewer: `{ "layers": [ { "source": ... } ] }`.
/// Only the first layer's source is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub layers: Vec<MapLayer>,
}

impl MapDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Wraps a collection as a single-layer document
    pub fn from_collection(collection: FeatureCollection) -> Self {
        Self {
            layers: vec![MapLayer {
                source: Some(collection),
            }],
        }
    }

    pub fn source(&self) -> Option<&FeatureCollection> {
        self.layers.first().and_then(|l| l.source.as_ref())
    }

    pub fn into_source(self) -> Result<FeatureCollection> {
        self.layers
            .into_iter()
            .next()
            .and_then(|l| l.source)
            .ok_or(Error::MissingSource)
    }
}

//! Quantized opacity for the active dimension
//!
//! The domain `[min, max]` of the selected dimension is split into five equal
//! buckets. Each bucket's lower bound becomes a breakpoint, so the encoding is
//! a monotone step function that a renderer can evaluate per feature.

use crate::core::constants::{BASE_OPACITY, FLAT_OPACITY, OPACITY_RAMP};
use crate::data::geojson::FeatureCollection;
use crate::style::catalog::SelectedDimension;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Piecewise-constant mapping from a dimension value to fill opacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpacityEncoding {
    /// Same opacity for every feature
    Constant(f64),
    /// `default` below the first breakpoint, then the opacity of the last
    /// breakpoint not greater than the value
    Step {
        default: f64,
        stops: Vec<(f64, f64)>,
    },
}

impl OpacityEncoding {
    /// Opacity for a single value. NaN falls into the default bucket.
    pub fn evaluate(&self, value: f64) -> f64 {
        match self {
            OpacityEncoding::Constant(opacity) => *opacity,
            OpacityEncoding::Step { default, stops } => stops
                .iter()
                .take_while(|(breakpoint, _)| value >= *breakpoint)
                .last()
                .map_or(*default, |(_, opacity)| *opacity),
        }
    }

    pub fn breakpoints(&self) -> Vec<f64> {
        match self {
            OpacityEncoding::Constant(_) => Vec::new(),
            OpacityEncoding::Step { stops, .. } => stops.iter().map(|(b, _)| *b).collect(),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, OpacityEncoding::Constant(_))
    }

    /// Array-encoded style expression reading `key` from each feature:
    /// `["step", ["get", key], default, b0, o0, ...]`, or a bare number.
    pub fn to_style_expression(&self, key: &str) -> Value {
        match self {
            OpacityEncoding::Constant(opacity) => json!(opacity),
            OpacityEncoding::Step { default, stops } => {
                let mut expression = vec![json!("step"), json!(["get", key]), json!(default)];
                for (breakpoint, opacity) in stops {
                    expression.push(json!(breakpoint));
                    expression.push(json!(opacity));
                }
                Value::Array(expression)
            }
        }
    }
}

/// Builds opacity encodings from a fixed opacity ramp
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityClassifier {
    ramp: Vec<f64>,
    base: f64,
    flat: f64,
}

impl Default for OpacityClassifier {
    fn default() -> Self {
        Self {
            ramp: OPACITY_RAMP.to_vec(),
            base: BASE_OPACITY,
            flat: FLAT_OPACITY,
        }
    }
}

impl OpacityClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies the selected dimension over every feature
    pub fn classify(
        &self,
        collection: &FeatureCollection,
        dimension: &SelectedDimension,
    ) -> Result<OpacityEncoding> {
        let domain = self.domain(collection, &dimension.key)?;
        Ok(self.encode(domain))
    }

    /// `(min, max)` of the numeric values, `None` if there are none.
    /// Nulls and missing properties are skipped.
    fn domain(&self, collection: &FeatureCollection, key: &str) -> Result<Option<(f64, f64)>> {
        let mut extent: Option<(f64, f64)> = None;

        for value in collection.iter().filter_map(|f| f.property(key)) {
            let number = match value {
                Value::Null => continue,
                Value::Number(n) => n.as_f64(),
                other => {
                    return Err(Error::NonNumericDimension {
                        key: key.to_string(),
                        value: other.to_string(),
                    })
                }
            };
            let Some(number) = number.filter(|n| !n.is_nan()) else {
                continue;
            };
            extent = Some(match extent {
                None => (number, number),
                Some((min, max)) => (min.min(number), max.max(number)),
            });
        }

        Ok(extent)
    }

    fn encode(&self, domain: Option<(f64, f64)>) -> OpacityEncoding {
        let (min, max) = match domain {
            Some((min, max)) if min < max => (min, max),
            _ => return OpacityEncoding::Constant(self.flat),
        };

        let levels = self.ramp.len();
        let stops = self
            .ramp
            .iter()
            .enumerate()
            .map(|(i, opacity)| (lower_bound(i, levels, min, max), *opacity))
            .collect();

        OpacityEncoding::Step {
            default: self.base,
            stops,
        }
    }
}

/// Lower edge of bucket `i` out of `levels` over `[min, max]`.
/// Each bound is scaled before subtracting so finite domains never overflow.
fn lower_bound(i: usize, levels: usize, min: f64, max: f64) -> f64 {
    if i == 0 {
        return min;
    }
    let n = levels as f64;
    min + i as f64 * (max / n - min / n)
}

/// Classifies with the standard opacity ramp
pub fn classify(
    collection: &FeatureCollection,
    dimension: &SelectedDimension,
) -> Result<OpacityEncoding> {
    OpacityClassifier::default().classify(collection, dimension)
}

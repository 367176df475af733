//! Heatmap layers.
//!
//! Each configured heatmap is described by a [`HeatmapSpec`]: the list it is
//! bound to, an expression telling where the points come from, and optional
//! JSON layer options. Specs are turned into [`Heatmap`] candidates by
//! [`derive_candidates`], and [`HeatmapResolver`] decides when those
//! candidates are (re)committed as the layers to draw.

mod expression;
mod resolver;

pub use expression::{ExpressionError, FieldPath, PointExpression};
pub use resolver::{
    CompleteDataFilter, Generation, HeatmapFilter, HeatmapResolver, ResolveError, Resolution,
    ResolutionOutcome, ResolverStats,
};

use maps_source::ListValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::LatLng;

/// A heatmap sample. Serialized as `[lat, lng]` or `[lat, lng, weight]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "PointRepr", try_from = "PointRepr")]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
    pub weight: Option<f64>,
}

impl HeatmapPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            weight: None,
        }
    }

    pub fn weighted(lat: f64, lng: f64, weight: f64) -> Self {
        Self {
            lat,
            lng,
            weight: Some(weight),
        }
    }

    pub fn location(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Valid coordinates and, if present, a finite non-negative weight.
    pub fn is_valid(&self) -> bool {
        self.location().is_valid() && self.weight.map_or(true, |w| w.is_finite() && w >= 0.0)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Plain(f64, f64),
    Weighted(f64, f64, f64),
}

impl From<HeatmapPoint> for PointRepr {
    fn from(point: HeatmapPoint) -> Self {
        match point.weight {
            Some(weight) => PointRepr::Weighted(point.lat, point.lng, weight),
            None => PointRepr::Plain(point.lat, point.lng),
        }
    }
}

impl TryFrom<PointRepr> for HeatmapPoint {
    type Error = String;

    fn try_from(repr: PointRepr) -> Result<Self, Self::Error> {
        let point = match repr {
            PointRepr::Plain(lat, lng) => HeatmapPoint::new(lat, lng),
            PointRepr::Weighted(lat, lng, weight) => HeatmapPoint::weighted(lat, lng, weight),
        };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(format!("point out of range: [{}, {}]", point.lat, point.lng))
        }
    }
}

/// Configuration of one heatmap layer, re-supplied on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSpec {
    pub data_source: ListValue,
    pub raw_value_expression: String,
    #[serde(default)]
    pub options: Option<String>,
}

impl HeatmapSpec {
    pub fn new(data_source: ListValue, raw_value_expression: impl Into<String>) -> Self {
        Self {
            data_source,
            raw_value_expression: raw_value_expression.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// A heatmap layer. `data` is `None` when the points could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub data: Option<Vec<HeatmapPoint>>,
    pub options: Option<Value>,
}

/// Turn specs into heatmap candidates.
///
/// Specs whose list is not available yet are dropped. A spec with a broken
/// expression still yields a candidate, with `data: None`, so one bad layer
/// does not take the others down.
pub fn derive_candidates(specs: &[HeatmapSpec]) -> Vec<Heatmap> {
    specs
        .iter()
        .filter(|spec| spec.data_source.is_available())
        .map(|spec| {
            let data = match spec.raw_value_expression.parse::<PointExpression>() {
                Ok(expression) => Some(expression.evaluate(&spec.data_source.items)),
                Err(error) => {
                    tracing::warn!(
                        expression = %spec.raw_value_expression,
                        error = %error,
                        "Invalid heatmap expression"
                    );
                    None
                }
            };

            Heatmap {
                data,
                options: parse_options(spec.options.as_deref()),
            }
        })
        .collect()
}

fn parse_options(raw: Option<&str>) -> Option<Value> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::error!(error = %error, "Invalid heatmap options");
            None
        }
    }
}

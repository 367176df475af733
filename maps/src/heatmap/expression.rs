//! Point expressions for heatmap layers.
//!
//! A heatmap is configured with an expression string that says where its
//! points come from. Two forms are accepted:
//!
//! - a JSON literal list of points, `[[lat, lng], [lat, lng, weight], ...]`,
//!   which is constant and does not read the list items;
//! - a comma separated list of attribute names, `lat, lng` or
//!   `lat, lng, weight`, read from every item of the bound list.
//!
//! Expressions are parsed into a [`PointExpression`] and run by
//! [`PointExpression::evaluate`]; nothing is ever executed as code.

use std::fmt;
use std::str::FromStr;

use maps_source::ObjectItem;
use thiserror::Error;

use super::HeatmapPoint;

#[derive(Error, Debug)]
pub enum ExpressionError {
    #[error("expression is empty")]
    Empty,

    #[error("invalid point literal: {0}")]
    InvalidLiteral(#[from] serde_json::Error),

    #[error("invalid attribute name: {0:?}")]
    InvalidField(String),

    #[error("expected 2 or 3 attribute names, got {0}")]
    Arity(usize),
}

/// Name of an attribute on a list item, e.g. `Latitude` or `Geo.Location/Lat`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn read(&self, item: &ObjectItem) -> Option<f64> {
        item.get(&self.0).and_then(|value| value.as_f64())
    }
}

impl FromStr for FieldPath {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let starts_well = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let rest_ok = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/'));

        if starts_well && rest_ok {
            Ok(Self(name.to_string()))
        } else {
            Err(ExpressionError::InvalidField(name.to_string()))
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointExpression {
    Literal(Vec<HeatmapPoint>),
    Fields {
        latitude: FieldPath,
        longitude: FieldPath,
        weight: Option<FieldPath>,
    },
}

impl FromStr for PointExpression {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ExpressionError::Empty);
        }

        if raw.starts_with('[') {
            let points: Vec<HeatmapPoint> = serde_json::from_str(raw)?;
            return Ok(Self::Literal(points));
        }

        let fields = raw
            .split(',')
            .map(str::parse::<FieldPath>)
            .collect::<Result<Vec<_>, _>>()?;

        let count = fields.len();
        let mut fields = fields.into_iter();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(latitude), Some(longitude), weight, None) => Ok(Self::Fields {
                latitude,
                longitude,
                weight,
            }),
            _ => Err(ExpressionError::Arity(count)),
        }
    }
}

impl PointExpression {
    /// Produce the points for one heatmap.
    ///
    /// Items that lack a numeric latitude/longitude (or weight, when one is
    /// configured) or fall outside the valid coordinate range are skipped.
    pub fn evaluate(&self, items: &[ObjectItem]) -> Vec<HeatmapPoint> {
        match self {
            Self::Literal(points) => points.clone(),
            Self::Fields {
                latitude,
                longitude,
                weight,
            } => items
                .iter()
                .filter_map(|item| {
                    let point = HeatmapPoint {
                        lat: latitude.read(item)?,
                        lng: longitude.read(item)?,
                        weight: match weight {
                            Some(field) => Some(field.read(item)?),
                            None => None,
                        },
                    };
                    if point.is_valid() {
                        Some(point)
                    } else {
                        tracing::debug!(item = %item.id, "Skipping out of range heatmap point");
                        None
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, lat: f64, lng: f64) -> ObjectItem {
        ObjectItem::new(id).with("Lat", lat).with("Lng", lng)
    }

    #[test]
    fn parses_literal_points() {
        let expr: PointExpression = "[[1, 2], [3, 4, 0.5]]".parse().unwrap();
        assert_eq!(
            expr,
            PointExpression::Literal(vec![
                HeatmapPoint::new(1.0, 2.0),
                HeatmapPoint::weighted(3.0, 4.0, 0.5),
            ])
        );
    }

    #[test]
    fn literal_ignores_items() {
        let expr: PointExpression = "[[1,2]]".parse().unwrap();
        assert_eq!(expr.evaluate(&[]), vec![HeatmapPoint::new(1.0, 2.0)]);
        assert_eq!(
            expr.evaluate(&[item("a", 5.0, 5.0), item("b", 6.0, 6.0)]),
            vec![HeatmapPoint::new(1.0, 2.0)]
        );
    }

    #[test]
    fn rejects_bad_literals() {
        assert!(matches!(
            "[[1]]".parse::<PointExpression>(),
            Err(ExpressionError::InvalidLiteral(_))
        ));
        assert!(matches!(
            "[[100, 0]]".parse::<PointExpression>(),
            Err(ExpressionError::InvalidLiteral(_))
        ));
        assert!(matches!(
            "[[1, 2".parse::<PointExpression>(),
            Err(ExpressionError::InvalidLiteral(_))
        ));
    }

    #[test]
    fn parses_field_lists() {
        let expr: PointExpression = " Lat , Lng ".parse().unwrap();
        assert_eq!(
            expr,
            PointExpression::Fields {
                latitude: "Lat".parse().unwrap(),
                longitude: "Lng".parse().unwrap(),
                weight: None,
            }
        );

        let expr: PointExpression = "Geo.Point/Lat,Geo.Point/Lng,Weight".parse().unwrap();
        let PointExpression::Fields { weight, .. } = expr else {
            panic!("expected fields");
        };
        assert_eq!(weight.map(|w| w.to_string()), Some("Weight".to_string()));
    }

    #[test]
    fn rejects_bad_field_lists() {
        assert!(matches!("".parse::<PointExpression>(), Err(ExpressionError::Empty)));
        assert!(matches!("Lat".parse::<PointExpression>(), Err(ExpressionError::Arity(1))));
        assert!(matches!(
            "a,b,c,d".parse::<PointExpression>(),
            Err(ExpressionError::Arity(4))
        ));
        assert!(matches!(
            "Lat, alert(1)".parse::<PointExpression>(),
            Err(ExpressionError::InvalidField(name)) if name == "alert(1)"
        ));
        assert!(matches!(
            "Lat,,Lng".parse::<PointExpression>(),
            Err(ExpressionError::InvalidField(_))
        ));
    }

    #[test]
    fn fields_read_every_item() {
        let expr: PointExpression = "Lat,Lng".parse().unwrap();
        let items = vec![
            item("a", 1.0, 2.0),
            ObjectItem::new("b").with("Lat", "3.5").with("Lng", "4.5"),
            ObjectItem::new("c").with("Lat", 1.0),
            ObjectItem::new("d").with("Lat", "north").with("Lng", 1.0),
            item("e", 95.0, 0.0),
        ];

        assert_eq!(
            expr.evaluate(&items),
            vec![HeatmapPoint::new(1.0, 2.0), HeatmapPoint::new(3.5, 4.5)]
        );
    }

    #[test]
    fn weighted_fields_require_weight() {
        let expr: PointExpression = "Lat,Lng,W".parse().unwrap();
        let items = vec![
            item("a", 1.0, 2.0).with("W", 3.0),
            item("b", 1.0, 2.0),
        ];

        assert_eq!(expr.evaluate(&items), vec![HeatmapPoint::weighted(1.0, 2.0, 3.0)]);
    }
}

//! Offset configuration and its normalization into a per-anchor table.
//!
//! An offset may be given as nothing, a single distance, a single vector or a
//! map of per-anchor vectors. Whatever the shape, it is normalized once into
//! an [`AnchorOffsets`] table with a vector for each of the nine anchors.

use super::anchor::Anchor;
use crate::error::{OverlayError, Result};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Caller-supplied offset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum OffsetSpec {
    /// Distance away from the point in the direction of the anchor. Corner
    /// anchors split it evenly across both axes.
    Uniform(f64),
    /// Same pixel offset for every anchor.
    Vector(DVec2),
    /// Per-anchor pixel offsets; missing anchors get no offset.
    PerAnchor(BTreeMap<Anchor, DVec2>),
}

impl OffsetSpec {
    /// Builds the nine-entry offset table.
    ///
    /// Fails if any component is NaN or infinite.
    pub fn normalize(&self) -> Result<AnchorOffsets> {
        match self {
            OffsetSpec::Uniform(offset) => {
                let offset = finite(*offset, "offset")?;
                let corner = (0.5 * offset * offset).sqrt().round();
                Ok(AnchorOffsets::from_fn(|anchor| match anchor {
                    Anchor::Center => DVec2::ZERO,
                    Anchor::Top => DVec2::new(0.0, offset),
                    Anchor::Bottom => DVec2::new(0.0, -offset),
                    Anchor::Left => DVec2::new(offset, 0.0),
                    Anchor::Right => DVec2::new(-offset, 0.0),
                    Anchor::TopLeft => DVec2::new(corner, corner),
                    Anchor::TopRight => DVec2::new(-corner, corner),
                    Anchor::BottomLeft => DVec2::new(corner, -corner),
                    Anchor::BottomRight => DVec2::new(-corner, -corner),
                }))
            }
            OffsetSpec::Vector(v) => {
                let v = finite_vec(*v, "offset")?;
                Ok(AnchorOffsets::from_fn(|_| v))
            }
            OffsetSpec::PerAnchor(map) => {
                for (anchor, v) in map {
                    finite_vec(*v, anchor.as_str())?;
                }
                Ok(AnchorOffsets::from_fn(|anchor| {
                    map.get(&anchor).copied().unwrap_or(DVec2::ZERO)
                }))
            }
        }
    }
}

/// Normalizes an optional offset; no offset means zero for every anchor.
pub fn normalize_offset(spec: Option<&OffsetSpec>) -> Result<AnchorOffsets> {
    match spec {
        Some(spec) => spec.normalize(),
        None => Ok(AnchorOffsets::default()),
    }
}

fn finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OverlayError::InvalidOffset(format!(
            "{} must be finite, got {}",
            what, value
        )))
    }
}

fn finite_vec(v: DVec2, what: &str) -> Result<DVec2> {
    finite(v.x, what)?;
    finite(v.y, what)?;
    Ok(v)
}

/// Parses `[x, y]` or `{"x": .., "y": ..}`.
fn parse_vector(value: &Value, what: &str) -> Result<DVec2> {
    let invalid = || {
        OverlayError::InvalidOffset(format!(
            "{} must be a [x, y] array or an {{x, y}} object, got {}",
            what, value
        ))
    };

    match value {
        Value::Array(items) => match items.as_slice() {
            [x, y] => Ok(DVec2::new(
                x.as_f64().ok_or_else(invalid)?,
                y.as_f64().ok_or_else(invalid)?,
            )),
            _ => Err(invalid()),
        },
        Value::Object(map) if is_point_object(map) => Ok(DVec2::new(
            map["x"].as_f64().ok_or_else(invalid)?,
            map["y"].as_f64().ok_or_else(invalid)?,
        )),
        _ => Err(invalid()),
    }
}

fn is_point_object(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.contains_key("x") && map.contains_key("y")
}

impl TryFrom<Value> for OffsetSpec {
    type Error = OverlayError;

    fn try_from(value: Value) -> Result<Self> {
        match &value {
            Value::Number(n) => n.as_f64().map(OffsetSpec::Uniform).ok_or_else(|| {
                OverlayError::InvalidOffset(format!("offset {} is not representable", n))
            }),
            Value::Array(_) => parse_vector(&value, "offset").map(OffsetSpec::Vector),
            Value::Object(map) if is_point_object(map) => {
                parse_vector(&value, "offset").map(OffsetSpec::Vector)
            }
            Value::Object(map) => {
                let mut offsets = BTreeMap::new();
                for (key, v) in map {
                    let anchor: Anchor = key.parse().map_err(|_| {
                        OverlayError::InvalidOffset(format!(
                            "unknown anchor {:?} in offset map",
                            key
                        ))
                    })?;
                    if v.is_null() {
                        continue;
                    }
                    offsets.insert(anchor, parse_vector(v, &format!("offset for {}", key))?);
                }
                Ok(OffsetSpec::PerAnchor(offsets))
            }
            other => Err(OverlayError::InvalidOffset(format!(
                "expected a number, a [x, y] vector or a per-anchor map, got {}",
                other
            ))),
        }
    }
}

impl From<OffsetSpec> for Value {
    fn from(spec: OffsetSpec) -> Self {
        match spec {
            OffsetSpec::Uniform(offset) => Value::from(offset),
            OffsetSpec::Vector(v) => Value::from(vec![v.x, v.y]),
            OffsetSpec::PerAnchor(map) => Value::Object(
                map.into_iter()
                    .map(|(anchor, v)| (anchor.as_str().to_string(), Value::from(vec![v.x, v.y])))
                    .collect(),
            ),
        }
    }
}

/// Pixel offset for each of the nine anchors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorOffsets([DVec2; 9]);

impl AnchorOffsets {
    fn from_fn(mut f: impl FnMut(Anchor) -> DVec2) -> Self {
        let mut table = [DVec2::ZERO; 9];
        for anchor in Anchor::ALL {
            table[anchor as usize] = f(anchor);
        }
        Self(table)
    }

    pub fn get(&self, anchor: Anchor) -> DVec2 {
        self.0[anchor as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Anchor, DVec2)> + '_ {
        Anchor::ALL.into_iter().map(move |anchor| (anchor, self.get(anchor)))
    }
}

impl std::ops::Index<Anchor> for AnchorOffsets {
    type Output = DVec2;

    fn index(&self, anchor: Anchor) -> &DVec2 {
        &self.0[anchor as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: Value) -> Result<OffsetSpec> {
        OffsetSpec::try_from(value)
    }

    #[test]
    fn test_absent_offset_is_zero_everywhere() {
        let table = normalize_offset(None).unwrap();
        assert_eq!(table.iter().count(), 9);
        assert!(table.iter().all(|(_, v)| v == DVec2::ZERO));
    }

    #[test]
    fn test_uniform_offset() {
        let table = spec(json!(10)).unwrap().normalize().unwrap();
        assert_eq!(table[Anchor::Center], DVec2::ZERO);
        assert_eq!(table[Anchor::Top], DVec2::new(0.0, 10.0));
        assert_eq!(table[Anchor::Bottom], DVec2::new(0.0, -10.0));
        assert_eq!(table[Anchor::Left], DVec2::new(10.0, 0.0));
        assert_eq!(table[Anchor::Right], DVec2::new(-10.0, 0.0));
        assert_eq!(table[Anchor::TopLeft], DVec2::new(7.0, 7.0));
        assert_eq!(table[Anchor::TopRight], DVec2::new(-7.0, 7.0));
        assert_eq!(table[Anchor::BottomLeft], DVec2::new(7.0, -7.0));
        assert_eq!(table[Anchor::BottomRight], DVec2::new(-7.0, -7.0));
    }

    #[test]
    fn test_vector_offset_applies_to_all() {
        for value in [json!([25, -3]), json!({"x": 25, "y": -3})] {
            let table = spec(value).unwrap().normalize().unwrap();
            assert!(table.iter().all(|(_, v)| v == DVec2::new(25.0, -3.0)));
        }
    }

    #[test]
    fn test_per_anchor_offset_defaults_missing_to_zero() {
        let table = spec(json!({"top": [0, 12], "bottom-left": {"x": 3, "y": -4}, "left": null}))
            .unwrap()
            .normalize()
            .unwrap();
        assert_eq!(table[Anchor::Top], DVec2::new(0.0, 12.0));
        assert_eq!(table[Anchor::BottomLeft], DVec2::new(3.0, -4.0));
        assert_eq!(table[Anchor::Left], DVec2::ZERO);
        assert_eq!(table[Anchor::Center], DVec2::ZERO);
        assert_eq!(table.iter().count(), 9);
    }

    #[test]
    fn test_malformed_offsets_fail_fast() {
        let bad = [
            json!("10px"),
            json!(true),
            json!([1, 2, 3]),
            json!([1, "2"]),
            json!({"middle": [1, 2]}),
            json!({"top": 5}),
            json!({"top": [1]}),
        ];
        for value in bad {
            let result = spec(value.clone());
            assert!(
                matches!(result, Err(OverlayError::InvalidOffset(_))),
                "{} should be rejected, got {:?}",
                value,
                result
            );
        }
    }

    #[test]
    fn test_non_finite_offsets_rejected() {
        assert!(OffsetSpec::Uniform(f64::NAN).normalize().is_err());
        assert!(OffsetSpec::Vector(DVec2::new(1.0, f64::INFINITY))
            .normalize()
            .is_err());

        let mut map = BTreeMap::new();
        map.insert(Anchor::Right, DVec2::new(f64::NEG_INFINITY, 0.0));
        assert!(OffsetSpec::PerAnchor(map).normalize().is_err());
    }

    #[test]
    fn test_serde_roundtrip_through_options_json() {
        let spec: OffsetSpec = serde_json::from_value(json!({"top-right": [4, 5]})).unwrap();
        assert_eq!(serde_json::to_value(&spec).unwrap(), json!({"top-right": [4.0, 5.0]}));

        let err = serde_json::from_value::<OffsetSpec>(json!("far")).unwrap_err();
        assert!(err.to_string().contains("Invalid offset"));
    }
}

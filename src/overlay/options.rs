//! Overlay configuration.
//!
//! Options are a plain value: callers build one from defaults or JSON, and
//! every change goes through validation before it replaces the old value.

use super::anchor::Anchor;
use super::offset::{normalize_offset, AnchorOffsets, OffsetSpec};
use crate::error::{OverlayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration of an [`AnchoredOverlay`](super::AnchoredOverlay).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayOptions {
    /// Caller-assigned identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Add a close button to the content.
    pub close_button: bool,
    /// Detach when the map is clicked.
    pub close_on_click: bool,
    /// Add a tip element to the container.
    #[serde(alias = "showAngle")]
    pub show_tip: bool,
    /// Extra classes for the container, whitespace separated.
    pub class_name: String,
    /// Fixed anchor. `None` picks one on every update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<OffsetSpec>,
}

impl OverlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON, validating the offset and anchor shapes.
    pub fn from_json(value: Value) -> Result<Self> {
        Self::parse(value, "")
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_offset(mut self, offset: OffsetSpec) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_close_button(mut self, enabled: bool) -> Self {
        self.close_button = enabled;
        self
    }

    pub fn with_close_on_click(mut self, enabled: bool) -> Self {
        self.close_on_click = enabled;
        self
    }

    pub fn with_tip(mut self, enabled: bool) -> Self {
        self.show_tip = enabled;
        self
    }

    /// Offset table derived from `offset`.
    pub fn offsets(&self) -> Result<AnchorOffsets> {
        normalize_offset(self.offset.as_ref())
    }

    /// Reads a nested field by dot-separated path, e.g. `"offset.top"`.
    pub fn get(&self, path: &str) -> Option<Value> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current.clone())
    }

    /// Writes a nested field by dot-separated path, creating intermediate
    /// objects as needed.
    ///
    /// The result is validated as a whole; on error `self` is unchanged.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let segments = split_path(path)?;
        let mut json = serde_json::to_value(&*self).map_err(|e| OverlayError::InvalidOption {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| OverlayError::InvalidPath(path.to_string()))?;
        let mut current = &mut json;
        for segment in parents {
            current = object_entry(current).entry(segment.to_string()).or_insert(Value::Null);
        }
        object_entry(current).insert(last.to_string(), value);

        *self = Self::parse(json, path)?;
        Ok(())
    }

    fn parse(json: Value, path: &str) -> Result<Self> {
        if let Some(offset) = json.get("offset").filter(|v| !v.is_null()) {
            OffsetSpec::try_from(offset.clone())?;
        }
        if let Some(anchor) = json.get("anchor").and_then(Value::as_str) {
            anchor.parse::<Anchor>()?;
        }

        let options: Self =
            serde_json::from_value(json).map_err(|e| OverlayError::InvalidOption {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        options.offsets()?;
        Ok(options)
    }
}

fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(OverlayError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Returns `value` as an object, replacing it with an empty one if it is
/// anything else.
fn object_entry(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

//! Table-of-contents records — saved visibility and transparency of a layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::host::{Capability, HostLayer};
use crate::types::number;


/// Saved display state of one layer. Any field may be `None` when the layer
/// did not support the matching capability; `None` fields are never applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocRecord {
    pub layer_name: Option<String>,
    pub long_name: Option<String>,
    pub visible: Option<bool>,
    #[serde(default)]
    pub group_layer: bool,
    #[serde(
        default,
        serialize_with = "number::serialize_option",
        deserialize_with = "number::deserialize_option"
    )]
    pub transparency: Option<f64>,
}


impl TocRecord {
    pub fn capture(live: &dyn HostLayer) -> TocRecord {
        TocRecord {
            layer_name: live.supports(Capability::Name).then(|| live.name()),
            long_name: live.supports(Capability::LongName).then(|| live.long_name()),
            visible: live.supports(Capability::Visible).then(|| live.visible()),
            group_layer: live.is_group_layer(),
            transparency: live.supports(Capability::Transparency).then(|| live.transparency()),
        }
    }

    /// Lookup key: the long name, or the layer name for layers without one.
    pub fn key(&self) -> Option<String> {
        self.long_name
            .as_ref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.layer_name.as_ref().filter(|n| !n.is_empty()))
            .cloned()
    }

    /// Names are identifiers, not state, and are never written back.
    pub fn apply_to(&self, live: &mut dyn HostLayer) {
        if let Some(transparency) = self.transparency {
            if live.supports(Capability::Transparency) {
                live.set_transparency(transparency);
            }
        }
        if let Some(visible) = self.visible {
            if live.supports(Capability::Visible) {
                live.set_visible(visible);
            }
        }
    }

    pub fn to_persisted(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn from_persisted(value: &Value) -> Result<TocRecord, String> {
        TocRecord::deserialize(value).map_err(|e| format!("invalid toc record: {}", e))
    }
}


/// Lookup key of a live layer, computed the same way as `TocRecord::key`.
pub fn layer_key(live: &dyn HostLayer) -> Option<String> {
    let long_name = live
        .supports(Capability::LongName)
        .then(|| live.long_name())
        .filter(|n| !n.is_empty());
    long_name.or_else(|| {
        live.supports(Capability::Name)
            .then(|| live.name())
            .filter(|n| !n.is_empty())
    })
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

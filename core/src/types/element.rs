//! Element records — the saved state of one layout element.
//!
//! A record is built either by capturing a live `HostElement` or by reading
//! one persisted JSON object from the sidecar file. The kind tag is not part
//! of the persisted object; it is the key of the group the object sits in.

use std::fmt;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::host::{Capability, HostElement};
use crate::types::number;


/// The six kinds of layout element, in sidecar tag order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    DataFrame,
    Graphic,
    Legend,
    MapSurround,
    Picture,
    Text,
}


impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::DataFrame,
        ElementKind::Graphic,
        ElementKind::Legend,
        ElementKind::MapSurround,
        ElementKind::Picture,
        ElementKind::Text,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::DataFrame => "DATAFRAME_ELEMENT",
            ElementKind::Graphic => "GRAPHIC_ELEMENT",
            ElementKind::Legend => "LEGEND_ELEMENT",
            ElementKind::MapSurround => "MAPSURROUND_ELEMENT",
            ElementKind::Picture => "PICTURE_ELEMENT",
            ElementKind::Text => "TEXT_ELEMENT",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        ElementKind::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Name given to an unnamed or duplicate element, e.g. `TEXT_ELEMENT_LAYOUT_2`.
    pub fn synthesized_name(self, n: u32) -> String {
        format!("{}_LAYOUT_{}", self.tag(), n)
    }
}


impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}


/// Page-space size and anchor position shared by every element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub height: f64,
    pub width: f64,
    pub position_x: f64,
    pub position_y: f64,
}


/// Map extent of a data frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}


/// Kind-specific fields. `None` means the live element did not declare the
/// capability when the record was captured; such fields are never applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementDetails {
    DataFrame {
        extent: Option<Extent>,
    },
    Graphic,
    Legend {
        title: Option<String>,
    },
    MapSurround,
    Picture {
        source_image: Option<String>,
    },
    Text {
        angle: Option<f64>,
        font_size: Option<f64>,
        text: Option<String>,
    },
}


impl ElementDetails {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementDetails::DataFrame { .. } => ElementKind::DataFrame,
            ElementDetails::Graphic => ElementKind::Graphic,
            ElementDetails::Legend { .. } => ElementKind::Legend,
            ElementDetails::MapSurround => ElementKind::MapSurround,
            ElementDetails::Picture { .. } => ElementKind::Picture,
            ElementDetails::Text { .. } => ElementKind::Text,
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub name: String,
    pub frame: Frame,
    pub details: ElementDetails,
}


/// Every field any kind may persist. Kind-specific fields are picked out
/// after the kind is known.
#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "elementHeight", deserialize_with = "number::deserialize")]
    height: f64,
    #[serde(rename = "elementWidth", deserialize_with = "number::deserialize")]
    width: f64,
    #[serde(rename = "elementPositionX", deserialize_with = "number::deserialize")]
    position_x: f64,
    #[serde(rename = "elementPositionY", deserialize_with = "number::deserialize")]
    position_y: f64,
    #[serde(rename = "XMin", default, deserialize_with = "number::deserialize_option")]
    x_min: Option<f64>,
    #[serde(rename = "XMax", default, deserialize_with = "number::deserialize_option")]
    x_max: Option<f64>,
    #[serde(rename = "YMin", default, deserialize_with = "number::deserialize_option")]
    y_min: Option<f64>,
    #[serde(rename = "YMax", default, deserialize_with = "number::deserialize_option")]
    y_max: Option<f64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "sourceImage", default)]
    source_image: Option<String>,
    #[serde(default, deserialize_with = "number::deserialize_option")]
    angle: Option<f64>,
    #[serde(rename = "fontSize", default, deserialize_with = "number::deserialize_option")]
    font_size: Option<f64>,
    #[serde(default)]
    text: Option<String>,
}


impl ElementRecord {
    pub fn kind(&self) -> ElementKind {
        self.details.kind()
    }

    /// Read the current state of a live element. Unsupported optional
    /// properties become `None`. A missing name is recorded as empty; the
    /// capture pass replaces it before the record is stored.
    pub fn capture(live: &dyn HostElement) -> ElementRecord {
        let gated = |cap: Capability| live.supports(cap);
        let details = match live.kind() {
            ElementKind::DataFrame => ElementDetails::DataFrame {
                extent: gated(Capability::Extent).then(|| live.extent()),
            },
            ElementKind::Graphic => ElementDetails::Graphic,
            ElementKind::Legend => ElementDetails::Legend {
                title: gated(Capability::Title).then(|| live.title()),
            },
            ElementKind::MapSurround => ElementDetails::MapSurround,
            ElementKind::Picture => ElementDetails::Picture {
                source_image: gated(Capability::SourceImage).then(|| live.source_image()),
            },
            ElementKind::Text => ElementDetails::Text {
                angle: gated(Capability::Angle).then(|| live.angle()),
                font_size: gated(Capability::FontSize).then(|| live.font_size()),
                text: gated(Capability::Text).then(|| live.text()),
            },
        };
        ElementRecord {
            name: live.name().unwrap_or_default(),
            frame: live.frame(),
            details,
        }
    }

    /// Write the saved state onto a live element. Null fields and fields
    /// whose capability the live element lacks are left untouched.
    pub fn apply_to(&self, live: &mut dyn HostElement) {
        live.set_frame(self.frame);
        match &self.details {
            ElementDetails::DataFrame { extent } => {
                if let Some(extent) = extent {
                    if live.supports(Capability::Extent) {
                        live.set_extent(*extent);
                    }
                }
            }
            ElementDetails::Legend { title } => {
                if let Some(title) = title {
                    if live.supports(Capability::Title) {
                        live.set_title(title);
                    }
                }
            }
            ElementDetails::Picture { source_image } => {
                if let Some(path) = source_image {
                    if live.supports(Capability::SourceImage) {
                        live.set_source_image(path);
                    }
                }
            }
            ElementDetails::Text {
                angle,
                font_size,
                text,
            } => {
                if let (Some(angle), true) = (angle, live.supports(Capability::Angle)) {
                    live.set_angle(*angle);
                }
                if let (Some(size), true) = (font_size, live.supports(Capability::FontSize)) {
                    live.set_font_size(*size);
                }
                if let (Some(text), true) = (text, live.supports(Capability::Text)) {
                    live.set_text(text);
                }
            }
            ElementDetails::Graphic | ElementDetails::MapSurround => {}
        }
    }

    pub fn to_persisted(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out.insert("elementHeight".into(), number::to_json(self.frame.height));
        out.insert("elementWidth".into(), number::to_json(self.frame.width));
        out.insert("elementPositionX".into(), number::to_json(self.frame.position_x));
        out.insert("elementPositionY".into(), number::to_json(self.frame.position_y));
        match &self.details {
            ElementDetails::DataFrame { extent } => {
                out.insert("XMin".into(), number::option_to_json(extent.map(|e| e.x_min)));
                out.insert("XMax".into(), number::option_to_json(extent.map(|e| e.x_max)));
                out.insert("YMin".into(), number::option_to_json(extent.map(|e| e.y_min)));
                out.insert("YMax".into(), number::option_to_json(extent.map(|e| e.y_max)));
            }
            ElementDetails::Legend { title } => {
                out.insert("title".into(), json!(title));
            }
            ElementDetails::Picture { source_image } => {
                out.insert("sourceImage".into(), json!(source_image));
            }
            ElementDetails::Text {
                angle,
                font_size,
                text,
            } => {
                out.insert("angle".into(), number::option_to_json(*angle));
                out.insert("fontSize".into(), number::option_to_json(*font_size));
                out.insert("text".into(), json!(text));
            }
            ElementDetails::Graphic | ElementDetails::MapSurround => {}
        }
        out
    }

    /// Rehydrate a persisted record of the given kind. `fallback_name` is the
    /// group key the object was stored under, used when the object itself
    /// carries no name.
    pub fn from_persisted(
        kind: ElementKind,
        value: &Value,
        fallback_name: Option<&str>,
    ) -> Result<ElementRecord, String> {
        let raw = RawElement::deserialize(value)
            .map_err(|e| format!("invalid {} record: {}", kind, e))?;

        let name = raw
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| fallback_name.map(str::to_string))
            .ok_or_else(|| format!("{} record has no name", kind))?;

        let details = match kind {
            ElementKind::DataFrame => {
                let extent = match (raw.x_min, raw.x_max, raw.y_min, raw.y_max) {
                    (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) => Some(Extent {
                        x_min,
                        x_max,
                        y_min,
                        y_max,
                    }),
                    (None, None, None, None) => None,
                    _ => return Err(format!("{} '{}' has an incomplete extent", kind, name)),
                };
                ElementDetails::DataFrame { extent }
            }
            ElementKind::Graphic => ElementDetails::Graphic,
            ElementKind::Legend => ElementDetails::Legend { title: raw.title },
            ElementKind::MapSurround => ElementDetails::MapSurround,
            ElementKind::Picture => ElementDetails::Picture {
                source_image: raw.source_image,
            },
            ElementKind::Text => ElementDetails::Text {
                angle: raw.angle,
                font_size: raw.font_size,
                text: raw.text,
            },
        };

        Ok(ElementRecord {
            name,
            frame: Frame {
                height: raw.height,
                width: raw.width,
                position_x: raw.position_x,
                position_y: raw.position_y,
            },
            details,
        })
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

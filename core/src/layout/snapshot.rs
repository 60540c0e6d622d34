//! Layout snapshot — the saved element and table-of-contents state of one
//! named layout, and its sidecar JSON entry form.
//!
//! Element records are grouped by kind, then keyed by name, so the pair
//! (kind, name) is unique by construction. All six kind groups are always
//! present, possibly empty.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::layout::store::StoreFlags;
use crate::types::element::{ElementKind, ElementRecord};
use crate::types::toc::TocRecord;


#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    pub name: String,
    pub elements: BTreeMap<ElementKind, BTreeMap<String, ElementRecord>>,
    pub toc: BTreeMap<String, TocRecord>,
}


impl LayoutSnapshot {
    pub fn new(name: &str) -> Self {
        LayoutSnapshot {
            name: name.to_string(),
            elements: ElementKind::ALL
                .into_iter()
                .map(|k| (k, BTreeMap::new()))
                .collect(),
            toc: BTreeMap::new(),
        }
    }

    pub fn element(&self, kind: ElementKind, name: &str) -> Option<&ElementRecord> {
        self.elements.get(&kind).and_then(|group| group.get(name))
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert_element(&mut self, record: ElementRecord) -> Option<ElementRecord> {
        self.elements
            .entry(record.kind())
            .or_default()
            .insert(record.name.clone(), record)
    }

    pub fn toc_record(&self, key: &str) -> Option<&TocRecord> {
        self.toc.get(key)
    }

    pub fn insert_toc(&mut self, key: String, record: TocRecord) -> Option<TocRecord> {
        self.toc.insert(key, record)
    }

    pub fn element_count(&self) -> usize {
        self.elements.values().map(|g| g.len()).sum()
    }

    /// One sidecar array entry.
    pub fn to_persisted(&self, flags: StoreFlags) -> Value {
        let mut items = Map::new();
        for (kind, group) in &self.elements {
            let records: Map<String, Value> = group
                .iter()
                .map(|(name, record)| (name.clone(), Value::Object(record.to_persisted())))
                .collect();
            items.insert(kind.tag().to_string(), Value::Object(records));
        }
        let toc: Map<String, Value> = self
            .toc
            .iter()
            .map(|(key, record)| (key.clone(), Value::Object(record.to_persisted())))
            .collect();
        json!({
            "layout_name": self.name,
            "layout_items": items,
            "toc_items": toc,
            "toc_active": flags.toc_active,
            "lyr_active": flags.lyr_active,
        })
    }

    /// Parse one sidecar array entry, returning the snapshot and the flags
    /// stored alongside it.
    pub fn from_persisted(value: &Value) -> Result<(LayoutSnapshot, StoreFlags), String> {
        let entry = value
            .as_object()
            .ok_or_else(|| "layout entry is not an object".to_string())?;

        let name = entry
            .get("layout_name")
            .and_then(Value::as_str)
            .ok_or_else(|| "layout entry has no string 'layout_name'".to_string())?;
        let mut snapshot = LayoutSnapshot::new(name);

        match entry.get("layout_items") {
            None | Some(Value::Null) => {}
            Some(Value::Object(groups)) => {
                for (tag, group) in groups {
                    let kind = ElementKind::from_tag(tag)
                        .ok_or_else(|| format!("layout '{}': unknown element type '{}'", name, tag))?;
                    read_group(&mut snapshot, kind, group)?;
                }
            }
            Some(_) => return Err(format!("layout '{}': 'layout_items' is not an object", name)),
        }

        match entry.get("toc_items") {
            None | Some(Value::Null) => {}
            Some(Value::Object(items)) => {
                for (key, item) in items {
                    let record = TocRecord::from_persisted(item)
                        .map_err(|e| format!("layout '{}', toc item '{}': {}", name, key, e))?;
                    let lookup = record.key().unwrap_or_else(|| key.clone());
                    if snapshot.toc.contains_key(&lookup) {
                        return Err(format!("layout '{}': duplicate toc item '{}'", name, lookup));
                    }
                    snapshot.insert_toc(lookup, record);
                }
            }
            Some(_) => return Err(format!("layout '{}': 'toc_items' is not an object", name)),
        }

        let flags = StoreFlags {
            toc_active: read_flag(entry, "toc_active", name)?,
            lyr_active: read_flag(entry, "lyr_active", name)?,
        };
        Ok((snapshot, flags))
    }
}


/// Read one kind group. Current files key records by name; older files
/// wrote a plain array of records.
fn read_group(snapshot: &mut LayoutSnapshot, kind: ElementKind, group: &Value) -> Result<(), String> {
    let entries: Vec<(Option<&str>, &Value)> = match group {
        Value::Object(records) => records.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        Value::Array(records) => records.iter().map(|v| (None, v)).collect(),
        Value::Null => Vec::new(),
        _ => {
            return Err(format!(
                "layout '{}': group {} is neither an object nor an array",
                snapshot.name, kind
            ))
        }
    };
    for (key, value) in entries {
        let record = ElementRecord::from_persisted(kind, value, key)
            .map_err(|e| format!("layout '{}': {}", snapshot.name, e))?;
        if snapshot.element(kind, &record.name).is_some() {
            return Err(format!(
                "layout '{}': duplicate {} '{}'",
                snapshot.name, kind, record.name
            ));
        }
        snapshot.insert_element(record);
    }
    Ok(())
}


fn read_flag(entry: &Map<String, Value>, key: &str, layout: &str) -> Result<bool, String> {
    match entry.get(key) {
        None | Some(Value::Null) => Ok(true),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(format!("layout '{}': '{}' is not a boolean", layout, key)),
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

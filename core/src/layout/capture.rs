//! Layout capture — read the live document into a new `LayoutSnapshot`.
//!
//! Capture is not a pure read. Elements are matched by (kind, name) when a
//! layout is applied later, so every element must carry a name unique within
//! its kind. An element whose name is missing, empty, or already taken in
//! this pass is given a synthesized `{KIND_TAG}_LAYOUT_{n}` name, and that
//! name is written back onto the live element.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::Diagnostics;
use crate::host::HostDocument;
use crate::layout::snapshot::LayoutSnapshot;
use crate::types::element::{ElementKind, ElementRecord};
use crate::types::toc::TocRecord;


/// Capture every layout element and layer of `document` into a snapshot
/// named `name`. Renames unnamed or duplicate live elements in place.
pub fn capture_layout<D: HostDocument + ?Sized>(
    name: &str,
    document: &mut D,
    diags: &mut Diagnostics,
) -> LayoutSnapshot {
    let mut snapshot = LayoutSnapshot::new(name);
    let mut seen: HashMap<ElementKind, HashSet<String>> = HashMap::new();

    for element in document.layout_elements() {
        let kind = element.kind();
        let mut record = ElementRecord::capture(&*element);
        let names = seen.entry(kind).or_default();
        if record.name.is_empty() || names.contains(&record.name) {
            let fresh = unique_name(kind, names);
            diags.info(format!(
                "{} '{}' is not unique, renaming to '{}'",
                kind, record.name, fresh
            ));
            element.set_name(&fresh);
            record.name = fresh;
        }
        names.insert(record.name.clone());
        snapshot.insert_element(record);
    }

    for layer in document.layers() {
        let record = TocRecord::capture(&*layer);
        match record.key() {
            Some(key) => {
                if snapshot.insert_toc(key.clone(), record).is_some() {
                    diags.warn(format!("TOC item '{}' appears more than once, keeping the last", key));
                }
            }
            None => diags.warn("Skipping a layer with neither a long name nor a name"),
        }
    }

    snapshot
}


/// Smallest `n >= 1` whose synthesized name is not yet taken.
fn unique_name(kind: ElementKind, taken: &HashSet<String>) -> String {
    let mut n = 1;
    loop {
        let candidate = kind.synthesized_name(n);
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

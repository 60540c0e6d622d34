//! Layout store — every layout of one document, persisted as a JSON array in
//! a sidecar file next to the document.
//!
//! The file is rewritten wholesale on each save: the new contents go to a
//! temporary sibling which is then renamed over the destination, so a crash
//! mid-write never leaves a truncated sidecar behind.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::snapshot::LayoutSnapshot;


/// Store-wide switches written into every entry. On load they are taken
/// from the first entry only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreFlags {
    pub toc_active: bool,
    pub lyr_active: bool,
}

impl Default for StoreFlags {
    fn default() -> Self {
        StoreFlags {
            toc_active: true,
            lyr_active: true,
        }
    }
}


#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutStore {
    snapshots: Vec<LayoutSnapshot>,
    pub flags: StoreFlags,
}


impl LayoutStore {
    pub fn new() -> Self {
        LayoutStore::default()
    }

    /// Load the store at `path`. A missing file yields an empty store, and
    /// `[]` is written immediately so later loads find a well-formed file.
    pub fn load(path: &Path) -> LayoutResult<LayoutStore> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no layout file, creating an empty one");
            let store = LayoutStore::new();
            store.save(path)?;
            return Ok(store);
        }
        let text = fs::read_to_string(path).map_err(|e| LayoutError::persist(path, e))?;
        let store = LayoutStore::parse(&text, path)?;
        tracing::debug!(path = %path.display(), layouts = store.len(), "loaded layout file");
        Ok(store)
    }

    /// Parse sidecar text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> LayoutResult<LayoutStore> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| LayoutError::malformed(path, format!("invalid JSON: {}", e)))?;
        let entries = value
            .as_array()
            .ok_or_else(|| LayoutError::malformed(path, "expected a JSON array of layouts"))?;

        let mut store = LayoutStore::new();
        for (index, entry) in entries.iter().enumerate() {
            let (snapshot, flags) = LayoutSnapshot::from_persisted(entry)
                .map_err(|reason| LayoutError::malformed(path, format!("entry {}: {}", index, reason)))?;
            if store.contains(&snapshot.name) {
                return Err(LayoutError::malformed(
                    path,
                    format!("duplicate layout name '{}'", snapshot.name),
                ));
            }
            if index == 0 {
                store.flags = flags;
            }
            store.snapshots.push(snapshot);
        }
        Ok(store)
    }

    /// Serialized sidecar contents, pretty-printed with four-space indent.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let entries: Vec<Value> = self
            .snapshots
            .iter()
            .map(|s| s.to_persisted(self.flags))
            .collect();
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        Value::Array(entries).serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write the store to `path` atomically.
    pub fn save(&self, path: &Path) -> LayoutResult<()> {
        let contents = self
            .to_json()
            .map_err(|e| LayoutError::persist(path, e.into()))?;
        let tmp = TempFile::beside(path);
        let file = File::create(tmp.path()).map_err(|e| LayoutError::persist(path, e))?;
        write_synced(file, contents.as_bytes()).map_err(|e| LayoutError::persist(path, e))?;
        fs::rename(tmp.path(), path).map_err(|e| LayoutError::persist(path, e))?;
        tmp.keep();
        tracing::debug!(path = %path.display(), layouts = self.len(), "saved layout file");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LayoutSnapshot> {
        self.snapshots.iter().find(|s| s.name == name)
    }

    /// Insert a snapshot, or replace the one with the same name in place.
    /// Returns the replaced snapshot.
    pub fn put(&mut self, snapshot: LayoutSnapshot) -> Option<LayoutSnapshot> {
        match self.snapshots.iter_mut().find(|s| s.name == snapshot.name) {
            Some(slot) => Some(std::mem::replace(slot, snapshot)),
            None => {
                self.snapshots.push(snapshot);
                None
            }
        }
    }

    /// Remove a layout, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<LayoutSnapshot> {
        let index = self.snapshots.iter().position(|s| s.name == name)?;
        Some(self.snapshots.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Layout names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.snapshots.iter().map(|s| s.name.clone()).collect()
    }

    pub fn snapshots(&self) -> &[LayoutSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}


/// Sidecar path for a document: `<dir>/<stem>_layout.json`.
pub fn sidecar_path_for(document: &Path) -> LayoutResult<PathBuf> {
    let stem = document
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LayoutError::document_open(document, "path has no file name"))?;
    let dir = match document.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        return Err(LayoutError::document_open(
            document,
            format!("directory {} does not exist", dir.display()),
        ));
    }
    Ok(dir.join(format!("{}_layout.json", stem)))
}


fn write_synced(file: File, bytes: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}


/// Temporary sibling of a destination file, removed on drop unless kept.
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn beside(dest: &Path) -> TempFile {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "layout".to_string());
        TempFile {
            path: dest.with_file_name(format!(".{}.tmp", name)),
            armed: true,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// The file has been renamed into place; nothing to clean up.
    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_file_creates_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map_layout.json");
        let store = LayoutStore::load(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn save_then_load_preserves_order_and_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("map_layout.json");
        let mut store = LayoutStore::new();
        store.put(LayoutSnapshot::new("Zoomed"));
        store.put(LayoutSnapshot::new("Atlas"));
        store.flags = StoreFlags { toc_active: false, lyr_active: true };
        store.save(&path).unwrap();

        let loaded = LayoutStore::load(&path).unwrap();
        assert_eq!(loaded.names(), vec!["Zoomed", "Atlas"]);
        assert_eq!(loaded.flags, store.flags);
        assert_eq!(loaded, store);
    }

    #[test]
    fn output_uses_four_space_indent() {
        let mut store = LayoutStore::new();
        store.put(LayoutSnapshot::new("A"));
        let text = store.to_json().unwrap();
        assert!(text.starts_with("[\n    {\n        \"layout_name\""));
    }

    #[test]
    fn put_replaces_in_place() {
        let mut store = LayoutStore::new();
        store.put(LayoutSnapshot::new("A"));
        store.put(LayoutSnapshot::new("B"));
        let replaced = store.put(LayoutSnapshot::new("A"));
        assert!(replaced.is_some());
        assert_eq!(store.names(), vec!["A", "B"]);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut store = LayoutStore::new();
        for name in ["A", "B", "C"] {
            store.put(LayoutSnapshot::new(name));
        }
        assert!(store.remove("B").is_some());
        assert!(store.remove("B").is_none());
        assert_eq!(store.names(), vec!["A", "C"]);
    }

    #[test]
    fn flags_come_from_first_entry() {
        let text = r#"[
            {"layout_name": "A", "toc_active": false, "lyr_active": true},
            {"layout_name": "B", "toc_active": true, "lyr_active": false}
        ]"#;
        let store = LayoutStore::parse(text, Path::new("x.json")).unwrap();
        assert_eq!(store.flags, StoreFlags { toc_active: false, lyr_active: true });
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = LayoutStore::parse("[{", Path::new("x.json")).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedStore { .. }));
    }

    #[test]
    fn non_array_is_malformed() {
        let err = LayoutStore::parse("{}", Path::new("x.json")).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
    }

    #[test]
    fn duplicate_layout_names_are_malformed() {
        let text = r#"[{"layout_name": "A"}, {"layout_name": "A"}]"#;
        let err = LayoutStore::parse(text, Path::new("x.json")).unwrap_err();
        assert!(err.to_string().contains("duplicate layout name 'A'"));
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A directory at the destination makes the final rename fail.
        let dest = dir.path().join("map_layout.json");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep"), "x").unwrap();

        let err = LayoutStore::new().save(&dest).unwrap_err();
        assert!(matches!(err, LayoutError::Persist { .. }));
        assert!(!dir.path().join(".map_layout.json.tmp").exists());
    }

    #[test]
    fn sidecar_path_replaces_extension() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("County Map.mxd");
        let sidecar = sidecar_path_for(&doc).unwrap();
        assert_eq!(sidecar, dir.path().join("County Map_layout.json"));
    }

    #[test]
    fn sidecar_path_requires_existing_directory() {
        let err = sidecar_path_for(Path::new("/nonexistent/dir/map.mxd")).unwrap_err();
        assert!(matches!(err, LayoutError::DocumentOpen { .. }));
    }

    #[test]
    fn sidecar_path_requires_file_name() {
        let err = sidecar_path_for(Path::new("/")).unwrap_err();
        assert!(matches!(err, LayoutError::DocumentOpen { .. }));
    }
}

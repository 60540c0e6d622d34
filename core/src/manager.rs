use std::path::{Path, PathBuf};

use crate::command::Command;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{LayoutError, LayoutResult};
use crate::help;
use crate::host::HostDocument;
use crate::layout::apply::{self, ApplyOptions, ApplyReport};
use crate::layout::capture;
use crate::layout::store::{self, LayoutStore, StoreFlags};
use crate::response::Response;
use crate::types::config::ManagerSettings;


/// Central runtime for one document. Owns the document handle, its layout
/// store and the active layout, and dispatches console commands.
pub struct LayoutManager<D: HostDocument> {
    document: D,
    sidecar_path: PathBuf,
    store: LayoutStore,
    active: Option<String>,
    settings: ManagerSettings,
    diagnostics: Diagnostics,
    /// Diagnostics before this index have already reached the host console.
    console_mark: usize,
}


impl<D: HostDocument> LayoutManager<D> {
    pub fn activate(document: D) -> LayoutResult<Self> {
        Self::activate_with(document, ManagerSettings::default())
    }

    /// Load the document's sidecar (creating an empty one if absent) and
    /// apply its first layout, without auto-saving anything.
    pub fn activate_with(document: D, settings: ManagerSettings) -> LayoutResult<Self> {
        let sidecar_path = store::sidecar_path_for(document.file_path()).inspect_err(|e| {
            tracing::error!("{}", e);
        })?;
        let store = LayoutStore::load(&sidecar_path).inspect_err(|e| {
            tracing::error!("{}", e);
        })?;

        let mut settings = settings;
        if !store.is_empty() {
            settings.toc_active = store.flags.toc_active;
            settings.lyr_active = store.flags.lyr_active;
        }

        let mut manager = LayoutManager {
            document,
            sidecar_path,
            store,
            active: None,
            settings,
            diagnostics: Diagnostics::new(),
            console_mark: 0,
        };
        manager.diagnostics.info(format!(
            "Layout manager active for {} ({} layouts)",
            manager.sidecar_path.display(),
            manager.store.len()
        ));

        let result = match manager.store.names().into_iter().next() {
            Some(first) => manager.apply_named(&first).map(|_| ()),
            None => Ok(()),
        };
        manager.finish(result)?;
        Ok(manager)
    }

    // -----------------------------------------------------------------------
    // Layout operations
    // -----------------------------------------------------------------------

    /// Capture the document into a new layout and make it active.
    pub fn create_layout(&mut self, name: &str) -> LayoutResult<()> {
        let result = self.create_inner(name);
        self.finish(result)
    }

    /// A failed auto-save drops the new layout again and restores the
    /// previous active layout. Names synthesized during capture stay on the
    /// document.
    fn create_inner(&mut self, name: &str) -> LayoutResult<()> {
        if self.store.contains(name) {
            return Err(LayoutError::LayoutAlreadyExists(name.to_string()));
        }
        self.diagnostics.info(format!("Creating new layout '{}'", name));
        self.recapture(name);
        let previous = self.active.replace(name.to_string());
        if self.settings.auto_save {
            if let Err(e) = self.persist() {
                self.store.remove(name);
                self.active = previous;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Apply a saved layout. With auto-save on, the current active layout is
    /// re-captured and persisted first, even if `name` turns out not to exist.
    pub fn switch_layout(&mut self, name: &str) -> LayoutResult<ApplyReport> {
        let result = self.switch_inner(name);
        self.finish(result)
    }

    fn switch_inner(&mut self, name: &str) -> LayoutResult<ApplyReport> {
        if self.settings.auto_save {
            if let Some(active) = self.active.clone() {
                self.recapture(&active);
                self.persist()?;
            }
        }
        self.apply_named(name)
    }

    /// Re-capture the named layout, or the active one when `name` is `None`.
    pub fn update_layout(&mut self, name: Option<&str>) -> LayoutResult<()> {
        let result = self.update_inner(name);
        self.finish(result)
    }

    fn update_inner(&mut self, name: Option<&str>) -> LayoutResult<()> {
        let target = match name {
            Some(n) => n.to_string(),
            None => self.active.clone().ok_or(LayoutError::NoActiveLayout)?,
        };
        self.diagnostics.info(format!("Updating layout '{}'", target));
        self.recapture(&target);
        if self.settings.auto_save {
            self.persist()?;
        }
        Ok(())
    }

    /// Layout names in creation order.
    pub fn list_layouts(&self) -> Vec<String> {
        self.store.names()
    }

    /// Write every layout to the sidecar file.
    pub fn save(&mut self) -> LayoutResult<()> {
        let result = self.persist();
        self.finish(result)
    }

    fn persist(&mut self) -> LayoutResult<()> {
        self.store.flags = StoreFlags {
            toc_active: self.settings.toc_active,
            lyr_active: self.settings.lyr_active,
        };
        self.diagnostics
            .info(format!("Saving layouts to {}", self.sidecar_path.display()));
        self.store.save(&self.sidecar_path)
    }

    fn recapture(&mut self, name: &str) {
        let snapshot = capture::capture_layout(name, &mut self.document, &mut self.diagnostics);
        self.store.put(snapshot);
    }

    fn apply_named(&mut self, name: &str) -> LayoutResult<ApplyReport> {
        let snapshot = self
            .store
            .get(name)
            .ok_or_else(|| LayoutError::LayoutNotFound(name.to_string()))?;
        self.diagnostics.info(format!("Switching layout to '{}'", name));
        let options = ApplyOptions {
            elements: self.settings.lyr_active,
            toc: self.settings.toc_active,
            move_missing_off_screen: self.settings.move_missing_off_screen,
        };
        let report = apply::apply_layout(snapshot, &mut self.document, options, &mut self.diagnostics);
        self.active = Some(name.to_string());
        Ok(report)
    }

    /// Record a failed operation as an error diagnostic, then forward new
    /// diagnostics to the host console.
    fn finish<T>(&mut self, result: LayoutResult<T>) -> LayoutResult<T> {
        if let Err(e) = &result {
            self.diagnostics.error(e.to_string());
        }
        if self.document.is_interactive() {
            for diagnostic in self.diagnostics.since(self.console_mark) {
                self.document.write_console(diagnostic);
            }
        }
        self.console_mark = self.diagnostics.len();
        result
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn active_layout(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ManagerSettings {
        &mut self.settings
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn sidecar_path(&self) -> &Path {
        &self.sidecar_path
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Diagnostics emitted since the last drain.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    /// Take and clear accumulated diagnostics.
    pub fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.console_mark = 0;
        self.diagnostics.drain()
    }

    // -----------------------------------------------------------------------
    // Console dispatch
    // -----------------------------------------------------------------------

    /// The single dispatch method.
    pub fn execute(&mut self, cmd: Command) -> Response {
        match cmd {
            Command::Status => self.cmd_status(),
            Command::Help { topic } => Response::Ok {
                output: help::help_text(topic.as_deref()),
            },
            Command::LayoutCreate { name } => self
                .create_layout(&name)
                .map(|_| format!("Layout '{}' created", name))
                .into(),
            Command::LayoutSwitch { name } => self
                .switch_layout(&name)
                .map(|report| {
                    format!(
                        "Switched to '{}' ({} elements applied, {} parked, {} layers applied)",
                        name, report.elements_applied, report.elements_parked, report.layers_applied
                    )
                })
                .into(),
            Command::LayoutUpdate { name } => self
                .update_layout(name.as_deref())
                .map(|_| "Layout updated".to_string())
                .into(),
            Command::LayoutList => Response::Ok {
                output: self.list_layouts().join("\n"),
            },
            Command::LayoutSave => self
                .save()
                .map(|_| format!("Saved to {}", self.sidecar_path.display()))
                .into(),
        }
    }

    fn cmd_status(&self) -> Response {
        let status = serde_json::json!({
            "active": self.active,
            "layouts": self.store.names(),
            "sidecar": self.sidecar_path.display().to_string(),
            "settings": self.settings,
        });
        Response::Ok {
            output: status.to_string(),
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

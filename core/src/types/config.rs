use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSettings {
    /// Persist the sidecar after every change and re-capture the active
    /// layout before switching away from it. Default: true.
    #[serde(default = "enabled")]
    pub auto_save: bool,
    /// Park elements missing from the target layout to the right of the
    /// page instead of leaving them in place. Default: true.
    #[serde(default = "enabled")]
    pub move_missing_off_screen: bool,
    /// Apply table-of-contents state when switching. Default: true.
    #[serde(default = "enabled")]
    pub toc_active: bool,
    /// Apply layout element state when switching. Default: true.
    #[serde(default = "enabled")]
    pub lyr_active: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ManagerSettings {
    fn default() -> Self {
        ManagerSettings {
            auto_save: enabled(),
            move_missing_off_screen: enabled(),
            toc_active: enabled(),
            lyr_active: enabled(),
        }
    }
}

impl ManagerSettings {
    pub fn from_yaml_str(text: &str) -> LayoutResult<ManagerSettings> {
        if text.trim().is_empty() {
            return Ok(ManagerSettings::default());
        }
        serde_yaml::from_str(text).map_err(|e| LayoutError::Config(e.to_string()))
    }

    /// Load settings from a YAML file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> LayoutResult<ManagerSettings> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml_str(&text)
                .map_err(|e| LayoutError::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ManagerSettings::default()),
            Err(e) => Err(LayoutError::persist(path, e)),
        }
    }
}

//! Maplayout core — named page layouts for a map document.
//!
//! A `LayoutManager` binds to one open document, keeps its layouts in a
//! `<document>_layout.json` sidecar, and moves state between the document
//! and the saved layouts. Hosts plug in through the traits in `host`.

pub mod command;
pub mod diagnostics;
pub mod error;
pub mod help;
pub mod host;
pub mod layout;
pub mod manager;
pub mod response;
pub mod types;

pub use command::Command;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{LayoutError, LayoutResult};
pub use layout::apply::{ApplyOptions, ApplyReport};
pub use layout::snapshot::LayoutSnapshot;
pub use layout::store::{LayoutStore, StoreFlags};
pub use manager::LayoutManager;
pub use response::Response;
pub use types::config::ManagerSettings;

//! Host collaborator interface — the live document, its layout elements and
//! its table-of-contents layers.
//!
//! The mapping application owns these objects; this crate only reads and
//! writes their properties through the traits below. Optional properties are
//! gated by `supports(Capability)`: callers must check the capability before
//! calling the matching getter or setter, and hosts are free to return a
//! placeholder from getters they do not support.
//!
//! `memory` provides a plain in-process implementation used for headless
//! runs and tests.

pub mod memory;

use std::path::Path;

use crate::diagnostics::Diagnostic;
use crate::types::element::{ElementKind, Extent, Frame};


/// Optional properties a host object may or may not expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    // Layers
    Name,
    LongName,
    Visible,
    Transparency,
    // Layout elements
    Extent,
    Title,
    SourceImage,
    Text,
    Angle,
    FontSize,
}


/// A positioned element on the layout page.
pub trait HostElement {
    fn kind(&self) -> ElementKind;

    fn supports(&self, capability: Capability) -> bool;

    /// Current name. `None` or an empty string both mean "unnamed".
    fn name(&self) -> Option<String>;
    fn set_name(&mut self, name: &str);

    fn frame(&self) -> Frame;
    fn set_frame(&mut self, frame: Frame);

    fn extent(&self) -> Extent {
        Extent::default()
    }
    fn set_extent(&mut self, _extent: Extent) {}

    fn title(&self) -> String {
        String::new()
    }
    fn set_title(&mut self, _title: &str) {}

    fn source_image(&self) -> String {
        String::new()
    }
    fn set_source_image(&mut self, _path: &str) {}

    fn text(&self) -> String {
        String::new()
    }
    fn set_text(&mut self, _text: &str) {}

    fn angle(&self) -> f64 {
        0.0
    }
    fn set_angle(&mut self, _angle: f64) {}

    fn font_size(&self) -> f64 {
        0.0
    }
    fn set_font_size(&mut self, _size: f64) {}
}


/// A layer listed in the table of contents.
pub trait HostLayer {
    fn supports(&self, capability: Capability) -> bool;

    fn name(&self) -> String;
    fn long_name(&self) -> String;

    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Transparency in percent, 0–100.
    fn transparency(&self) -> f64;
    fn set_transparency(&mut self, transparency: f64);

    fn is_group_layer(&self) -> bool;
}


/// An open map document.
pub trait HostDocument {
    /// Path of the document file on disk. The layout sidecar lives next to it.
    fn file_path(&self) -> &Path;

    fn page_width(&self) -> f64;

    /// All layout elements in the host's listing order.
    fn layout_elements(&mut self) -> Vec<&mut dyn HostElement>;

    /// All layers in the host's listing order.
    fn layers(&mut self) -> Vec<&mut dyn HostLayer>;

    /// True when running inside the application's interactive session.
    fn is_interactive(&self) -> bool {
        false
    }

    fn refresh_table_of_contents(&mut self) {}

    fn refresh_active_view(&mut self) {}

    /// Print a diagnostic on the user-visible console. Only called in
    /// interactive sessions.
    fn write_console(&mut self, _diagnostic: &Diagnostic) {}
}

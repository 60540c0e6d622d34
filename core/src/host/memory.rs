//! Plain in-memory host for batch runs and tests.
//!
//! Optional properties are modelled as `Option` fields: a `Some` field means
//! the object supports the matching capability.

use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostic;
use crate::error::{LayoutError, LayoutResult};
use crate::host::{Capability, HostDocument, HostElement, HostLayer};
use crate::types::element::{ElementKind, Extent, Frame};


#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    pub kind: ElementKind,
    pub name: Option<String>,
    pub frame: Frame,
    pub extent: Option<Extent>,
    pub title: Option<String>,
    pub source_image: Option<String>,
    pub text: Option<String>,
    pub angle: Option<f64>,
    pub font_size: Option<f64>,
}


impl MemoryElement {
    pub fn new(kind: ElementKind, name: &str) -> Self {
        MemoryElement {
            name: Some(name.to_string()),
            ..MemoryElement::unnamed(kind)
        }
    }

    pub fn unnamed(kind: ElementKind) -> Self {
        MemoryElement {
            kind,
            name: None,
            frame: Frame {
                height: 1.0,
                width: 1.0,
                position_x: 0.0,
                position_y: 0.0,
            },
            extent: None,
            title: None,
            source_image: None,
            text: None,
            angle: None,
            font_size: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.frame.position_x = x;
        self.frame.position_y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.frame.width = width;
        self.frame.height = height;
        self
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_source_image(mut self, path: &str) -> Self {
        self.source_image = Some(path.to_string());
        self
    }

    pub fn with_text(mut self, text: &str, angle: f64, font_size: f64) -> Self {
        self.text = Some(text.to_string());
        self.angle = Some(angle);
        self.font_size = Some(font_size);
        self
    }
}


impl HostElement for MemoryElement {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Extent => self.extent.is_some(),
            Capability::Title => self.title.is_some(),
            Capability::SourceImage => self.source_image.is_some(),
            Capability::Text => self.text.is_some(),
            Capability::Angle => self.angle.is_some(),
            Capability::FontSize => self.font_size.is_some(),
            Capability::Name => true,
            Capability::LongName | Capability::Visible | Capability::Transparency => false,
        }
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    fn frame(&self) -> Frame {
        self.frame
    }

    fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    fn extent(&self) -> Extent {
        self.extent.unwrap_or_default()
    }

    fn set_extent(&mut self, extent: Extent) {
        self.extent = Some(extent);
    }

    fn title(&self) -> String {
        self.title.clone().unwrap_or_default()
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn source_image(&self) -> String {
        self.source_image.clone().unwrap_or_default()
    }

    fn set_source_image(&mut self, path: &str) {
        self.source_image = Some(path.to_string());
    }

    fn text(&self) -> String {
        self.text.clone().unwrap_or_default()
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    fn angle(&self) -> f64 {
        self.angle.unwrap_or_default()
    }

    fn set_angle(&mut self, angle: f64) {
        self.angle = Some(angle);
    }

    fn font_size(&self) -> f64 {
        self.font_size.unwrap_or_default()
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = Some(size);
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct MemoryLayer {
    pub name: Option<String>,
    pub long_name: Option<String>,
    pub visible: Option<bool>,
    pub transparency: Option<f64>,
    pub group_layer: bool,
}


impl MemoryLayer {
    /// A visible, opaque layer supporting every capability.
    pub fn new(long_name: &str) -> Self {
        MemoryLayer {
            name: Some(long_name.to_string()),
            long_name: Some(long_name.to_string()),
            visible: Some(true),
            transparency: Some(0.0),
            group_layer: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = self.visible.map(|_| false);
        self
    }

    pub fn with_transparency(mut self, transparency: f64) -> Self {
        self.transparency = Some(transparency);
        self
    }

    pub fn group(mut self) -> Self {
        self.group_layer = true;
        self
    }

    /// Drop support for one capability.
    pub fn without(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Name => self.name = None,
            Capability::LongName => self.long_name = None,
            Capability::Visible => self.visible = None,
            Capability::Transparency => self.transparency = None,
            _ => {}
        }
        self
    }
}


impl HostLayer for MemoryLayer {
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Name => self.name.is_some(),
            Capability::LongName => self.long_name.is_some(),
            Capability::Visible => self.visible.is_some(),
            Capability::Transparency => self.transparency.is_some(),
            _ => false,
        }
    }

    fn name(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    fn long_name(&self) -> String {
        self.long_name.clone().unwrap_or_default()
    }

    fn visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = Some(visible);
    }

    fn transparency(&self) -> f64 {
        self.transparency.unwrap_or_default()
    }

    fn set_transparency(&mut self, transparency: f64) {
        self.transparency = Some(transparency);
    }

    fn is_group_layer(&self) -> bool {
        self.group_layer
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    pub path: PathBuf,
    pub page_width: f64,
    pub elements: Vec<MemoryElement>,
    pub layers: Vec<MemoryLayer>,
    pub interactive: bool,
    /// Diagnostics written to the console in interactive mode.
    pub console: Vec<Diagnostic>,
    pub toc_refreshes: u32,
    pub view_refreshes: u32,
}


impl MemoryDocument {
    pub fn new(path: impl Into<PathBuf>, page_width: f64) -> Self {
        MemoryDocument {
            path: path.into(),
            page_width,
            elements: Vec::new(),
            layers: Vec::new(),
            interactive: false,
            console: Vec::new(),
            toc_refreshes: 0,
            view_refreshes: 0,
        }
    }

    /// Open an existing document file. Fails when `path` is not a file.
    pub fn open(path: &Path, page_width: f64) -> LayoutResult<Self> {
        if !path.is_file() {
            return Err(LayoutError::document_open(path, "not a readable file"));
        }
        Ok(MemoryDocument::new(path, page_width))
    }

    pub fn with_element(mut self, element: MemoryElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_layer(mut self, layer: MemoryLayer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn element(&self, kind: ElementKind, name: &str) -> Option<&MemoryElement> {
        self.elements
            .iter()
            .find(|e| e.kind == kind && e.name.as_deref() == Some(name))
    }

    pub fn element_mut(&mut self, kind: ElementKind, name: &str) -> Option<&mut MemoryElement> {
        self.elements
            .iter_mut()
            .find(|e| e.kind == kind && e.name.as_deref() == Some(name))
    }

    pub fn layer(&self, long_name: &str) -> Option<&MemoryLayer> {
        self.layers
            .iter()
            .find(|l| l.long_name.as_deref() == Some(long_name))
    }

    pub fn layer_mut(&mut self, long_name: &str) -> Option<&mut MemoryLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.long_name.as_deref() == Some(long_name))
    }
}


impl HostDocument for MemoryDocument {
    fn file_path(&self) -> &Path {
        &self.path
    }

    fn page_width(&self) -> f64 {
        self.page_width
    }

    fn layout_elements(&mut self) -> Vec<&mut dyn HostElement> {
        self.elements
            .iter_mut()
            .map(|e| e as &mut dyn HostElement)
            .collect()
    }

    fn layers(&mut self) -> Vec<&mut dyn HostLayer> {
        self.layers
            .iter_mut()
            .map(|l| l as &mut dyn HostLayer)
            .collect()
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn refresh_table_of_contents(&mut self) {
        self.toc_refreshes += 1;
    }

    fn refresh_active_view(&mut self) {
        self.view_refreshes += 1;
    }

    fn write_console(&mut self, diagnostic: &Diagnostic) {
        self.console.push(diagnostic.clone());
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

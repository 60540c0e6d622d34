//! Layout apply — push a saved `LayoutSnapshot` back onto the live document.
//!
//! Live elements are matched to saved records by (kind, name), live layers
//! by long name. Matches get the saved state. Unmatched elements are either
//! parked to the right of the page or left alone; unmatched layers are left
//! alone. Saved records with no live counterpart are ignored: applying a
//! layout never creates or deletes host objects.

use crate::diagnostics::Diagnostics;
use crate::host::HostDocument;
use crate::layout::snapshot::LayoutSnapshot;
use crate::types::toc::layer_key;


/// Gap left between the page edge and a parked element.
pub const PARK_MARGIN: f64 = 20.0;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Apply layout element state.
    pub elements: bool,
    /// Apply table-of-contents state.
    pub toc: bool,
    /// Park unmatched elements off the page.
    pub move_missing_off_screen: bool,
}


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub elements_applied: usize,
    pub elements_parked: usize,
    pub elements_unmatched: usize,
    pub layers_applied: usize,
    pub layers_unmatched: usize,
}


/// X position of an element parked off a page of width `page_width`.
pub fn parked_x(page_width: f64, current_x: f64) -> f64 {
    page_width + current_x + PARK_MARGIN
}


pub fn apply_layout<D: HostDocument + ?Sized>(
    snapshot: &LayoutSnapshot,
    document: &mut D,
    options: ApplyOptions,
    diags: &mut Diagnostics,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    if options.elements {
        diags.info(format!("Updating layout element properties from '{}'", snapshot.name));
        let page_width = document.page_width();
        for element in document.layout_elements() {
            let kind = element.kind();
            let name = element.name().unwrap_or_default();
            if let Some(record) = snapshot.element(kind, &name) {
                record.apply_to(element);
                report.elements_applied += 1;
                continue;
            }
            report.elements_unmatched += 1;
            if !options.move_missing_off_screen {
                diags.warn(format!("{} '{}' not found in layout", kind, name));
                continue;
            }
            let mut frame = element.frame();
            if frame.position_x >= page_width {
                diags.warn(format!("{} '{}' not found in layout, already off screen", kind, name));
                continue;
            }
            frame.position_x = parked_x(page_width, frame.position_x);
            element.set_frame(frame);
            report.elements_parked += 1;
            diags.warn(format!("{} '{}' not found in layout, moving off screen", kind, name));
        }
    }

    if options.toc {
        diags.info(format!("Updating table of contents from '{}'", snapshot.name));
        for layer in document.layers() {
            let key = layer_key(&*layer);
            match key.as_deref().and_then(|k| snapshot.toc_record(k)) {
                Some(record) => {
                    record.apply_to(layer);
                    report.layers_applied += 1;
                }
                None => {
                    let label = key.unwrap_or_else(|| "<unnamed>".to_string());
                    diags.warn(format!("TOC item '{}' is not in layout '{}'", label, snapshot.name));
                    report.layers_unmatched += 1;
                }
            }
        }
    }

    if (options.elements || options.toc) && document.is_interactive() {
        document.refresh_table_of_contents();
        document.refresh_active_view();
    }

    report
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::host::memory::{MemoryDocument, MemoryElement, MemoryLayer};
    use crate::layout::capture::capture_layout;
    use crate::types::element::ElementKind;

    const ALL: ApplyOptions = ApplyOptions {
        elements: true,
        toc: true,
        move_missing_off_screen: true,
    };

    fn base_doc() -> MemoryDocument {
        MemoryDocument::new("/tmp/map.mxd", 11.0)
            .with_element(MemoryElement::new(ElementKind::Text, "Title").at(1.0, 8.0).with_text("T", 0.0, 18.0))
            .with_element(MemoryElement::new(ElementKind::Legend, "Legend").at(7.0, 1.0).with_title("Key"))
            .with_layer(MemoryLayer::new("Roads"))
    }

    fn snapshot_of(document: &mut MemoryDocument) -> LayoutSnapshot {
        capture_layout("Saved", document, &mut Diagnostics::new())
    }

    #[test]
    fn matched_elements_get_saved_state() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        document.element_mut(ElementKind::Text, "Title").unwrap().frame.position_x = 5.0;
        document.element_mut(ElementKind::Legend, "Legend").unwrap().title = Some("Changed".into());

        let report = apply_layout(&snap, &mut document, ALL, &mut Diagnostics::new());
        assert_eq!(report.elements_applied, 2);
        assert_eq!(document.element(ElementKind::Text, "Title").unwrap().frame.position_x, 1.0);
        assert_eq!(document.element(ElementKind::Legend, "Legend").unwrap().title.as_deref(), Some("Key"));
    }

    #[test]
    fn unmatched_element_is_parked_right_of_page() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        let extra = MemoryElement::new(ElementKind::Graphic, "Box").at(2.5, 3.0).sized(1.0, 2.0);
        document.elements.push(extra.clone());

        let mut diags = Diagnostics::new();
        let report = apply_layout(&snap, &mut document, ALL, &mut diags);
        let parked = document.element(ElementKind::Graphic, "Box").unwrap();
        assert_eq!(parked.frame.position_x, 2.5 + 11.0 + PARK_MARGIN);
        assert_eq!(parked.frame.position_y, extra.frame.position_y);
        assert_eq!(parked.frame.width, extra.frame.width);
        assert_eq!(parked.frame.height, extra.frame.height);
        assert_eq!(report.elements_parked, 1);
        assert_eq!(diags.count(Severity::Warning), 1);
    }

    #[test]
    fn unmatched_element_stays_when_parking_disabled() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        document.elements.push(MemoryElement::new(ElementKind::Graphic, "Box").at(2.5, 3.0));
        let before = document.element(ElementKind::Graphic, "Box").unwrap().clone();

        let options = ApplyOptions { move_missing_off_screen: false, ..ALL };
        let mut diags = Diagnostics::new();
        let report = apply_layout(&snap, &mut document, options, &mut diags);
        assert_eq!(document.element(ElementKind::Graphic, "Box").unwrap(), &before);
        assert_eq!(report.elements_unmatched, 1);
        assert_eq!(report.elements_parked, 0);
        assert!(diags.entries().iter().any(|d| d.severity == Severity::Warning && d.message.contains("Box")));
    }

    #[test]
    fn applying_twice_matches_applying_once() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        document.element_mut(ElementKind::Text, "Title").unwrap().frame.position_y = 0.5;
        document.layer_mut("Roads").unwrap().visible = Some(false);
        document.elements.push(MemoryElement::new(ElementKind::Graphic, "Box").at(2.0, 2.0));

        apply_layout(&snap, &mut document, ALL, &mut Diagnostics::new());
        let once = document.clone();
        apply_layout(&snap, &mut document, ALL, &mut Diagnostics::new());
        assert_eq!(document.elements, once.elements);
        assert_eq!(document.layers, once.layers);
    }

    #[test]
    fn saved_records_without_live_element_are_not_created() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        document.elements.retain(|e| e.kind != ElementKind::Legend);
        let report = apply_layout(&snap, &mut document, ALL, &mut Diagnostics::new());
        assert_eq!(document.elements.len(), 1);
        assert_eq!(report.elements_applied, 1);
    }

    #[test]
    fn toc_state_is_restored() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        let roads = document.layer_mut("Roads").unwrap();
        roads.visible = Some(false);
        roads.transparency = Some(80.0);

        let report = apply_layout(&snap, &mut document, ALL, &mut Diagnostics::new());
        let roads = document.layer("Roads").unwrap();
        assert_eq!(roads.visible, Some(true));
        assert_eq!(roads.transparency, Some(0.0));
        assert_eq!(report.layers_applied, 1);
    }

    #[test]
    fn unknown_layer_is_left_alone_with_warning() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        document.layers.push(MemoryLayer::new("Hydrology").with_transparency(40.0));
        let mut diags = Diagnostics::new();
        let report = apply_layout(&snap, &mut document, ALL, &mut diags);
        assert_eq!(document.layer("Hydrology").unwrap().transparency, Some(40.0));
        assert_eq!(report.layers_unmatched, 1);
        assert!(diags.entries().iter().any(|d| d.message.contains("Hydrology")));
    }

    #[test]
    fn disabled_passes_touch_nothing() {
        let mut document = base_doc();
        let snap = snapshot_of(&mut document);
        document.element_mut(ElementKind::Text, "Title").unwrap().frame.position_x = 4.0;
        document.layer_mut("Roads").unwrap().visible = Some(false);
        let options = ApplyOptions { elements: false, toc: false, move_missing_off_screen: true };
        let report = apply_layout(&snap, &mut document, options, &mut Diagnostics::new());
        assert_eq!(report, ApplyReport::default());
        assert_eq!(document.element(ElementKind::Text, "Title").unwrap().frame.position_x, 4.0);
        assert_eq!(document.layer("Roads").unwrap().visible, Some(false));
    }

    #[test]
    fn interactive_session_refreshes_views() {
        let mut document = base_doc().interactive();
        let snap = snapshot_of(&mut document);
        apply_layout(&snap, &mut document, ALL, &mut Diagnostics::new());
        assert_eq!(document.toc_refreshes, 1);
        assert_eq!(document.view_refreshes, 1);

        let mut headless = base_doc();
        apply_layout(&snap, &mut headless, ALL, &mut Diagnostics::new());
        assert_eq!(headless.toc_refreshes, 0);
    }
}

use crate::core::LoadProgress;
use web_sys as web;

const LOADER_ID: &str = "loader-overlay";
const FILL_ID: &str = "loader-fill";
const PERCENT_ID: &str = "loader-percentage";

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADER_ID) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(LOADER_ID) {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Writes the percentage into the bar and label, then shows or hides the
/// overlay to match `progress`.
pub fn update(document: &web::Document, progress: &LoadProgress) {
    let pct = progress.percent();
    if let Some(fill) = document.get_element_by_id(FILL_ID) {
        _ = fill.set_attribute("style", &format!("width: {}%", pct));
    }
    if let Some(label) = document.get_element_by_id(PERCENT_ID) {
        label.set_text_content(Some(&format!("{}%", pct)));
    }
    if progress.overlay_visible() {
        show(document);
    } else {
        hide(document);
    }
}

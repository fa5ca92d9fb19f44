//! Navigation chrome, the debug switch and the apartment popup.

use crate::core::{
    plan_image_src, popup_rows, ApartmentRecord, ApartmentStore, DebugMode, PopupState,
};
use crate::dom;
use crate::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

const POPUP_ROOT_ID: &str = "apartment-popup-root";
const DEBUG_TOGGLE_ID: &str = "debug-toggle";
const MENU_BUTTON_ID: &str = "mobile-menu-button";
const MENU_ID: &str = "mobile-menu";
const CLOSE_ATTR: &str = "data-popup-close";

fn el(document: &web::Document, tag: &str, class: &str) -> Option<web::Element> {
    let e = document.create_element(tag).ok()?;
    e.set_class_name(class);
    Some(e)
}

/// Reflects debug mode on the switch: `on`/`off`, `aria-checked` and the
/// spoken label.
pub fn sync_debug_toggle(document: &web::Document, debug: DebugMode) {
    let on = debug.is_enabled();
    dom::set_class(document, DEBUG_TOGGLE_ID, "on", on);
    dom::set_class(document, DEBUG_TOGGLE_ID, "off", !on);
    if let Some(e) = document.get_element_by_id(DEBUG_TOGGLE_ID) {
        _ = e.set_attribute("aria-checked", if on { "true" } else { "false" });
        _ = e.set_attribute(
            "aria-label",
            if on {
                "Pogledaj površinu: ON"
            } else {
                "Pogledaj površinu: OFF"
            },
        );
    }
}

pub fn toggle_debug(viewer: &Rc<RefCell<Viewer>>, document: &web::Document) {
    let (on, debug) = {
        let mut v = viewer.borrow_mut();
        let on = v.toggle_debug();
        (on, v.debug)
    };
    sync_debug_toggle(document, debug);
    log::info!("[debug] click planes {}", if on { "shown" } else { "hidden" });
}

fn sync_menu(document: &web::Document, open: bool) {
    dom::set_class(document, MENU_ID, "open", open);
    dom::set_class(document, MENU_BUTTON_ID, "open", open);
    if let Some(b) = document.get_element_by_id(MENU_BUTTON_ID) {
        _ = b.set_attribute("aria-expanded", if open { "true" } else { "false" });
    }
}

fn wire_mobile_menu(document: &web::Document, viewer: &Rc<RefCell<Viewer>>) {
    let doc = document.clone();
    let v = viewer.clone();
    dom::add_click_listener(document, MENU_BUTTON_ID, move |_ev| {
        let open = v.borrow_mut().menu.toggle();
        sync_menu(&doc, open);
    });

    // Any link inside the menu closes it.
    let doc = document.clone();
    let v = viewer.clone();
    dom::add_click_listener(document, MENU_ID, move |ev| {
        let on_link = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|e| e.closest("a").ok().flatten())
            .is_some();
        if on_link {
            v.borrow_mut().menu.close();
            sync_menu(&doc, false);
        }
    });
}

fn wire_debug_toggle(document: &web::Document, viewer: &Rc<RefCell<Viewer>>) {
    let doc = document.clone();
    let v = viewer.clone();
    dom::add_click_listener(document, DEBUG_TOGGLE_ID, move |_ev| {
        toggle_debug(&v, &doc);
    });
}

fn wire_popup_close(document: &web::Document, viewer: &Rc<RefCell<Viewer>>) {
    let doc = document.clone();
    let v = viewer.clone();
    dom::add_click_listener(document, POPUP_ROOT_ID, move |ev| {
        let closing = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|e| e.closest(&format!("[{}]", CLOSE_ATTR)).ok().flatten())
            .is_some();
        if closing {
            v.borrow_mut().popup.close();
            clear_popup(&doc);
        }
    });
}

pub fn wire_chrome(document: &web::Document, viewer: &Rc<RefCell<Viewer>>) {
    wire_mobile_menu(document, viewer);
    wire_debug_toggle(document, viewer);
    wire_popup_close(document, viewer);
    sync_debug_toggle(document, viewer.borrow().debug);
}

fn clear_popup(document: &web::Document) {
    if let Some(root) = document.get_element_by_id(POPUP_ROOT_ID) {
        root.set_inner_html("");
    }
    dom::set_class(document, POPUP_ROOT_ID, "open", false);
}

/// Settles the popup state and redraws the popup to match it.
pub fn render_popup(document: &web::Document, popup: &mut PopupState, store: &ApartmentStore) {
    match popup.resolve(store) {
        Some(record) => {
            clear_popup(document);
            if build_popup(document, record).is_none() {
                log::warn!("[popup] could not build popup for {}", record.id);
                return;
            }
            dom::set_class(document, POPUP_ROOT_ID, "open", true);
        }
        None => clear_popup(document),
    }
}

fn build_popup(document: &web::Document, record: &ApartmentRecord) -> Option<()> {
    let root = document.get_element_by_id(POPUP_ROOT_ID)?;

    let backdrop = el(document, "div", "popup-backdrop")?;
    _ = backdrop.set_attribute(CLOSE_ATTR, "");
    root.append_child(&backdrop).ok()?;

    let panel = el(document, "div", "popup-panel")?;
    _ = panel.set_attribute("role", "dialog");
    _ = panel.set_attribute("aria-modal", "true");

    let close = el(document, "button", "popup-close")?;
    _ = close.set_attribute(CLOSE_ATTR, "");
    _ = close.set_attribute("type", "button");
    _ = close.set_attribute("aria-label", "Zatvori");
    close.set_text_content(Some("×"));
    panel.append_child(&close).ok()?;

    let img: web::HtmlImageElement = document.create_element("img").ok()?.dyn_into().ok()?;
    img.set_class_name(&format!("popup-plan {}", record.id));
    img.set_src(&plan_image_src(record));
    img.set_alt(&record.id);
    panel.append_child(&img).ok()?;

    let title = el(document, "h2", "popup-title")?;
    title.set_text_content(Some(record.id.as_str()));
    panel.append_child(&title).ok()?;

    let list = el(document, "dl", "popup-rows")?;
    for row in popup_rows(record) {
        let line = el(document, "div", "popup-row")?;
        let dt = el(document, "dt", "")?;
        dt.set_text_content(Some(row.label.as_ref()));
        let dd = el(document, "dd", "")?;
        dd.set_text_content(Some(row.value.as_str()));
        line.append_child(&dt).ok()?;
        line.append_child(&dd).ok()?;
        list.append_child(&line).ok()?;
    }
    panel.append_child(&list).ok()?;

    if let Some(href) = record.link.as_deref().filter(|l| !l.trim().is_empty()) {
        let a: web::HtmlAnchorElement = document.create_element("a").ok()?.dyn_into().ok()?;
        a.set_class_name("popup-link");
        a.set_href(href);
        a.set_target("_blank");
        a.set_rel("noopener noreferrer");
        a.set_text_content(Some("Pogledaj detalje"));
        panel.append_child(&a).ok()?;
    }

    root.append_child(&panel).ok()?;
    Some(())
}

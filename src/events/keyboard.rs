use crate::core::{is_debug_shortcut, KeyTarget};
use crate::ui;
use crate::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Classifies the element a key event came from.
#[inline]
pub fn key_target(ev: &web::KeyboardEvent) -> KeyTarget {
    let Some(target) = ev.target() else {
        return KeyTarget::Other;
    };
    if target.dyn_ref::<web::HtmlInputElement>().is_some() {
        KeyTarget::TextInput
    } else if target.dyn_ref::<web::HtmlTextAreaElement>().is_some() {
        KeyTarget::TextArea
    } else {
        KeyTarget::Other
    }
}

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    viewer: &Rc<RefCell<Viewer>>,
    document: &web::Document,
) {
    let key = ev.key();
    if is_debug_shortcut(&key, key_target(ev)) {
        log::info!("[keys] debug shortcut");
        ui::toggle_debug(viewer, document);
    }
}

pub fn wire_global_keydown(viewer: Rc<RefCell<Viewer>>, document: web::Document) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &viewer, &document);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

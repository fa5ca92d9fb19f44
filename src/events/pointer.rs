use crate::core::{screen_to_world_ray, CameraRig, DragMode, PointerGesture};
use crate::dom;
use crate::input;
use crate::ui;
use crate::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub viewer: Rc<RefCell<Viewer>>,
    pub gesture: Rc<RefCell<PointerGesture>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerleave(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
    wire_contextmenu(&w);
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web::EventTarget,
    kind: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Highlights the click region under the pointer, if it is the nearest hit.
fn update_hover(w: &InputWiring, ev: &web::MouseEvent) {
    let px = input::pointer_canvas_px(ev, &w.canvas);
    let mut guard = w.viewer.borrow_mut();
    let Viewer {
        building,
        hover,
        rig,
        ..
    } = &mut *guard;
    let Some(scene) = building.as_ref() else {
        return;
    };
    let ray = screen_to_world_ray(
        &rig.camera,
        w.canvas.width() as f32,
        w.canvas.height() as f32,
        px.x,
        px.y,
    );
    let region = scene.pick(&ray).and_then(|hit| hit.region);
    match region {
        Some(r) => hover.pointer_enter(scene, r),
        None => hover.pointer_leave(scene),
    }
    dom::set_body_cursor(
        &w.document,
        if region.is_some() { "pointer" } else { "default" },
    );
}

fn handle_click(w: &InputWiring, ev: &web::MouseEvent) {
    let px = input::pointer_canvas_px(ev, &w.canvas);
    let mut guard = w.viewer.borrow_mut();
    let Viewer {
        building,
        rig,
        popup,
        store,
        ..
    } = &mut *guard;
    let Some(scene) = building.as_ref() else {
        return;
    };
    let ray = screen_to_world_ray(
        &rig.camera,
        w.canvas.width() as f32,
        w.canvas.height() as f32,
        px.x,
        px.y,
    );
    let Some(id) = scene.clicked_apartment(&ray) else {
        return;
    };
    log::info!("[click] apartment {}", id);
    if !store.contains(id) {
        log::info!("[click] no record for {}", id);
    }
    popup.select(id);
    ui::render_popup(&w.document, popup, store);
}

fn apply_drag(rig: &mut CameraRig, mode: DragMode, dx: f32, dy: f32, viewport_h: f32) {
    let CameraRig {
        camera, controls, ..
    } = rig;
    match mode {
        DragMode::Rotate => controls.rotate(dx, dy, viewport_h),
        DragMode::Pan => controls.pan(camera, dx, dy, viewport_h),
    }
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let target: web::EventTarget = w.canvas.clone().into();
    listen(&target, "pointermove", move |ev: web::PointerEvent| {
        let css = input::pointer_css(&ev, &w.canvas);
        let drag = w.gesture.borrow_mut().move_to(css);
        if let Some((mode, delta)) = drag {
            let h = input::canvas_css_height(&w.canvas);
            apply_drag(&mut w.viewer.borrow_mut().rig, mode, delta.x, delta.y, h);
            return;
        }
        if !w.gesture.borrow().is_dragging() {
            update_hover(&w, &ev);
        }
    });
}

fn wire_pointerleave(w: &InputWiring) {
    let w = w.clone();
    let target: web::EventTarget = w.canvas.clone().into();
    listen(&target, "pointerleave", move |_ev: web::PointerEvent| {
        let mut guard = w.viewer.borrow_mut();
        let Viewer {
            building, hover, ..
        } = &mut *guard;
        if let Some(scene) = building.as_ref() {
            hover.pointer_leave(scene);
        }
        dom::set_body_cursor(&w.document, "default");
    });
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let target: web::EventTarget = w.canvas.clone().into();
    listen(&target, "pointerdown", move |ev: web::PointerEvent| {
        let Some(mode) = input::drag_mode_for(&ev) else {
            return;
        };
        let css = input::pointer_css(&ev, &w.canvas);
        w.gesture.borrow_mut().press(css, mode);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    });
}

fn wire_pointerup(w: &InputWiring) {
    let Some(wnd) = web::window() else {
        return;
    };
    let target: web::EventTarget = wnd.into();

    let up = w.clone();
    listen(&target, "pointerup", move |ev: web::PointerEvent| {
        let was_click = up.gesture.borrow_mut().release();
        if was_click {
            handle_click(&up, &ev);
        }
    });

    let cancel = w.clone();
    listen(&target, "pointercancel", move |_ev: web::PointerEvent| {
        cancel.gesture.borrow_mut().cancel();
    });
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let target: web::EventTarget = w.canvas.clone().into();
    listen(&target, "wheel", move |ev: web::WheelEvent| {
        w.viewer
            .borrow_mut()
            .rig
            .controls
            .dolly(ev.delta_y() as f32);
        ev.prevent_default();
    });
}

fn wire_contextmenu(w: &InputWiring) {
    let target: web::EventTarget = w.canvas.clone().into();
    listen(&target, "contextmenu", move |ev: web::MouseEvent| {
        ev.prevent_default();
    });
}

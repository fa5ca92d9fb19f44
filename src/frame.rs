use crate::constants::MAX_FRAME_DT_SEC;
use crate::core::LoadProgress;
use crate::overlay;
use crate::render::{self, SceneSlot};
use crate::viewer::Viewer;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub viewer: Rc<RefCell<Viewer>>,
    pub progress: Rc<RefCell<LoadProgress>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,

    pub last_instant: Instant,
    /// Scene revision currently on the GPU.
    pub uploaded_revision: Option<u32>,
    /// Last loader state written to the DOM.
    pub shown_progress: Option<(u32, bool)>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SEC);
        self.last_instant = now;

        self.update_loader();

        let mut guard = self.viewer.borrow_mut();
        let v = &mut *guard;

        let w = self.canvas.width();
        let h = self.canvas.height();
        if w > 0 && h > 0 {
            v.rig.camera.aspect = w as f32 / h as f32;
        }

        // Order matters: controller, collision, pan clamp, then hover tweens.
        v.rig.frame(v.building.as_ref());
        if let Some(scene) = v.building.as_mut() {
            v.hover.tick(scene, dt_sec);
        }

        if let Some(g) = &mut self.gpu {
            if self.uploaded_revision != Some(v.revision) {
                g.upload(SceneSlot::Ground, v.ground.as_ref());
                g.upload(SceneSlot::Building, v.building.as_ref());
                self.uploaded_revision = Some(v.revision);
            }
            g.resize_if_needed(w, h);
            if let Err(e) = g.render(&v.rig.camera, [v.ground.as_ref(), v.building.as_ref()]) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    fn update_loader(&mut self) {
        let p = self.progress.borrow();
        let state = (p.percent(), p.overlay_visible());
        if self.shown_progress != Some(state) {
            overlay::update(&self.document, &p);
            self.shown_progress = Some(state);
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#![cfg(target_arch = "wasm32")]
use crate::core::constants::{BUILDING_MODEL_URL, GROUND_MODEL_URL};
use crate::core::{
    process_building, process_static, ApartmentStore, LoadProgress, ModelTransform,
    PointerGesture, APARTMENTS_JSON,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod storage;
mod ui;
mod viewer;

use assets::AssetCache;
use viewer::Viewer;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn load_store() -> ApartmentStore {
    match ApartmentStore::from_json(APARTMENTS_JSON) {
        Ok(store) => {
            log::info!("[store] {} apartments", store.len());
            store
        }
        Err(e) => {
            log::error!("[store] apartment data rejected: {}", e);
            ApartmentStore::default()
        }
    }
}

/// Fetches both models in the background; each one is installed into the
/// viewer as soon as it is parsed.
fn spawn_model_loads(
    viewer: &Rc<RefCell<Viewer>>,
    cache: &Rc<RefCell<AssetCache>>,
    progress: &Rc<RefCell<LoadProgress>>,
) {
    let (v, c, p) = (viewer.clone(), cache.clone(), progress.clone());
    spawn_local(async move {
        match assets::load_scene(&c, &p, BUILDING_MODEL_URL).await {
            Ok(asset) => {
                let scene = process_building(&asset, &v.borrow().store);
                v.borrow_mut().set_building(scene);
            }
            Err(e) => log::error!("[assets] {}: {:?}", BUILDING_MODEL_URL, e),
        }
    });

    let (v, c, p) = (viewer.clone(), cache.clone(), progress.clone());
    spawn_local(async move {
        match assets::load_scene(&c, &p, GROUND_MODEL_URL).await {
            Ok(asset) => {
                let scene = process_static(&asset, &ModelTransform::default());
                v.borrow_mut().set_ground(scene);
            }
            Err(e) => log::error!("[assets] {}: {:?}", GROUND_MODEL_URL, e),
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("building-viewer starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let url_debug = core::url_debug_flag(&storage::location_search());
    let viewer = Rc::new(RefCell::new(Viewer::new(
        load_store(),
        storage::LocalStorage::open(),
        url_debug,
    )));
    log::info!("[debug] initial mode {}", viewer.borrow().debug.is_enabled());

    ui::wire_chrome(&document, &viewer);
    events::wire_global_keydown(viewer.clone(), document.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        document: document.clone(),
        viewer: viewer.clone(),
        gesture: Rc::new(RefCell::new(PointerGesture::new(
            constants::CLICK_DRAG_THRESHOLD_PX,
        ))),
    });

    let progress = Rc::new(RefCell::new(LoadProgress::default()));
    let cache = Rc::new(RefCell::new(AssetCache::default()));
    overlay::update(&document, &progress.borrow());
    spawn_model_loads(&viewer, &cache, &progress);

    let gpu = frame::init_gpu(&canvas).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        viewer,
        progress,
        canvas,
        document,
        gpu,
        last_instant: Instant::now(),
        uploaded_revision: None,
        shown_progress: None,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

use crate::core::{parse_glb, LoadProgress, SceneAsset};
use anyhow::{anyhow, bail};
use fnv::FnvHashMap;
use js_sys::{Reflect, Uint8Array};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
fn js_err(context: &str, e: JsValue) -> anyhow::Error {
    anyhow!("{}: {:?}", context, e)
}

/// Parsed assets keyed by URL. Entries are never mutated; callers clone what
/// they need to change.
#[derive(Default)]
pub struct AssetCache {
    scenes: FnvHashMap<String, Rc<SceneAsset>>,
}

impl AssetCache {
    pub fn get(&self, url: &str) -> Option<Rc<SceneAsset>> {
        self.scenes.get(url).cloned()
    }

    pub fn insert(&mut self, url: &str, asset: Rc<SceneAsset>) {
        self.scenes.insert(url.to_string(), asset);
    }
}

/// Streams `url` into memory, reporting `(loaded, total)` after each chunk.
pub async fn fetch_bytes(
    url: &str,
    mut on_progress: impl FnMut(u64, Option<u64>),
) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_err(url, e))?
        .dyn_into()
        .map_err(|e| js_err("not a Response", e))?;
    if !resp.ok() {
        bail!("{}: HTTP {}", url, resp.status());
    }
    let total = resp
        .headers()
        .get("content-length")
        .ok()
        .flatten()
        .and_then(|s| s.parse::<u64>().ok());

    let Some(body) = resp.body() else {
        let promise = resp.array_buffer().map_err(|e| js_err(url, e))?;
        let buf = JsFuture::from(promise).await.map_err(|e| js_err(url, e))?;
        let bytes = Uint8Array::new(&buf).to_vec();
        on_progress(bytes.len() as u64, Some(bytes.len() as u64));
        return Ok(bytes);
    };

    let reader: web::ReadableStreamDefaultReader = body
        .get_reader()
        .dyn_into()
        .map_err(|e| js_err("stream reader", e))?;
    let mut out = Vec::with_capacity(total.unwrap_or(0) as usize);
    loop {
        let chunk = JsFuture::from(reader.read())
            .await
            .map_err(|e| js_err(url, e))?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .map(|v| v.is_truthy())
            .unwrap_or(true);
        if done {
            break;
        }
        let value: Uint8Array = Reflect::get(&chunk, &JsValue::from_str("value"))
            .map_err(|e| js_err(url, e))?
            .dyn_into()
            .map_err(|e| js_err("chunk", e))?;
        let start = out.len();
        out.resize(start + value.length() as usize, 0);
        value.copy_to(&mut out[start..]);
        on_progress(out.len() as u64, total);
    }
    Ok(out)
}

/// Loads and parses a GLB once per URL. Progress is tracked for the loading
/// overlay; a failed load stays incomplete so the overlay remains visible.
pub async fn load_scene(
    cache: &Rc<RefCell<AssetCache>>,
    progress: &Rc<RefCell<LoadProgress>>,
    url: &str,
) -> anyhow::Result<Rc<SceneAsset>> {
    if let Some(asset) = cache.borrow().get(url) {
        return Ok(asset);
    }
    let handle = progress.borrow_mut().begin();
    let progress_cb = progress.clone();
    let result = fetch_bytes(url, move |loaded, total| {
        progress_cb.borrow_mut().update(handle, loaded, total);
    })
    .await
    .and_then(|bytes| parse_glb(&bytes).map_err(anyhow::Error::from));

    match result {
        Ok(asset) => {
            progress.borrow_mut().finish(handle);
            log::info!("[assets] {} loaded ({} meshes)", url, asset.meshes.len());
            let asset = Rc::new(asset);
            cache.borrow_mut().insert(url, asset.clone());
            Ok(asset)
        }
        Err(e) => {
            progress.borrow_mut().fail(handle);
            Err(e)
        }
    }
}

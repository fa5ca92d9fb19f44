use crate::core::StoragePort;
use web_sys as web;

/// `window.localStorage`, or nothing when the browser denies access (private
/// mode, sandboxed frames). Writes are then dropped.
pub struct LocalStorage {
    inner: Option<web::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web::window().and_then(|w| w.local_storage().ok().flatten());
        if inner.is_none() {
            log::warn!("[storage] localStorage unavailable; debug mode will not persist");
        }
        Self { inner }
    }
}

impl StoragePort for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(s) = &self.inner {
            if let Err(e) = s.set_item(key, value) {
                log::warn!("[storage] set {} failed: {:?}", key, e);
            }
        }
    }
}

/// The page's query string, e.g. `?debug=true`.
pub fn location_search() -> String {
    web::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

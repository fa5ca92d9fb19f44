//! Presentation state that does not depend on the DOM: popup selection,
//! debug mode with its persistence port, loading progress and the mobile
//! menu.

use super::apartments::{ApartmentRecord, ApartmentStore};
use super::constants::{DEBUG_QUERY_PARAM, DEBUG_STORAGE_KEY, OPACITY_DEBUG, OPACITY_HIDDEN};
use fnv::FnvHashMap;

/// Durable key-value storage (localStorage on the web).
pub trait StoragePort {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: FnvHashMap<String, String>,
    pub writes: usize,
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// `true` when the first `debug` parameter in the query string is `true`.
pub fn url_debug_flag(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == DEBUG_QUERY_PARAM)
        .map(|(_, v)| v == "true")
        .unwrap_or(false)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugMode {
    enabled: bool,
}

impl DebugMode {
    /// Reads the initial value. The URL flag wins over storage; nothing is
    /// written until the first toggle.
    pub fn initial(url_flag: bool, storage: &dyn StoragePort) -> Self {
        let stored = storage.get(DEBUG_STORAGE_KEY).as_deref() == Some("true");
        Self {
            enabled: url_flag || stored,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self, storage: &mut dyn StoragePort) -> bool {
        self.enabled = !self.enabled;
        storage.set(DEBUG_STORAGE_KEY, if self.enabled { "true" } else { "false" });
        self.enabled
    }

    /// Resting opacity of click regions in this mode.
    pub fn baseline_opacity(&self) -> f32 {
        if self.enabled {
            OPACITY_DEBUG
        } else {
            OPACITY_HIDDEN
        }
    }
}

/// Where a keydown originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyTarget {
    TextInput,
    TextArea,
    Other,
}

#[inline]
pub fn is_debug_shortcut(key: &str, target: KeyTarget) -> bool {
    matches!(key, "d" | "D") && target == KeyTarget::Other
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PopupState {
    #[default]
    NoSelection,
    Pending(String),
    Open(String),
}

impl PopupState {
    pub fn select(&mut self, apartment_id: &str) {
        *self = PopupState::Pending(apartment_id.to_string());
    }

    /// Settles a pending selection against the store. Unknown ids fall back
    /// to no selection.
    pub fn resolve<'s>(&mut self, store: &'s ApartmentStore) -> Option<&'s ApartmentRecord> {
        if let PopupState::Pending(id) = self {
            let id = std::mem::take(id);
            *self = if store.contains(&id) {
                PopupState::Open(id)
            } else {
                PopupState::NoSelection
            };
        }
        self.open_id().and_then(|id| store.get(id))
    }

    pub fn close(&mut self) {
        *self = PopupState::NoSelection;
    }

    pub fn open_id(&self) -> Option<&str> {
        match self {
            PopupState::Open(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PopupState::Open(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadPhase {
    Loading,
    Done,
    Failed,
}

#[derive(Clone, Copy, Debug)]
struct LoadItem {
    loaded: u64,
    total: Option<u64>,
    phase: LoadPhase,
}

impl LoadItem {
    fn fraction(&self) -> f64 {
        match (self.phase, self.total) {
            (LoadPhase::Done, _) => 1.0,
            (_, Some(t)) if t > 0 => (self.loaded as f64 / t as f64).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Aggregated progress of every asset requested so far.
#[derive(Clone, Debug, Default)]
pub struct LoadProgress {
    items: Vec<LoadItem>,
}

impl LoadProgress {
    pub fn begin(&mut self) -> usize {
        self.items.push(LoadItem {
            loaded: 0,
            total: None,
            phase: LoadPhase::Loading,
        });
        self.items.len() - 1
    }

    pub fn update(&mut self, handle: usize, loaded: u64, total: Option<u64>) {
        if let Some(it) = self.items.get_mut(handle) {
            it.loaded = loaded;
            it.total = total.or(it.total);
        }
    }

    pub fn finish(&mut self, handle: usize) {
        if let Some(it) = self.items.get_mut(handle) {
            it.phase = LoadPhase::Done;
        }
    }

    pub fn fail(&mut self, handle: usize) {
        if let Some(it) = self.items.get_mut(handle) {
            it.phase = LoadPhase::Failed;
        }
    }

    pub fn is_active(&self) -> bool {
        self.items.iter().any(|i| i.phase == LoadPhase::Loading)
    }

    /// Percentage in `[0, 100]`.
    pub fn percent(&self) -> u32 {
        if self.items.is_empty() {
            return 0;
        }
        let sum: f64 = self.items.iter().map(LoadItem::fraction).sum();
        let pct = (sum / self.items.len() as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u32
    }

    pub fn overlay_visible(&self) -> bool {
        self.is_active() || self.percent() < 100
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

//! Selection persistence backends.
//!
//! Both stores are best-effort: failures are logged and otherwise ignored.
//! Loads always complete on a later task so the result never re-enters a
//! session that is still being constructed.

use elementsnap_core::{ElementSnapshot, PERSIST_KEY, SelectionStore, SnapEvent};
use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use js_sys::Reflect;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use crate::chrome::{self, single_entry, stringify_js_error};
use crate::events::Dispatch;

/// `chrome.storage.local`, available to extension content scripts.
pub struct ExtensionStore {
    dispatch: Dispatch,
}

impl ExtensionStore {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }
}

async fn extension_load() -> Result<Option<Vec<ElementSnapshot>>, JsValue> {
    let key = JsValue::from_str(PERSIST_KEY);
    let items = JsFuture::from(chrome::storage_local_get(&key)?).await?;
    let entry = Reflect::get(&items, &key)?;
    if entry.is_undefined() || entry.is_null() {
        return Ok(None);
    }
    let snapshots = serde_wasm_bindgen::from_value(entry)?;
    Ok(Some(snapshots))
}

fn to_js(snapshots: &[ElementSnapshot]) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    snapshots.serialize(&serializer).map_err(JsValue::from)
}

impl SelectionStore for ExtensionStore {
    fn load(&mut self) {
        let dispatch = self.dispatch.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match extension_load().await {
                Ok(Some(snapshots)) => {
                    tracing::debug!(
                        count = snapshots.len(),
                        "restored selection from extension storage"
                    );
                    dispatch(SnapEvent::Restored(snapshots));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("extension storage load failed: {}", stringify_js_error(&e))
                }
            }
        });
    }

    fn save(&mut self, snapshots: &[ElementSnapshot]) {
        let promise = to_js(snapshots)
            .and_then(|value| single_entry(PERSIST_KEY, &value))
            .and_then(|items| chrome::storage_local_set(&items));
        settle("save", promise);
    }

    fn clear(&mut self) {
        settle(
            "clear",
            chrome::storage_local_remove(&JsValue::from_str(PERSIST_KEY)),
        );
    }
}

/// Await a storage promise in the background, logging a rejection.
fn settle(op: &'static str, promise: Result<js_sys::Promise, JsValue>) {
    let promise = match promise {
        Ok(promise) => promise,
        Err(e) => {
            tracing::warn!(op, "extension storage call failed: {}", stringify_js_error(&e));
            return;
        }
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            tracing::warn!(op, "extension storage call rejected: {}", stringify_js_error(&e));
        }
    });
}

/// `window.localStorage`, for plain page embedding.
pub struct LocalStore {
    dispatch: Dispatch,
}

impl LocalStore {
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }
}

impl SelectionStore for LocalStore {
    fn load(&mut self) {
        let dispatch = self.dispatch.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match LocalStorage::get::<Vec<ElementSnapshot>>(PERSIST_KEY) {
                Ok(snapshots) => {
                    tracing::debug!(
                        count = snapshots.len(),
                        "restored selection from localStorage"
                    );
                    dispatch(SnapEvent::Restored(snapshots));
                }
                Err(StorageError::KeyNotFound(_)) => {}
                Err(e) => tracing::warn!("localStorage load failed: {}", e),
            }
        });
    }

    fn save(&mut self, snapshots: &[ElementSnapshot]) {
        if let Err(e) = LocalStorage::set(PERSIST_KEY, snapshots) {
            tracing::warn!("localStorage save failed: {}", e);
        }
    }

    fn clear(&mut self) {
        LocalStorage::delete(PERSIST_KEY);
    }
}

/// Picks the extension store when the extension API is present.
pub enum BrowserStore {
    Extension(ExtensionStore),
    Local(LocalStore),
}

impl BrowserStore {
    pub fn detect(dispatch: Dispatch) -> Self {
        if chrome::is_extension() {
            BrowserStore::Extension(ExtensionStore::new(dispatch))
        } else {
            BrowserStore::Local(LocalStore::new(dispatch))
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, BrowserStore::Extension(_))
    }
}

impl SelectionStore for BrowserStore {
    fn load(&mut self) {
        match self {
            BrowserStore::Extension(store) => store.load(),
            BrowserStore::Local(store) => store.load(),
        }
    }

    fn save(&mut self, snapshots: &[ElementSnapshot]) {
        match self {
            BrowserStore::Extension(store) => store.save(snapshots),
            BrowserStore::Local(store) => store.save(snapshots),
        }
    }

    fn clear(&mut self) {
        match self {
            BrowserStore::Extension(store) => store.clear(),
            BrowserStore::Local(store) => store.clear(),
        }
    }
}

impl std::fmt::Debug for BrowserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BrowserStore::Extension(_) => "BrowserStore::Extension",
            BrowserStore::Local(_) => "BrowserStore::Local",
        })
    }
}

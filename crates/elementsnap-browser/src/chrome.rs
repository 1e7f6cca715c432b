//! Bindings to the WebExtension APIs used by the content script and popup.
//!
//! Every function here throws when the API is missing, so callers check
//! [`is_extension`] first or go through the `catch` variants.

use js_sys::{Object, Promise, Reflect};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    pub fn storage_local_get(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    pub fn storage_local_set(items: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = remove)]
    pub fn storage_local_remove(keys: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime"], js_name = sendMessage)]
    pub fn runtime_send_message(message: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn runtime_on_message_add_listener(
        cb: &Closure<dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue>,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    pub fn tabs_query(query: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    pub fn tabs_send_message(tab_id: i32, message: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "scripting"], js_name = executeScript)]
    pub fn scripting_execute_script(injection: &JsValue) -> Result<Promise, JsValue>;
}

/// Whether `chrome.storage.local` and `chrome.runtime` are reachable.
pub fn is_extension() -> bool {
    let global = js_sys::global();
    let Ok(chrome) = Reflect::get(&global, &JsValue::from_str("chrome")) else {
        return false;
    };
    if chrome.is_undefined() || chrome.is_null() {
        return false;
    }
    let has = |name: &str| {
        Reflect::get(&chrome, &JsValue::from_str(name))
            .map(|v| v.is_object())
            .unwrap_or(false)
    };
    has("runtime")
        && Reflect::get(&chrome, &JsValue::from_str("storage"))
            .and_then(|storage| Reflect::get(&storage, &JsValue::from_str("local")))
            .map(|local| local.is_object())
            .unwrap_or(false)
}

/// Build `{ key: value }`.
pub fn single_entry(key: &str, value: &JsValue) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &JsValue::from_str(key), value)?;
    Ok(obj.into())
}

/// Best-effort human readable text for a thrown JS value.
pub fn stringify_js_error(err: &JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = Reflect::get(err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    js_sys::JSON::stringify(err)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

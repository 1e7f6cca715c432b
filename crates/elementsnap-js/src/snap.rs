//! ElementSnap - the picker exposed to JavaScript.

use elementsnap_browser::{Mode, SnapCallbacks, SnapController};
use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::types::{SnapOptions, selection_to_js};

/// An element picker bound to the current page.
///
/// Listens for the hotkey as soon as it is constructed. Call `destroy()`
/// (or `free()`) to restore the page.
#[wasm_bindgen]
pub struct ElementSnap {
    controller: SnapController,
}

fn callback(options: &JsValue, name: &str) -> Option<Function> {
    if !options.is_object() {
        return None;
    }
    Reflect::get(options, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn callbacks_from(options: &JsValue) -> SnapCallbacks<Element> {
    let mut callbacks = SnapCallbacks::default();

    if let Some(on_copy) = callback(options, "onCopy") {
        callbacks.on_copy = Some(Box::new(move |text: &str| {
            if let Err(e) = on_copy.call1(&JsValue::NULL, &JsValue::from_str(text)) {
                tracing::warn!("onCopy threw: {:?}", e);
            }
        }));
    }

    if let Some(on_change) = callback(options, "onSelectionChange") {
        callbacks.on_selection_change = Some(Box::new(move |selection: &[_]| {
            let value = match selection_to_js(selection) {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!("could not convert selection for onSelectionChange");
                    return;
                }
            };
            if let Err(e) = on_change.call1(&JsValue::NULL, &value) {
                tracing::warn!("onSelectionChange threw: {:?}", e);
            }
        }));
    }

    callbacks
}

#[wasm_bindgen]
impl ElementSnap {
    /// Create a picker. `options` may be omitted; see `SnapOptions`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ElementSnap, JsError> {
        let parsed = if options.is_undefined() || options.is_null() {
            SnapOptions::default()
        } else {
            serde_wasm_bindgen::from_value::<SnapOptions>(options.clone())
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?
        };
        let config = parsed.into_config()?;

        let controller = SnapController::new(config, callbacks_from(&options))
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { controller })
    }

    /// Begin picking with an empty selection.
    #[wasm_bindgen]
    pub fn start(&self) {
        self.controller.start();
    }

    /// Resume picking, keeping the current selection.
    #[wasm_bindgen]
    pub fn resume(&self) {
        self.controller.resume();
    }

    /// Stop picking and show the dialog.
    #[wasm_bindgen]
    pub fn finish(&self) {
        self.controller.finish();
    }

    /// Reset everything, as Escape does.
    #[wasm_bindgen]
    pub fn close(&self) {
        self.controller.close();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) {
        self.controller.toggle_pause();
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) {
        self.controller.clear_all();
    }

    /// Remove the entry at `index`. Returns whether anything was removed.
    #[wasm_bindgen(js_name = removeElement)]
    pub fn remove_element(&self, index: usize) -> bool {
        self.controller.remove(index)
    }

    #[wasm_bindgen(js_name = setNote)]
    pub fn set_note(&self, note: String) {
        self.controller.set_note(note);
    }

    #[wasm_bindgen(js_name = getNote)]
    pub fn get_note(&self) -> String {
        self.controller.note()
    }

    /// Copy the formatted selection. Completion is reported through `onCopy`.
    #[wasm_bindgen]
    pub fn copy(&self) -> bool {
        self.controller.copy()
    }

    /// Current selection as `ElementInfo` objects with an `element` property.
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<JsValue, JsError> {
        selection_to_js(&self.controller.selection())
    }

    /// `"idle"`, `"selecting"`, `"paused"` or `"dialogOpen"`.
    #[wasm_bindgen]
    pub fn mode(&self) -> String {
        match self.controller.mode() {
            Mode::Idle => "idle",
            Mode::Selecting => "selecting",
            Mode::Paused => "paused",
            Mode::DialogOpen => "dialogOpen",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = isDestroyed)]
    pub fn is_destroyed(&self) -> bool {
        self.controller.is_destroyed()
    }

    /// Restore the page and stop listening. Idempotent.
    #[wasm_bindgen]
    pub fn destroy(&self) {
        self.controller.destroy();
    }
}

impl Drop for ElementSnap {
    fn drop(&mut self) {
        self.controller.destroy();
    }
}

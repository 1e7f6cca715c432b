//! Extension content script.
//!
//! Builds a picker with the extension profile once the page is ready and
//! answers `ping` / `init` / `toggle` messages from the popup.

use std::cell::RefCell;

use elementsnap_browser::chrome::{
    self, runtime_on_message_add_listener, runtime_send_message, stringify_js_error,
};
use elementsnap_browser::{
    ControlError, ControlMessage, ControlSlot, OutboundMessage, SnapCallbacks, SnapConfig,
    SnapController,
};
use gloo_events::EventListener;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

thread_local! {
    static SLOT: RefCell<ControlSlot<SnapController>> = RefCell::new(ControlSlot::new());
}

/// Tell the popup how many elements are selected. Nobody listening is fine.
fn send_selection_change(count: usize) {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let message = match (OutboundMessage::SelectionChange { count }).serialize(&serializer) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("could not encode selectionChange: {}", e);
            return;
        }
    };
    let Ok(promise) = runtime_send_message(&message) else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            tracing::trace!("selectionChange not delivered: {}", stringify_js_error(&e));
        }
    });
}

fn build() -> Option<SnapController> {
    let callbacks = SnapCallbacks {
        on_selection_change: Some(Box::new(|selection: &[_]| {
            send_selection_change(selection.len())
        })),
        ..SnapCallbacks::default()
    };
    match SnapController::new(SnapConfig::extension(), callbacks) {
        Ok(controller) => Some(controller),
        Err(err) => {
            tracing::error!(%err, "could not attach picker to page");
            None
        }
    }
}

fn apply(message: ControlMessage) -> JsValue {
    let response = SLOT.with(|slot| slot.borrow_mut().handle(message, build));
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    response.serialize(&serializer).unwrap_or(JsValue::UNDEFINED)
}

fn on_message(message: JsValue, _sender: JsValue, send_response: js_sys::Function) -> JsValue {
    let decoded = serde_wasm_bindgen::from_value::<serde_json::Value>(message)
        .map_err(|e| ControlError::Malformed(e.to_string()))
        .and_then(ControlMessage::from_json);
    match decoded {
        Ok(message) => {
            tracing::debug!(?message, "control message");
            let response = apply(message);
            if let Err(e) = send_response.call1(&JsValue::NULL, &response) {
                tracing::debug!("control response not delivered: {}", stringify_js_error(&e));
            }
        }
        Err(err) => tracing::debug!(%err, "ignoring message"),
    }
    // Responses are always sent synchronously.
    JsValue::FALSE
}

/// Entry point of the injected content script.
#[wasm_bindgen(js_name = startContentScript)]
pub fn start_content_script() -> Result<(), JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("No document"))?;

    if chrome::is_extension() {
        let listener = Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue>::new(
            on_message,
        );
        runtime_on_message_add_listener(&listener).map_err(|e| {
            JsError::new(&format!("onMessage unavailable: {}", stringify_js_error(&e)))
        })?;
        listener.forget();
    } else {
        tracing::info!("not running as an extension; control messages disabled");
    }

    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| {
            apply(ControlMessage::Init);
        })
        .forget();
    } else {
        apply(ControlMessage::Init);
    }
    Ok(())
}

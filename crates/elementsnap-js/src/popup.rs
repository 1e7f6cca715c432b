//! Extension popup.
//!
//! Makes sure the active tab has a running content script and reports the
//! outcome in `#status`. `#initBtn` repeats the whole sequence.

use elementsnap_browser::chrome::{
    runtime_on_message_add_listener, scripting_execute_script, stringify_js_error, tabs_query,
    tabs_send_message,
};
use elementsnap_browser::{
    ControlMessage, ControlResponse, OutboundMessage, PopupStatus, is_injectable,
};
use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use js_sys::{Array, Reflect};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlElement};

const CONTENT_SCRIPT: &str = "content.js";

/// Grace period for a freshly injected script to register its listener.
const INJECT_SETTLE_MS: u32 = 100;

struct ActiveTab {
    id: i32,
    url: String,
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

async fn active_tab() -> Result<Option<ActiveTab>, JsValue> {
    let query = to_js(&json!({"active": true, "currentWindow": true}))?;
    let tabs = Array::from(&JsFuture::from(tabs_query(&query)?).await?);
    let tab = tabs.get(0);
    if tab.is_undefined() {
        return Ok(None);
    }
    let Some(id) = Reflect::get(&tab, &JsValue::from_str("id"))?.as_f64() else {
        return Ok(None);
    };
    let url = Reflect::get(&tab, &JsValue::from_str("url"))?
        .as_string()
        .unwrap_or_default();
    Ok(Some(ActiveTab { id: id as i32, url }))
}

async fn send(tab_id: i32, message: ControlMessage) -> Result<JsValue, JsValue> {
    let message = to_js(&message)?;
    JsFuture::from(tabs_send_message(tab_id, &message)?).await
}

async fn inject(tab_id: i32) -> Result<(), JsValue> {
    let injection = to_js(&json!({
        "target": {"tabId": tab_id},
        "files": [CONTENT_SCRIPT],
    }))?;
    JsFuture::from(scripting_execute_script(&injection)?).await?;
    Ok(())
}

/// The popup's two elements.
#[derive(Clone)]
struct PopupView {
    status: HtmlElement,
    init_button: Option<HtmlElement>,
}

impl PopupView {
    fn find(document: &Document) -> Option<Self> {
        let lookup = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        };
        Some(Self {
            status: lookup("status")?,
            init_button: lookup("initBtn"),
        })
    }

    fn show(&self, status: PopupStatus) {
        tracing::debug!(?status, "popup status");
        self.status.set_text_content(Some(&status.text()));
        self.status.set_class_name(status.class_name());
        if let Some(button) = &self.init_button {
            if !status.shows_init_button() {
                let _ = button.style().set_property("display", "none");
            }
        }
    }
}

async fn check_tab(view: PopupView) {
    let tab = match active_tab().await {
        Ok(Some(tab)) => tab,
        Ok(None) => return view.show(PopupStatus::NoTab),
        Err(e) => {
            tracing::warn!("tab query failed: {}", stringify_js_error(&e));
            return view.show(PopupStatus::NoTab);
        }
    };

    if !is_injectable(&tab.url) {
        return view.show(PopupStatus::NotInjectable);
    }

    if send(tab.id, ControlMessage::Ping).await.is_err() {
        tracing::debug!(tab = tab.id, "no content script answered, injecting");
        if let Err(e) = inject(tab.id).await {
            tracing::warn!("injection failed: {}", stringify_js_error(&e));
            return view.show(PopupStatus::InjectFailed);
        }
        TimeoutFuture::new(INJECT_SETTLE_MS).await;
    }

    let reply = match send(tab.id, ControlMessage::Init).await {
        Ok(value) => match serde_wasm_bindgen::from_value::<ControlResponse>(value) {
            Ok(response) => Some(response),
            // Answered without a recognizable reply; leave the status as is.
            Err(_) => return,
        },
        Err(_) => None,
    };
    if let Some(status) = PopupStatus::after_init(reply) {
        view.show(status);
    }
}

fn on_message(message: JsValue, _sender: JsValue, _send_response: js_sys::Function) -> JsValue {
    // Only one outbound message type exists; anything else fails to decode.
    if let Ok(OutboundMessage::SelectionChange { count }) =
        serde_wasm_bindgen::from_value::<OutboundMessage>(message)
    {
        POPUP.with(|view| {
            if let Some(view) = view.borrow().as_ref() {
                view.show(PopupStatus::from_count(count));
            }
        });
    }
    JsValue::FALSE
}

thread_local! {
    static POPUP: std::cell::RefCell<Option<PopupView>> = const { std::cell::RefCell::new(None) };
}

/// Entry point of the popup page.
#[wasm_bindgen(js_name = startPopup)]
pub fn start_popup() -> Result<(), JsError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsError::new("No document"))?;
    let view = PopupView::find(&document).ok_or_else(|| JsError::new("Missing #status element"))?;
    POPUP.with(|slot| *slot.borrow_mut() = Some(view.clone()));

    let listener =
        Closure::<dyn FnMut(JsValue, JsValue, js_sys::Function) -> JsValue>::new(on_message);
    runtime_on_message_add_listener(&listener)
        .map_err(|e| JsError::new(&format!("onMessage unavailable: {}", stringify_js_error(&e))))?;
    listener.forget();

    if let Some(button) = &view.init_button {
        let view = view.clone();
        EventListener::new(button, "click", move |_| {
            wasm_bindgen_futures::spawn_local(check_tab(view.clone()));
        })
        .forget();
    }

    wasm_bindgen_futures::spawn_local(check_tab(view));
    Ok(())
}

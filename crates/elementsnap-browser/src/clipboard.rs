//! Clipboard writes and the copy confirmation.

use elementsnap_core::SnapEvent;
use gloo_timers::callback::Timeout;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::chrome::stringify_js_error;
use crate::events::Dispatch;

/// How long the copy control shows its confirmation label.
pub const FLASH_MS: u32 = 2000;

/// Label shown on the copy control after a successful write.
pub const COPIED_LABEL: &str = "✓ Copied";

/// Write `text` with the async Clipboard API and report the outcome
/// through `dispatch`.
pub fn write_text(text: String, dispatch: Dispatch) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = match write_clipboard_text(&text).await {
            Ok(()) => Ok(text),
            Err(e) => Err(stringify_js_error(&e)),
        };
        dispatch(SnapEvent::ClipboardWritten(result));
    });
}

async fn write_clipboard_text(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let navigator = window.navigator();

    // Missing outside secure contexts.
    let available = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if available.is_undefined() || available.is_null() {
        return Err(JsValue::from_str("clipboard API unavailable"));
    }

    let promise = navigator.clipboard().write_text(text);
    wasm_bindgen_futures::JsFuture::from(promise).await?;
    Ok(())
}

/// Swap the control's label for [`COPIED_LABEL`] and put the original back
/// after [`FLASH_MS`].
pub fn flash(control: &Element) {
    let original = control.text_content().unwrap_or_default();
    if original == COPIED_LABEL {
        // A previous flash is still pending and will restore the label.
        return;
    }
    control.set_text_content(Some(COPIED_LABEL));

    let control = control.clone();
    Timeout::new(FLASH_MS, move || {
        // The dialog may have been re-rendered in the meantime.
        if control.is_connected() {
            control.set_text_content(Some(&original));
        }
    })
    .forget();
}

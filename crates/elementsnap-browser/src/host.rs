//! [`SnapHost`] over the live DOM.

use elementsnap_core::{
    HostError, ListenerSet, OverlayMarkup, Position, SELECTED_MARKER, Size, SnapHost,
    StyleProperty,
};
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

use crate::chrome::stringify_js_error;
use crate::events::{Dispatch, drag_listeners, keyboard_listeners, pointer_listeners};
use crate::overlay::{BANNER_MARKER, DIALOG_MARKER, Overlay};
use crate::{clipboard, dom};

const COPY_CONTROL: &str = "[data-copy-button]";

/// The page a session decorates.
///
/// Listener sets and overlay containers are owned here; dropping the host
/// detaches all of them.
pub struct BrowserHost {
    window: Window,
    document: Document,
    dispatch: Dispatch,

    keyboard: Option<Vec<EventListener>>,
    pointer: Option<Vec<EventListener>>,
    drag: Option<Vec<EventListener>>,

    banner: Option<Overlay>,
    dialog: Option<Overlay>,

    /// `<body>`'s own inline cursor, saved while the override is applied.
    saved_cursor: Option<String>,
}

impl BrowserHost {
    pub fn new(dispatch: Dispatch) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::Unavailable("window"))?;
        let document = window.document().ok_or(HostError::Unavailable("document"))?;
        Ok(Self {
            window,
            document,
            dispatch,
            keyboard: None,
            pointer: None,
            drag: None,
            banner: None,
            dialog: None,
            saved_cursor: None,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    fn slot(&mut self, set: ListenerSet) -> &mut Option<Vec<EventListener>> {
        match set {
            ListenerSet::Keyboard => &mut self.keyboard,
            ListenerSet::Pointer => &mut self.pointer,
            ListenerSet::Drag => &mut self.drag,
        }
    }

    fn mount(
        document: &Document,
        slot: &mut Option<Overlay>,
        marker: &'static str,
        markup: &OverlayMarkup,
        dispatch: &Dispatch,
    ) {
        if slot.is_none() {
            match Overlay::mount(document, marker) {
                Ok(overlay) => *slot = Some(overlay),
                Err(err) => {
                    tracing::warn!(%err, marker, "could not mount overlay");
                    return;
                }
            }
        }
        if let Some(overlay) = slot {
            overlay.update(markup, dispatch);
        }
    }
}

impl SnapHost for BrowserHost {
    type Handle = Element;

    fn is_document_root(&self, el: &Element) -> bool {
        dom::is_document_root(el)
    }

    fn matches_selector(&self, el: &Element, selector: &str) -> Result<bool, HostError> {
        dom::matches_selector(el, selector)
    }

    fn tag_name(&self, el: &Element) -> String {
        el.tag_name()
    }

    fn element_id(&self, el: &Element) -> String {
        el.id()
    }

    fn class_names(&self, el: &Element) -> Vec<String> {
        dom::class_names(el)
    }

    fn outer_html(&self, el: &Element) -> String {
        el.outer_html()
    }

    fn text_content(&self, el: &Element) -> String {
        el.text_content().unwrap_or_default()
    }

    fn css_path(&self, el: &Element) -> Option<String> {
        dom::css_path(el)
    }

    fn page_url(&self) -> Result<String, HostError> {
        self.window
            .location()
            .href()
            .map_err(|e| HostError::Location(stringify_js_error(&e)))
    }

    fn overlay_contains(&self, el: &Element) -> bool {
        [&self.banner, &self.dialog]
            .into_iter()
            .flatten()
            .any(|overlay| overlay.contains(el))
    }

    fn style(&self, el: &Element, prop: StyleProperty) -> String {
        dom::read_style(el, prop)
    }

    fn set_style(&mut self, el: &Element, prop: StyleProperty, value: &str) {
        if let Err(err) = dom::write_style(el, prop, value) {
            tracing::warn!(%err, property = prop.css_name(), "inline style not applied");
        }
    }

    fn set_marker(&mut self, el: &Element) {
        let _ = el.set_attribute(SELECTED_MARKER, "true");
    }

    fn clear_marker(&mut self, el: &Element) {
        let _ = el.remove_attribute(SELECTED_MARKER);
    }

    fn marked_elements(&self) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&format!("[{SELECTED_MARKER}]")) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn set_global_cursor(&mut self, cursor: Option<&str>) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        match cursor {
            Some(cursor) => {
                if self.saved_cursor.is_none() {
                    self.saved_cursor =
                        Some(style.get_property_value("cursor").unwrap_or_default());
                }
                let _ = style.set_property("cursor", cursor);
            }
            None => {
                let Some(saved) = self.saved_cursor.take() else {
                    return;
                };
                let _ = if saved.is_empty() {
                    style.remove_property("cursor").map(|_| ())
                } else {
                    style.set_property("cursor", &saved)
                };
            }
        }
    }

    fn viewport(&self) -> Size {
        let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        Size::new(read(self.window.inner_width()), read(self.window.inner_height()))
    }

    fn random(&self) -> f64 {
        js_sys::Math::random()
    }

    fn mount_banner(&mut self, markup: &OverlayMarkup) {
        Self::mount(&self.document, &mut self.banner, BANNER_MARKER, markup, &self.dispatch);
    }

    fn remove_banner(&mut self) {
        self.banner = None;
    }

    fn mount_dialog(&mut self, markup: &OverlayMarkup) {
        Self::mount(&self.document, &mut self.dialog, DIALOG_MARKER, markup, &self.dispatch);
    }

    fn remove_dialog(&mut self) {
        self.dialog = None;
    }

    fn move_dialog(&mut self, to: Position) {
        if let Some(dialog) = &self.dialog {
            dialog.set_position(to);
        }
    }

    fn dialog_size(&self) -> Option<Size> {
        self.dialog.as_ref().map(Overlay::size)
    }

    fn dialog_origin(&self) -> Option<Position> {
        self.dialog.as_ref().map(Overlay::origin)
    }

    fn flash_copied(&mut self) {
        if let Some(control) = self.dialog.as_ref().and_then(|d| d.query(COPY_CONTROL)) {
            clipboard::flash(&control);
        }
    }

    fn install(&mut self, set: ListenerSet) {
        let listeners = match set {
            ListenerSet::Keyboard => keyboard_listeners(&self.document, &self.dispatch),
            ListenerSet::Pointer => pointer_listeners(&self.document, &self.dispatch),
            ListenerSet::Drag => drag_listeners(&self.document, &self.dispatch),
        };
        let slot = self.slot(set);
        if slot.is_some() {
            tracing::warn!(?set, "listener set already installed, replacing");
        }
        *slot = Some(listeners);
        tracing::trace!(?set, "listeners installed");
    }

    fn uninstall(&mut self, set: ListenerSet) {
        if self.slot(set).take().is_none() {
            tracing::warn!(?set, "listener set was not installed");
        }
    }

    fn write_clipboard(&mut self, text: String) {
        clipboard::write_text(text, self.dispatch.clone());
    }
}

impl Drop for BrowserHost {
    fn drop(&mut self) {
        self.set_global_cursor(None);
    }
}

impl std::fmt::Debug for BrowserHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserHost")
            .field("keyboard", &self.keyboard.is_some())
            .field("pointer", &self.pointer.is_some())
            .field("drag", &self.drag.is_some())
            .field("banner", &self.banner.is_some())
            .field("dialog", &self.dialog.is_some())
            .finish()
    }
}

//! Banner and dialog containers.
//!
//! A container is created once and appended to `<body>`. Every render
//! replaces its markup and rewires the `data-*` controls inside it.
//! Dropping an [`Overlay`] detaches the container and its listeners.

use elementsnap_core::{HostError, OverlayAction, OverlayMarkup, Position, Size, SnapEvent};
use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlTextAreaElement, MouseEvent};

use crate::events::{Dispatch, active, apply_result, client_position};

/// Attribute identifying the banner container.
pub const BANNER_MARKER: &str = "data-selection-prompt-banner";

/// Attribute identifying the dialog container.
pub const DIALOG_MARKER: &str = "data-selection-prompt-box";

/// Button attributes mapped through [`OverlayAction::from_control`].
const CONTROLS: [&str; 7] = [
    "data-toggle-pause",
    "data-finish-btn",
    "data-close-btn",
    "data-remove-btn",
    "data-add-more-btn",
    "data-clear-all-btn",
    "data-copy-button",
];

const NOTE_FIELD: &str = "[data-prompt-textarea]";
const DRAG_HANDLE: &str = "[data-drag-handle]";

pub struct Overlay {
    root: HtmlElement,
    listeners: Vec<EventListener>,
}

impl Overlay {
    /// Create an empty container tagged with `marker` and append it to `<body>`.
    pub fn mount(document: &Document, marker: &str) -> Result<Self, HostError> {
        let body = document.body().ok_or(HostError::Unavailable("document.body"))?;
        let root = document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or(HostError::Unavailable("createElement"))?;
        let _ = root.set_attribute(marker, "true");
        body.append_child(&root)
            .map_err(|_| HostError::Unavailable("appendChild"))?;
        Ok(Self {
            root,
            listeners: Vec::new(),
        })
    }

    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Replace the container's attributes and content, then rewire controls.
    pub fn update(&mut self, markup: &OverlayMarkup, dispatch: &Dispatch) {
        self.listeners.clear();

        if markup.class.is_empty() {
            let _ = self.root.remove_attribute("class");
        } else {
            let _ = self.root.set_attribute("class", &markup.class);
        }
        let _ = self.root.set_attribute("style", &markup.style);
        self.root.set_inner_html(&markup.html);

        self.wire_controls(dispatch);
        self.wire_note(dispatch);
        self.wire_drag_handle(dispatch);
    }

    pub fn contains(&self, el: &Element) -> bool {
        self.root.contains(Some(el.as_ref()))
    }

    pub fn query(&self, selector: &str) -> Option<Element> {
        self.root.query_selector(selector).ok().flatten()
    }

    pub fn set_position(&self, to: Position) {
        let style = self.root.style();
        let _ = style.set_property("left", &format!("{}px", to.x));
        let _ = style.set_property("top", &format!("{}px", to.y));
    }

    pub fn size(&self) -> Size {
        Size::new(
            self.root.offset_width() as f64,
            self.root.offset_height() as f64,
        )
    }

    pub fn origin(&self) -> Position {
        let rect = self.root.get_bounding_client_rect();
        Position::new(rect.left(), rect.top())
    }

    fn elements(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.root.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn wire_controls(&mut self, dispatch: &Dispatch) {
        for attr in CONTROLS {
            for el in self.elements(&format!("[{attr}]")) {
                let value = el.get_attribute(attr);
                let Some(action) = OverlayAction::from_control(attr, value.as_deref()) else {
                    tracing::debug!(attr, ?value, "ignoring unparseable overlay control");
                    continue;
                };
                let dispatch = dispatch.clone();
                self.listeners.push(EventListener::new_with_options(
                    &el,
                    "click",
                    active(),
                    move |event| {
                        let result = dispatch(SnapEvent::Overlay(action));
                        apply_result(event, result);
                    },
                ));
            }
        }
    }

    fn wire_note(&mut self, dispatch: &Dispatch) {
        let Some(field) = self
            .query(NOTE_FIELD)
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
        else {
            return;
        };
        let dispatch = dispatch.clone();
        let source = field.clone();
        self.listeners
            .push(EventListener::new(&field, "input", move |_| {
                dispatch(SnapEvent::NoteInput(source.value()));
            }));
    }

    fn wire_drag_handle(&mut self, dispatch: &Dispatch) {
        let Some(handle) = self.query(DRAG_HANDLE) else {
            return;
        };
        let dispatch = dispatch.clone();
        self.listeners.push(EventListener::new_with_options(
            &handle,
            "mousedown",
            active(),
            move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let on_button = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("button").ok().flatten())
                    .is_some();
                let result = dispatch(SnapEvent::DragStart {
                    client: client_position(mouse),
                    on_button,
                });
                apply_result(event, result);
            },
        ));
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        self.listeners.clear();
        self.root.remove();
    }
}

//! DOM event translation.
//!
//! Each listener turns its DOM event into a [`SnapEvent`], hands it to the
//! [`Dispatch`] closure, and applies the returned [`EventResult`] to the
//! original event.

use std::rc::Rc;

use elementsnap_core::{EventResult, KeyInput, Position, SnapEvent};
use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, KeyboardEvent, MouseEvent};

use crate::dom::{is_text_field, resolve_target};

/// Delivers an event to the session that owns a host.
///
/// Returns [`EventResult::PassThrough`] when the session is gone or busy.
pub type Dispatch = Rc<dyn Fn(SnapEvent<Element>) -> EventResult>;

/// Listener options that allow `preventDefault`.
pub(crate) fn active() -> EventListenerOptions {
    EventListenerOptions::enable_prevent_default()
}

/// Capture-phase listener options that allow `preventDefault`.
pub(crate) fn capture() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: false,
    }
}

/// Apply a session verdict to the DOM event it came from.
pub fn apply_result(event: &Event, result: EventResult) {
    match result {
        EventResult::PassThrough => {}
        EventResult::Handled => event.prevent_default(),
        EventResult::Captured => {
            event.prevent_default();
            event.stop_propagation();
        }
    }
}

pub fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        key: event.key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
        in_text_field: is_text_field(event.target()),
    }
}

pub fn client_position(event: &MouseEvent) -> Position {
    Position::new(event.client_x() as f64, event.client_y() as f64)
}

/// Global `keydown` and `keyup`.
pub fn keyboard_listeners(document: &Document, dispatch: &Dispatch) -> Vec<EventListener> {
    let listen = |kind: &'static str, wrap: fn(KeyInput) -> SnapEvent<Element>| {
        let dispatch = dispatch.clone();
        EventListener::new_with_options(document, kind, active(), move |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let result = dispatch(wrap(key_input(key)));
            apply_result(event, result);
        })
    };
    vec![
        listen("keydown", SnapEvent::KeyDown),
        listen("keyup", SnapEvent::KeyUp),
    ]
}

/// Hover tracking plus the capture-phase click that picks elements.
///
/// The click runs in the capture phase so the page never sees a click that
/// selected something.
pub fn pointer_listeners(document: &Document, dispatch: &Dispatch) -> Vec<EventListener> {
    let on_move = {
        let dispatch = dispatch.clone();
        EventListener::new(document, "mousemove", move |event| {
            dispatch(SnapEvent::MouseMove(resolve_target(event.target())));
        })
    };
    let on_click = {
        let dispatch = dispatch.clone();
        EventListener::new_with_options(document, "click", capture(), move |event| {
            let result = dispatch(SnapEvent::Click(resolve_target(event.target())));
            apply_result(event, result);
        })
    };
    vec![on_move, on_click]
}

/// Document-wide `mousemove`/`mouseup` pair for an active dialog drag.
pub fn drag_listeners(document: &Document, dispatch: &Dispatch) -> Vec<EventListener> {
    let on_move = {
        let dispatch = dispatch.clone();
        EventListener::new_with_options(document, "mousemove", active(), move |event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let result = dispatch(SnapEvent::DragMove {
                client: client_position(mouse),
            });
            apply_result(event, result);
        })
    };
    let on_up = {
        let dispatch = dispatch.clone();
        EventListener::new(document, "mouseup", move |_| {
            dispatch(SnapEvent::DragEnd);
        })
    };
    vec![on_move, on_up]
}

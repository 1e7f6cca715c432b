//! elementsnap-core: the element picker without a browser.
//!
//! This crate provides:
//! - `Session<Host, Store>` - the selection state machine and event mediator
//! - `SnapHost` / `SelectionStore` - the page and persistence capabilities it drives
//! - Overlay markup, clipboard formatting, control messages and popup status
//!
//! Everything is generic over the host, so the same logic runs against the
//! DOM (`elementsnap-browser`) and the in-memory host used by the unit tests.

pub mod actions;
pub mod clipboard;
pub mod config;
pub mod control;
pub mod error;
mod events;
pub mod persist;
pub mod platform;
pub mod popup;
pub mod render;
pub mod session;
pub mod style;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use actions::{
    EventResult, KeyInput, OverlayAction, PointerTarget, RejectReason, SelectOutcome, SnapEvent,
};
pub use clipboard::format_selection;
pub use config::{CopyObserver, HotkeyModifier, SelectionObserver, SnapCallbacks, SnapConfig};
pub use control::{ControlMessage, ControlResponse, ControlSlot, Destroy, OutboundMessage};
pub use error::{ControlError, HostError};
pub use persist::PERSIST_KEY;
pub use platform::{
    ListenerSet, OverlayMarkup, SELECTED_MARKER, SelectionStore, SnapHost, StyleProperty,
};
pub use popup::{PopupStatus, is_injectable};
pub use session::Session;
pub use smol_str::SmolStr;
pub use types::{ElementSnapshot, Mode, Picking, Position, SelectedElement, Size};

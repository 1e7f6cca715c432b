//! Host capability traits.
//!
//! These traits are the only interface between the session logic and the
//! page it decorates. The browser implementation lives in
//! `elementsnap-browser`; unit tests use the in-memory host in
//! `testing.rs`.

use std::fmt::Debug;

use crate::error::HostError;
use crate::types::{ElementSnapshot, Position, Size};

/// Attribute placed on every element carrying the selection decoration.
pub const SELECTED_MARKER: &str = "data-selection-prompt-selected";

/// Inline style properties the session decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Outline,
    OutlineOffset,
    Cursor,
    BoxShadow,
}

impl StyleProperty {
    /// CSS property name as accepted by `CSSStyleDeclaration.setProperty`.
    pub fn css_name(self) -> &'static str {
        match self {
            StyleProperty::Outline => "outline",
            StyleProperty::OutlineOffset => "outline-offset",
            StyleProperty::Cursor => "cursor",
            StyleProperty::BoxShadow => "box-shadow",
        }
    }
}

/// Groups of document-level listeners whose lifetime the session controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerSet {
    /// Global `keyup`. Lives from construction to destroy when enabled.
    Keyboard,
    /// `mousemove` plus capture-phase `click`. Lives while picking.
    Pointer,
    /// Temporary `mousemove`/`mouseup` pair. Lives while dragging the dialog.
    Drag,
}

/// Ready-to-mount overlay container.
///
/// The renderer produces these wholesale on every state change; the host
/// replaces the container's contents and rewires its controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMarkup {
    /// Value for the container's `class` attribute.
    pub class: String,
    /// Value for the container's `style` attribute.
    pub style: String,
    /// Inner markup. All page-derived text in it is already escaped.
    pub html: String,
}

/// The page as seen by a selection session.
///
/// Reads take `&self`; anything that mutates the page takes `&mut self`.
/// Implementations must not call back into the session synchronously: input
/// and async completions are delivered later as
/// [`SnapEvent`](crate::SnapEvent)s.
pub trait SnapHost {
    /// Live reference to a page element.
    type Handle: Clone + PartialEq + Debug;

    // === Element inspection ===

    /// `<html>` or `<body>`; these are never hovered or picked.
    fn is_document_root(&self, el: &Self::Handle) -> bool;

    /// Whether the element matches a CSS selector.
    fn matches_selector(&self, el: &Self::Handle, selector: &str) -> Result<bool, HostError>;

    /// Tag name as the host reports it (case is normalized by the caller).
    fn tag_name(&self, el: &Self::Handle) -> String;

    fn element_id(&self, el: &Self::Handle) -> String;

    fn class_names(&self, el: &Self::Handle) -> Vec<String>;

    fn outer_html(&self, el: &Self::Handle) -> String;

    fn text_content(&self, el: &Self::Handle) -> String;

    /// Structural CSS path from the root to the element.
    fn css_path(&self, el: &Self::Handle) -> Option<String>;

    /// Current page URL.
    fn page_url(&self) -> Result<String, HostError>;

    /// Whether the element belongs to the session's own banner or dialog.
    fn overlay_contains(&self, el: &Self::Handle) -> bool;

    // === Inline style ===

    /// Current inline value, empty when unset.
    fn style(&self, el: &Self::Handle, prop: StyleProperty) -> String;

    /// Set an inline value. An empty value removes the property.
    fn set_style(&mut self, el: &Self::Handle, prop: StyleProperty, value: &str);

    /// Add [`SELECTED_MARKER`] to the element.
    fn set_marker(&mut self, el: &Self::Handle);

    /// Remove [`SELECTED_MARKER`] from the element.
    fn clear_marker(&mut self, el: &Self::Handle);

    /// Every element currently carrying [`SELECTED_MARKER`].
    fn marked_elements(&self) -> Vec<Self::Handle>;

    /// Page-wide cursor override, `None` to restore the page's own cursor.
    fn set_global_cursor(&mut self, cursor: Option<&str>);

    // === Geometry ===

    fn viewport(&self) -> Size;

    /// Uniform random number in `[0, 1)`.
    fn random(&self) -> f64;

    // === Overlay ===

    /// Create or replace the banner.
    fn mount_banner(&mut self, markup: &OverlayMarkup);

    fn remove_banner(&mut self);

    /// Create or replace the dialog.
    fn mount_dialog(&mut self, markup: &OverlayMarkup);

    fn remove_dialog(&mut self);

    /// Move the mounted dialog without regenerating it.
    fn move_dialog(&mut self, to: Position);

    /// Rendered dialog size, `None` when no dialog is mounted.
    fn dialog_size(&self) -> Option<Size>;

    /// Rendered top-left corner of the dialog.
    fn dialog_origin(&self) -> Option<Position>;

    /// Briefly show copy confirmation on the dialog's copy control.
    fn flash_copied(&mut self);

    // === Listeners ===

    fn install(&mut self, set: ListenerSet);

    fn uninstall(&mut self, set: ListenerSet);

    // === Clipboard ===

    /// Start an asynchronous clipboard write. The outcome is delivered as
    /// [`SnapEvent::ClipboardWritten`](crate::SnapEvent::ClipboardWritten).
    fn write_clipboard(&mut self, text: String);
}

/// Persistent store for the serializable selection list.
///
/// All operations are best-effort. Loading is asynchronous; its result is
/// delivered as [`SnapEvent::Restored`](crate::SnapEvent::Restored).
pub trait SelectionStore {
    /// Request the persisted list.
    fn load(&mut self);

    /// Overwrite the persisted list.
    fn save(&mut self, snapshots: &[ElementSnapshot]);

    /// Remove the persisted entry entirely.
    fn clear(&mut self);
}

impl<S: SelectionStore + ?Sized> SelectionStore for Box<S> {
    fn load(&mut self) {
        (**self).load()
    }

    fn save(&mut self, snapshots: &[ElementSnapshot]) {
        (**self).save(snapshots)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

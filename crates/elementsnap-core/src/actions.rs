//! Input events and their outcomes.
//!
//! Platform-agnostic definitions of everything that can reach a session.
//! The browser layer translates DOM events into [`SnapEvent`]s; the session
//! answers with an [`EventResult`] telling the layer what to suppress.

use crate::types::{ElementSnapshot, Position};

/// Keys the session reacts to by name.
pub const KEY_ESCAPE: &str = "Escape";
pub const KEY_ENTER: &str = "Enter";
pub const KEY_SPACE: &str = " ";

/// A key release, with the modifier state at the time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    /// `KeyboardEvent.key`.
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// The key was released inside an editable field (input, textarea,
    /// contenteditable). Space and Enter are left alone there.
    pub in_text_field: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_text_field(mut self) -> Self {
        self.in_text_field = true;
        self
    }

    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }
}

/// Target of a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget<H> {
    Element(H),
    /// A text node; pointer handling uses its parent element.
    Text { parent: Option<H> },
    /// Anything else (document, comment, detached node).
    Other,
}

impl<H> PointerTarget<H> {
    /// The element the event applies to, after text-node resolution.
    pub fn resolve(self) -> Option<H> {
        match self {
            PointerTarget::Element(el) => Some(el),
            PointerTarget::Text { parent } => parent,
            PointerTarget::Other => None,
        }
    }
}

/// Controls rendered into the banner and dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    TogglePause,
    /// "Done" in the dialog header.
    Finish,
    Close,
    Remove(usize),
    /// "Add more": resume picking without clearing.
    AddMore,
    ClearAll,
    Copy,
}

impl OverlayAction {
    /// Parse the `data-*` attribute name (and value) a control was rendered with.
    pub fn from_control(attr: &str, value: Option<&str>) -> Option<Self> {
        Some(match attr {
            "data-toggle-pause" => OverlayAction::TogglePause,
            "data-finish-btn" => OverlayAction::Finish,
            "data-close-btn" => OverlayAction::Close,
            "data-remove-btn" => OverlayAction::Remove(value?.trim().parse().ok()?),
            "data-add-more-btn" => OverlayAction::AddMore,
            "data-clear-all-btn" => OverlayAction::ClearAll,
            "data-copy-button" => OverlayAction::Copy,
            _ => return None,
        })
    }
}

/// Everything that can drive a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapEvent<H> {
    /// Only consulted to keep Space from scrolling the page while picking.
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    MouseMove(PointerTarget<H>),
    Click(PointerTarget<H>),
    /// Mouse down on the dialog's drag handle.
    DragStart {
        client: Position,
        /// The press landed on a button inside the handle.
        on_button: bool,
    },
    DragMove {
        client: Position,
    },
    DragEnd,
    Overlay(OverlayAction),
    /// The note textarea changed.
    NoteInput(String),
    /// Completion of [`SnapHost::write_clipboard`](crate::SnapHost::write_clipboard).
    /// `Ok` carries the text that was written, `Err` a diagnostic.
    ClipboardWritten(Result<String, String>),
    /// Completion of [`SelectionStore::load`](crate::SelectionStore::load).
    Restored(Vec<ElementSnapshot>),
}

/// What the platform layer should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Let the page see the event.
    PassThrough,
    /// Call `preventDefault`.
    Handled,
    /// Call `preventDefault` and `stopPropagation`; the page never sees it.
    Captured,
}

/// Result of a [`select`](crate::Session::select) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Added,
    /// The target was already selected and has been toggled off.
    Removed,
    Rejected(RejectReason),
}

/// Why a target could not be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DocumentRoot,
    Excluded,
    AtCeiling,
    /// The session has been destroyed.
    Inactive,
}

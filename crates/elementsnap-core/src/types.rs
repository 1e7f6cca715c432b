//! Core session types: captured elements, geometry, and session mode.
//!
//! These types are host-agnostic. The live handle to a page node is a type
//! parameter so the same session logic runs against the browser DOM and the
//! in-memory test host.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Maximum number of characters kept from an element's outer markup.
pub const HTML_SNIPPET_LIMIT: usize = 500;

/// Maximum number of characters kept from an element's text content.
pub const TEXT_SNIPPET_LIMIT: usize = 200;

/// The serializable description of one captured element.
///
/// This is what gets persisted and what the clipboard payload is built from.
/// It never holds a reference into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    /// Lowercase tag name.
    pub tag: SmolStr,
    /// Element id, empty when the element has none.
    #[serde(default)]
    pub id: String,
    /// Class names in document order.
    #[serde(default)]
    pub classes: Vec<SmolStr>,
    /// Outer markup, truncated to [`HTML_SNIPPET_LIMIT`] characters.
    #[serde(default)]
    pub html: String,
    /// Trimmed text content, truncated to [`TEXT_SNIPPET_LIMIT`] characters.
    #[serde(default)]
    pub text: String,
    /// Page URL at capture time, empty when the location was unreadable.
    #[serde(default)]
    pub url: String,
    /// Computed CSS path, if the host could produce one.
    #[serde(default)]
    pub selector: Option<String>,
}

impl ElementSnapshot {
    /// Truncate captured markup and text to their snippet limits.
    ///
    /// Text is trimmed before truncation; markup is kept verbatim.
    pub fn with_snippets(mut self, html: &str, text: &str) -> Self {
        self.html = truncate_chars(html, HTML_SNIPPET_LIMIT);
        self.text = truncate_chars(text.trim(), TEXT_SNIPPET_LIMIT);
        self
    }
}

/// One entry of the selection list.
///
/// `handle` is the live reference to the page node. It is `None` for entries
/// restored from storage after a reload; such entries are listed, copied and
/// removable, but never styled and never matched by a click.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedElement<H> {
    pub snapshot: ElementSnapshot,
    pub handle: Option<H>,
}

impl<H> SelectedElement<H> {
    pub fn live(snapshot: ElementSnapshot, handle: H) -> Self {
        Self {
            snapshot,
            handle: Some(handle),
        }
    }

    pub fn restored(snapshot: ElementSnapshot) -> Self {
        Self {
            snapshot,
            handle: None,
        }
    }
}

impl<H: PartialEq> SelectedElement<H> {
    /// Whether this entry refers to the given live node.
    pub fn is_handle(&self, other: &H) -> bool {
        self.handle.as_ref() == Some(other)
    }
}

/// Screen position in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Position) -> Position {
        Position::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Whether pointer picking is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Picking {
    #[default]
    Off,
    Active,
    Paused,
}

impl Picking {
    /// Pointer listeners must be installed exactly while this holds.
    pub fn wants_pointer(self) -> bool {
        !matches!(self, Picking::Off)
    }
}

/// Externally visible session mode.
///
/// Derived from the picking state and dialog visibility. Picking takes
/// precedence: with `autoOpenDialog` the dialog can be up while picking is
/// still running, and the mode then reports `Selecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Selecting,
    Paused,
    DialogOpen,
}

fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

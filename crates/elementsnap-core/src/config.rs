//! Construction options and observer callbacks.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::types::SelectedElement;

/// Modifier that must be held together with the hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotkeyModifier {
    /// Ctrl on Windows/Linux; Cmd (meta) is accepted as well.
    #[default]
    Ctrl,
    Alt,
    Shift,
}

/// Serializable session configuration.
///
/// Every field is optional on the wire and falls back to the default listed
/// on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapConfig {
    /// Keyboard handling on/off. `true`.
    pub enabled: bool,
    /// Key that starts or resumes picking. `"e"`.
    pub hotkey: String,
    /// `ctrl`.
    pub hotkey_modifier: HotkeyModifier,
    /// Show the floating banner while picking. `true`.
    pub show_banner: bool,
    /// Open the dialog as soon as the first element is picked. `false`.
    pub auto_open_dialog: bool,
    /// `#000000`.
    pub hover_color: String,
    /// `#000000`.
    pub selected_color: String,
    /// Selection ceiling. Absent or `0` means unbounded.
    #[serde(deserialize_with = "de_max_elements")]
    pub max_elements: Option<NonZeroUsize>,
    /// Selectors whose matches can never be hovered or picked.
    pub exclude_selectors: Vec<String>,
    /// Extra class added to the dialog container.
    pub class_name: String,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hotkey: "e".to_string(),
            hotkey_modifier: HotkeyModifier::Ctrl,
            show_banner: true,
            auto_open_dialog: false,
            hover_color: "#000000".to_string(),
            selected_color: "#000000".to_string(),
            max_elements: None,
            exclude_selectors: Vec::new(),
            class_name: String::new(),
        }
    }
}

impl SnapConfig {
    /// Profile used by the extension content script.
    pub fn extension() -> Self {
        Self {
            hover_color: "#0066ff".to_string(),
            selected_color: "#00cc66".to_string(),
            ..Self::default()
        }
    }

    /// Whether `count` selections leave room for another one.
    pub fn has_room(&self, count: usize) -> bool {
        self.max_elements.is_none_or(|max| count < max.get())
    }

    /// `count` or `count/max`, as shown in the banner and dialog header.
    pub fn count_label(&self, count: usize) -> String {
        match self.max_elements {
            Some(max) => format!("{count}/{max}"),
            None => count.to_string(),
        }
    }
}

fn de_max_elements<'de, D>(deserializer: D) -> Result<Option<NonZeroUsize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<f64> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|n| n.is_finite() && *n >= 1.0)
        .and_then(|n| NonZeroUsize::new(n as usize)))
}

/// Observer called with the full selection list after every change.
pub type SelectionObserver<H> = Box<dyn Fn(&[SelectedElement<H>])>;

/// Observer called with the exact clipboard payload after a successful copy.
pub type CopyObserver = Box<dyn Fn(&str)>;

/// Outbound callbacks. Not serializable, so kept apart from [`SnapConfig`].
pub struct SnapCallbacks<H> {
    pub on_copy: Option<CopyObserver>,
    pub on_selection_change: Option<SelectionObserver<H>>,
}

impl<H> Default for SnapCallbacks<H> {
    fn default() -> Self {
        Self {
            on_copy: None,
            on_selection_change: None,
        }
    }
}

impl<H> std::fmt::Debug for SnapCallbacks<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapCallbacks")
            .field("on_copy", &self.on_copy.is_some())
            .field("on_selection_change", &self.on_selection_change.is_some())
            .finish()
    }
}

//! Extension popup status logic.

use crate::control::ControlResponse;

const BLOCKED_SCHEMES: [&str; 5] = [
    "chrome://",
    "chrome-extension://",
    "edge://",
    "about:",
    "moz-extension://",
];

/// Whether a content script can be injected into a tab showing `url`.
pub fn is_injectable(url: &str) -> bool {
    !url.is_empty() && !BLOCKED_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// What the popup's status line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupStatus {
    NoTab,
    NotInjectable,
    Ready,
    /// The script is present but did not answer `init`.
    Reachable,
    Initialized,
    Selected(usize),
    InjectFailed,
}

impl PopupStatus {
    /// Status for a `selectionChange` notification.
    pub fn from_count(count: usize) -> Self {
        if count > 0 {
            PopupStatus::Selected(count)
        } else {
            PopupStatus::Ready
        }
    }

    /// Status after sending `init`. `None` means the tab never answered.
    /// Returns `None` when the reply carries nothing worth showing.
    pub fn after_init(reply: Option<ControlResponse>) -> Option<Self> {
        match reply {
            None => Some(PopupStatus::Reachable),
            Some(ControlResponse::Success { success: true }) => Some(PopupStatus::Initialized),
            Some(_) => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            PopupStatus::NoTab => "No active tab found".to_string(),
            PopupStatus::NotInjectable => {
                "Cannot use on this page (chrome://, extension pages, etc.)".to_string()
            }
            PopupStatus::Ready => "Ready to use".to_string(),
            PopupStatus::Reachable => "ElementSnap ready! Press Ctrl+E to start".to_string(),
            PopupStatus::Initialized => {
                "ElementSnap initialized! Press Ctrl+E to start".to_string()
            }
            PopupStatus::Selected(count) => format!("{count} element(s) selected"),
            PopupStatus::InjectFailed => {
                "Error: Could not inject script. Try refreshing the page.".to_string()
            }
        }
    }

    /// Rendered with the `active` status class.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PopupStatus::Reachable | PopupStatus::Initialized | PopupStatus::Selected(_)
        )
    }

    /// Class attribute for the status element.
    pub fn class_name(&self) -> &'static str {
        if self.is_active() { "status active" } else { "status" }
    }

    /// Whether the manual init button stays visible.
    pub fn shows_init_button(&self) -> bool {
        !matches!(self, PopupStatus::NotInjectable)
    }
}

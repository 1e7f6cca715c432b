//! Control messages between the extension popup and the content script.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ControlError;

/// Commands the content script accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlMessage {
    /// Liveness probe.
    Ping,
    /// Create the controller if there is none.
    Init,
    /// Destroy the controller if there is one, otherwise create it.
    Toggle,
}

impl ControlMessage {
    /// Decode a message from its JSON form.
    ///
    /// Unknown `type` values are reported as [`ControlError::Unrecognized`]
    /// so the caller can ignore them quietly.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ControlError> {
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| ControlError::Malformed("missing `type`".to_string()))?
            .to_string();
        serde_json::from_value(value).map_err(|_| ControlError::Unrecognized(kind))
    }
}

/// Reply sent back for a handled message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Loaded { loaded: bool },
    Success { success: bool },
}

/// Messages the content script sends on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    SelectionChange { count: usize },
}

/// Something that needs explicit teardown.
pub trait Destroy {
    fn destroy(&mut self);
}

/// Holds at most one controller and applies control messages to it.
#[derive(Debug)]
pub struct ControlSlot<C> {
    active: Option<C>,
}

impl<C> Default for ControlSlot<C> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<C: Destroy> ControlSlot<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn get(&self) -> Option<&C> {
        self.active.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut C> {
        self.active.as_mut()
    }

    /// Apply `message`, calling `build` when a controller must be created.
    /// A build that yields `None` leaves the slot empty so the next `init`
    /// or `toggle` tries again.
    pub fn handle(
        &mut self,
        message: ControlMessage,
        build: impl FnOnce() -> Option<C>,
    ) -> ControlResponse {
        match message {
            ControlMessage::Ping => ControlResponse::Loaded { loaded: true },
            ControlMessage::Init => {
                if self.active.is_none() {
                    debug!("initializing controller");
                    self.active = build();
                }
                ControlResponse::Success { success: true }
            }
            ControlMessage::Toggle => {
                match self.active.take() {
                    Some(mut active) => {
                        debug!("toggling controller off");
                        active.destroy();
                    }
                    None => {
                        debug!("toggling controller on");
                        self.active = build();
                    }
                }
                ControlResponse::Success { success: true }
            }
        }
    }
}

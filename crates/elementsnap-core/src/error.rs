//! Error types for host and control-channel operations.
//!
//! None of these ever escape the session: it logs them and degrades to a
//! no-op, since it runs on top of a page it does not control.

use thiserror::Error;

/// Errors reported by a [`SnapHost`](crate::SnapHost) implementation.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum HostError {
    /// A user-supplied selector could not be parsed by the host.
    #[error("invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    /// The page location could not be read (sandboxed frames).
    #[error("page location unavailable: {0}")]
    Location(String),

    /// Inline style access failed.
    #[error("style access failed: {0}")]
    Style(String),

    /// A browser API the host needs is missing.
    #[error("{0} is not available")]
    Unavailable(&'static str),
}

impl HostError {
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        HostError::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

/// Errors decoding messages from the extension transport.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ControlError {
    /// The message carried a `type` this content script does not handle.
    #[error("unrecognized control message type `{0}`")]
    Unrecognized(String),

    /// The message could not be decoded at all.
    #[error("malformed control message: {0}")]
    Malformed(String),
}

//! Browser DOM host for the elementsnap picker.
//!
//! Implements [`SnapHost`] and [`SelectionStore`] on top of `web-sys` and
//! wires document listeners back into a [`Session`]. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: element inspection, CSS paths, event target resolution
//! - `events`: translation of DOM events into [`SnapEvent`]s
//! - `overlay`: banner and dialog containers and their controls
//! - `clipboard`: async clipboard writes and the copy confirmation
//! - `storage`: `chrome.storage.local` and `localStorage` stores
//! - `host`: the [`BrowserHost`] tying the above together
//! - `controller`: a shared, reference-counted session bound to the page
//!
//! # Re-exports
//!
//! This crate re-exports `elementsnap-core` for convenience, so consumers
//! only need to depend on `elementsnap-browser`.

// Re-export core crate
pub use elementsnap_core;
pub use elementsnap_core::*;

pub mod chrome;
pub mod clipboard;
pub mod controller;
pub mod dom;
pub mod events;
pub mod host;
pub mod overlay;
pub mod storage;

pub use controller::{BrowserSession, SnapController};
pub use events::Dispatch;
pub use host::BrowserHost;
pub use storage::{BrowserStore, ExtensionStore, LocalStore};

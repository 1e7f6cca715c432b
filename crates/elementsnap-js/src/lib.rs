//! WASM bindings for the elementsnap picker.
//!
//! One module serves three entry points:
//!
//! - the embeddable `ElementSnap` class for pages that ship the picker
//!   themselves;
//! - `startContentScript`, which drives a picker from extension control
//!   messages;
//! - `startPopup`, the extension popup's status logic.

mod content;
mod popup;
mod snap;
mod types;

pub use content::*;
pub use popup::*;
pub use snap::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // Fails only if a subscriber is already installed.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}

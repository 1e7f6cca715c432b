//! Types exposed to JavaScript via wasm-bindgen.

use std::num::NonZeroUsize;

use elementsnap_core::{ElementSnapshot, HotkeyModifier, SelectedElement, SnapConfig};
use js_sys::{Array, Reflect};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// Construction options for `ElementSnap`.
///
/// `onCopy(text)` and `onSelectionChange(elements)` are read from the same
/// object separately; functions do not survive deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapOptions {
    #[tsify(optional)]
    pub enabled: Option<bool>,
    #[tsify(optional)]
    pub hotkey: Option<String>,
    #[tsify(optional, type = "\"ctrl\" | \"alt\" | \"shift\"")]
    pub hotkey_modifier: Option<String>,
    #[tsify(optional)]
    pub show_banner: Option<bool>,
    #[tsify(optional)]
    pub auto_open_dialog: Option<bool>,
    #[tsify(optional)]
    pub hover_color: Option<String>,
    #[tsify(optional)]
    pub selected_color: Option<String>,
    /// `0` or absent means unbounded.
    #[tsify(optional)]
    pub max_elements: Option<f64>,
    #[tsify(optional)]
    pub exclude_selectors: Option<Vec<String>>,
    #[tsify(optional)]
    pub class_name: Option<String>,
}

impl SnapOptions {
    /// Overlay the given fields on the defaults.
    pub fn into_config(self) -> Result<SnapConfig, JsError> {
        let mut config = SnapConfig::default();
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(hotkey) = self.hotkey {
            config.hotkey = hotkey;
        }
        if let Some(modifier) = self.hotkey_modifier {
            config.hotkey_modifier = match modifier.as_str() {
                "ctrl" => HotkeyModifier::Ctrl,
                "alt" => HotkeyModifier::Alt,
                "shift" => HotkeyModifier::Shift,
                other => return Err(JsError::new(&format!("Invalid hotkeyModifier: {other}"))),
            };
        }
        if let Some(show) = self.show_banner {
            config.show_banner = show;
        }
        if let Some(auto) = self.auto_open_dialog {
            config.auto_open_dialog = auto;
        }
        if let Some(color) = self.hover_color {
            config.hover_color = color;
        }
        if let Some(color) = self.selected_color {
            config.selected_color = color;
        }
        config.max_elements = self
            .max_elements
            .filter(|n| n.is_finite() && *n >= 1.0)
            .and_then(|n| NonZeroUsize::new(n as usize));
        if let Some(selectors) = self.exclude_selectors {
            config.exclude_selectors = selectors;
        }
        if let Some(class) = self.class_name {
            config.class_name = class;
        }
        Ok(config)
    }
}

/// One selected element as handed to JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub tag: String,
    pub id: String,
    pub classes: Vec<String>,
    pub html: String,
    pub text: String,
    pub url: String,
    #[tsify(optional)]
    pub selector: Option<String>,
}

impl From<&ElementSnapshot> for ElementInfo {
    fn from(snapshot: &ElementSnapshot) -> Self {
        Self {
            tag: snapshot.tag.to_string(),
            id: snapshot.id.clone(),
            classes: snapshot.classes.iter().map(|c| c.to_string()).collect(),
            html: snapshot.html.clone(),
            text: snapshot.text.clone(),
            url: snapshot.url.clone(),
            selector: snapshot.selector.clone(),
        }
    }
}

/// Array of [`ElementInfo`] objects, each with an extra `element` property
/// holding the live node (`null` for entries restored from storage).
pub fn selection_to_js(selection: &[SelectedElement<Element>]) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let array = Array::new();
    for entry in selection {
        let info = ElementInfo::from(&entry.snapshot)
            .serialize(&serializer)
            .map_err(|e| JsError::new(&format!("Failed to serialize selection: {}", e)))?;
        let element = entry
            .handle
            .as_ref()
            .map(|el| JsValue::from(el.clone()))
            .unwrap_or(JsValue::NULL);
        Reflect::set(&info, &JsValue::from_str("element"), &element)
            .map_err(|_| JsError::new("Failed to attach element"))?;
        array.push(&info);
    }
    Ok(array.into())
}

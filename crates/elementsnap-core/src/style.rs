//! Hover and selection decoration.
//!
//! Both layers are plain inline-style mutations on page elements. Before a
//! layer touches an element it records the element's current inline values
//! in a side table, and lifting the layer writes exactly those values back.
//! Nothing is stashed on the page objects themselves.
//!
//! The layers stack: selection sits directly on the page's own styles, hover
//! sits on top of whatever selection left. Every operation that rebuilds the
//! selection layer lifts hover first and reapplies it afterwards, so the
//! recorded values always belong to the layer underneath.

use crate::platform::{SnapHost, StyleProperty};

const HOVER_PROPERTIES: [StyleProperty; 3] = [
    StyleProperty::Outline,
    StyleProperty::OutlineOffset,
    StyleProperty::Cursor,
];

const SELECTED_PROPERTIES: [StyleProperty; 3] = [
    StyleProperty::Outline,
    StyleProperty::OutlineOffset,
    StyleProperty::BoxShadow,
];

/// Inline values an element had before a layer was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SavedStyle {
    values: Vec<(StyleProperty, String)>,
}

impl SavedStyle {
    fn capture<Host: SnapHost>(
        host: &Host,
        el: &Host::Handle,
        properties: &[StyleProperty],
    ) -> Self {
        Self {
            values: properties
                .iter()
                .map(|&prop| (prop, host.style(el, prop)))
                .collect(),
        }
    }

    fn restore<Host: SnapHost>(&self, host: &mut Host, el: &Host::Handle) {
        for (prop, value) in &self.values {
            host.set_style(el, *prop, value);
        }
    }
}

/// Hover outline values for the given color.
pub fn hover_style(color: &str) -> [(StyleProperty, String); 3] {
    [
        (StyleProperty::Outline, format!("2px solid {color}")),
        (StyleProperty::OutlineOffset, "2px".to_string()),
        (StyleProperty::Cursor, "crosshair".to_string()),
    ]
}

/// Selection decoration values for the given color.
///
/// The box-shadow appends `20` to the color, which for a `#rrggbb` value is
/// a translucent halo of the same hue.
pub fn selected_style(color: &str) -> [(StyleProperty, String); 3] {
    [
        (StyleProperty::Outline, format!("2px dashed {color}")),
        (StyleProperty::OutlineOffset, "2px".to_string()),
        (StyleProperty::BoxShadow, format!("0 0 0 4px {color}20")),
    ]
}

#[derive(Debug)]
struct Hover<H> {
    el: H,
    color: String,
    saved: SavedStyle,
}

/// Side table for both decoration layers.
#[derive(Debug)]
pub struct StyleLayers<H> {
    hover: Option<Hover<H>>,
    selected: Vec<(H, SavedStyle)>,
}

impl<H> Default for StyleLayers<H> {
    fn default() -> Self {
        Self {
            hover: None,
            selected: Vec::new(),
        }
    }
}

impl<H: Clone + PartialEq> StyleLayers<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&H> {
        self.hover.as_ref().map(|hover| &hover.el)
    }

    /// Number of elements carrying the selection decoration.
    pub fn decorated(&self) -> usize {
        self.selected.len()
    }

    /// Move the hover decoration to `el`. A no-op when `el` is already hovered.
    pub fn set_hover<Host>(&mut self, host: &mut Host, el: H, color: &str)
    where
        Host: SnapHost<Handle = H>,
    {
        if self.hovered() == Some(&el) {
            return;
        }
        self.clear_hover(host);
        self.apply_hover(host, el, color.to_string());
    }

    /// Put the hovered element's inline values back and forget it.
    pub fn clear_hover<Host>(&mut self, host: &mut Host)
    where
        Host: SnapHost<Handle = H>,
    {
        if let Some(hover) = self.hover.take() {
            hover.saved.restore(host, &hover.el);
        }
    }

    /// Rebuild the selection layer so exactly `live` is decorated.
    ///
    /// Every element the host reports as marked is reverted first, including
    /// ones this table never saw; those get their decorated properties
    /// cleared.
    pub fn refresh_selection<'a, Host>(
        &mut self,
        host: &mut Host,
        live: impl IntoIterator<Item = &'a H>,
        color: &str,
    ) where
        Host: SnapHost<Handle = H>,
        H: 'a,
    {
        let hover = self.hover.take();
        if let Some(hover) = &hover {
            hover.saved.restore(host, &hover.el);
        }

        for el in host.marked_elements() {
            match self.selected.iter().position(|(saved_el, _)| *saved_el == el) {
                Some(idx) => {
                    let (_, saved) = self.selected.swap_remove(idx);
                    saved.restore(host, &el);
                }
                None => {
                    for prop in SELECTED_PROPERTIES {
                        host.set_style(&el, prop, "");
                    }
                }
            }
            host.clear_marker(&el);
        }
        // Decorated elements whose marker the page stripped.
        for (el, saved) in std::mem::take(&mut self.selected) {
            saved.restore(host, &el);
        }

        let decoration = selected_style(color);
        for el in live {
            if self.selected.iter().any(|(saved_el, _)| saved_el == el) {
                continue;
            }
            let saved = SavedStyle::capture(host, el, &SELECTED_PROPERTIES);
            for (prop, value) in &decoration {
                host.set_style(el, *prop, value);
            }
            host.set_marker(el);
            self.selected.push((el.clone(), saved));
        }

        if let Some(hover) = hover {
            self.apply_hover(host, hover.el, hover.color);
        }
    }

    /// Lift both layers.
    pub fn clear<Host>(&mut self, host: &mut Host)
    where
        Host: SnapHost<Handle = H>,
    {
        self.clear_hover(host);
        self.refresh_selection(host, std::iter::empty(), "");
    }

    fn apply_hover<Host>(&mut self, host: &mut Host, el: H, color: String)
    where
        Host: SnapHost<Handle = H>,
    {
        let saved = SavedStyle::capture(host, &el, &HOVER_PROPERTIES);
        for (prop, value) in hover_style(&color) {
            host.set_style(&el, prop, &value);
        }
        self.hover = Some(Hover { el, color, saved });
    }
}

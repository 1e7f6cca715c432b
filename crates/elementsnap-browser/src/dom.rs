//! Element inspection helpers.

use elementsnap_core::{HostError, PointerTarget, StyleProperty};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Element, EventTarget, HtmlElement, Node, SvgElement};

use crate::chrome::stringify_js_error;

/// Ancestors walked before a CSS path is cut off.
pub const MAX_PATH_DEPTH: usize = 100;

/// Structural path such as `html > body > div:nth-of-type(2) > p`.
///
/// A `:nth-of-type` index is only added where the parent holds more than
/// one child with the same tag.
pub fn css_path(el: &Element) -> Option<String> {
    let mut segments = Vec::new();
    let mut current = Some(el.clone());

    while let Some(node) = current {
        let tag = node.tag_name().to_lowercase();
        let parent = node.parent_element();

        let mut segment = tag.clone();
        if let Some(parent) = &parent {
            let siblings = parent.children();
            let mut same_tag = 0;
            let mut index = 0;
            for i in 0..siblings.length() {
                let Some(sibling) = siblings.item(i) else {
                    continue;
                };
                if sibling.tag_name().eq_ignore_ascii_case(&tag) {
                    same_tag += 1;
                    if sibling == node {
                        index = same_tag;
                    }
                }
            }
            if same_tag > 1 && index > 0 {
                segment.push_str(&format!(":nth-of-type({index})"));
            }
        }
        segments.push(segment);

        if segments.len() > MAX_PATH_DEPTH {
            break;
        }
        current = parent;
    }

    if segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(segments.join(" > "))
}

/// Resolve an event target to the element a pointer event is about.
pub fn resolve_target(target: Option<EventTarget>) -> PointerTarget<Element> {
    let Some(target) = target else {
        return PointerTarget::Other;
    };
    if let Some(el) = target.dyn_ref::<Element>() {
        return PointerTarget::Element(el.clone());
    }
    match target.dyn_ref::<Node>() {
        Some(node) if node.node_type() == Node::TEXT_NODE => PointerTarget::Text {
            parent: node.parent_element(),
        },
        _ => PointerTarget::Other,
    }
}

/// Whether keyboard input on `target` is text entry.
pub fn is_text_field(target: Option<EventTarget>) -> bool {
    let Some(el) = target.and_then(|t| t.dyn_into::<Element>().ok()) else {
        return false;
    };
    let tag = el.tag_name();
    if tag.eq_ignore_ascii_case("textarea") || tag.eq_ignore_ascii_case("input") {
        return true;
    }
    el.dyn_ref::<HtmlElement>()
        .map(|html| html.is_content_editable())
        .unwrap_or(false)
}

/// `<html>` and `<body>`.
pub fn is_document_root(el: &Element) -> bool {
    let tag = el.tag_name();
    tag.eq_ignore_ascii_case("html") || tag.eq_ignore_ascii_case("body")
}

pub fn matches_selector(el: &Element, selector: &str) -> Result<bool, HostError> {
    el.matches(selector)
        .map_err(|e| HostError::selector(selector, stringify_js_error(&e)))
}

pub fn class_names(el: &Element) -> Vec<String> {
    let list = el.class_list();
    (0..list.length()).filter_map(|i| list.item(i)).collect()
}

/// Inline style declaration for HTML and SVG elements.
pub fn inline_style(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<SvgElement>().map(|svg| svg.style())
}

/// Suffix carried on values whose inline declaration is `!important`.
pub const IMPORTANT: &str = " !important";

/// Inline value of `prop`, with [`IMPORTANT`] appended when the declaration
/// has that priority, so writing it back restores it exactly.
pub fn read_style(el: &Element, prop: StyleProperty) -> String {
    let Some(style) = inline_style(el) else {
        return String::new();
    };
    let mut value = style.get_property_value(prop.css_name()).unwrap_or_default();
    if !value.is_empty() && style.get_property_priority(prop.css_name()) == "important" {
        value.push_str(IMPORTANT);
    }
    value
}

/// Set `prop` inline. An empty value removes the declaration; a trailing
/// [`IMPORTANT`] sets the priority.
pub fn write_style(el: &Element, prop: StyleProperty, value: &str) -> Result<(), HostError> {
    let style = inline_style(el).ok_or(HostError::Unavailable("inline style"))?;
    let result = if value.is_empty() {
        style.remove_property(prop.css_name()).map(|_| ())
    } else if let Some(plain) = value.strip_suffix(IMPORTANT) {
        style.set_property_with_priority(prop.css_name(), plain.trim_end(), "important")
    } else {
        style.set_property(prop.css_name(), value)
    };
    result.map_err(|e| HostError::Style(stringify_js_error(&e)))
}

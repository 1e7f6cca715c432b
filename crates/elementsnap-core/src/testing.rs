//! In-memory host and store for exercising sessions without a browser.

use std::collections::HashMap;

use crate::error::HostError;
use crate::platform::{ListenerSet, OverlayMarkup, SelectionStore, SnapHost, StyleProperty};
use crate::types::{ElementSnapshot, Position, Size};

/// Handle to a [`FakeHost`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A fake page element.
#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    pub tag: String,
    pub id: String,
    pub classes: Vec<String>,
    pub html: Option<String>,
    pub text: String,
    pub styles: HashMap<StyleProperty, String>,
    pub marked: bool,
    pub root: bool,
    /// Part of the session's own overlay.
    pub overlay: bool,
}

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_uppercase(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn style(mut self, prop: StyleProperty, value: &str) -> Self {
        self.styles.insert(prop, value.to_string());
        self
    }

    pub fn overlay(mut self) -> Self {
        self.overlay = true;
        self
    }

    fn matches(&self, selector: &str) -> Result<bool, HostError> {
        let valid = |s: &str| {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };
        if let Some(id) = selector.strip_prefix('#') {
            if valid(id) {
                return Ok(self.id == id);
            }
        } else if let Some(class) = selector.strip_prefix('.') {
            if valid(class) {
                return Ok(self.classes.iter().any(|c| c == class));
            }
        } else if valid(selector) {
            return Ok(self.tag.eq_ignore_ascii_case(selector));
        }
        Err(HostError::selector(selector, "unsupported selector"))
    }
}

/// Records every page mutation a session performs.
#[derive(Debug)]
pub struct FakeHost {
    pub nodes: Vec<FakeNode>,
    pub url: Result<String, HostError>,
    pub viewport: Size,
    pub random: f64,
    pub banner: Option<OverlayMarkup>,
    pub dialog: Option<OverlayMarkup>,
    pub dialog_position: Option<Position>,
    /// Size reported while a dialog is mounted.
    pub dialog_extent: Size,
    pub global_cursor: Option<String>,
    pub listeners: HashMap<ListenerSet, usize>,
    /// Installs of a set that was already installed, and removals of one
    /// that was not. Both should stay at zero.
    pub unbalanced: usize,
    pub clipboard_writes: Vec<String>,
    pub flashes: usize,
    pub banner_mounts: usize,
    pub dialog_mounts: usize,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// A page with `<html>` and `<body>` and nothing else.
    pub fn new() -> Self {
        let mut html = FakeNode::new("html");
        html.root = true;
        let mut body = FakeNode::new("body");
        body.root = true;
        Self {
            nodes: vec![html, body],
            url: Ok("https://example.com/page".to_string()),
            viewport: Size::new(1280.0, 800.0),
            random: 0.5,
            banner: None,
            dialog: None,
            dialog_position: None,
            dialog_extent: Size::new(480.0, 420.0),
            global_cursor: None,
            listeners: HashMap::new(),
            unbalanced: 0,
            clipboard_writes: Vec::new(),
            flashes: 0,
            banner_mounts: 0,
            dialog_mounts: 0,
        }
    }

    pub fn html_root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body(&self) -> NodeId {
        NodeId(1)
    }

    pub fn insert(&mut self, node: FakeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[id.0]
    }

    pub fn inline(&self, id: NodeId, prop: StyleProperty) -> &str {
        self.node(id).styles.get(&prop).map(String::as_str).unwrap_or("")
    }

    pub fn is_marked(&self, id: NodeId) -> bool {
        self.node(id).marked
    }

    pub fn is_installed(&self, set: ListenerSet) -> bool {
        self.listeners.get(&set).copied().unwrap_or(0) > 0
    }

    /// Total listener sets currently installed.
    pub fn installed_count(&self) -> usize {
        self.listeners.values().sum()
    }
}

impl SnapHost for FakeHost {
    type Handle = NodeId;

    fn is_document_root(&self, el: &NodeId) -> bool {
        self.node(*el).root
    }

    fn matches_selector(&self, el: &NodeId, selector: &str) -> Result<bool, HostError> {
        self.node(*el).matches(selector)
    }

    fn tag_name(&self, el: &NodeId) -> String {
        self.node(*el).tag.clone()
    }

    fn element_id(&self, el: &NodeId) -> String {
        self.node(*el).id.clone()
    }

    fn class_names(&self, el: &NodeId) -> Vec<String> {
        self.node(*el).classes.clone()
    }

    fn outer_html(&self, el: &NodeId) -> String {
        let node = self.node(*el);
        node.html.clone().unwrap_or_else(|| {
            let tag = node.tag.to_lowercase();
            format!("<{tag}>{}</{tag}>", node.text)
        })
    }

    fn text_content(&self, el: &NodeId) -> String {
        self.node(*el).text.clone()
    }

    fn css_path(&self, el: &NodeId) -> Option<String> {
        let node = self.node(*el);
        if node.root {
            return Some(node.tag.to_lowercase());
        }
        Some(format!("html > body > {}", node.tag.to_lowercase()))
    }

    fn page_url(&self) -> Result<String, HostError> {
        self.url.clone()
    }

    fn overlay_contains(&self, el: &NodeId) -> bool {
        self.node(*el).overlay
    }

    fn style(&self, el: &NodeId, prop: StyleProperty) -> String {
        self.inline(*el, prop).to_string()
    }

    fn set_style(&mut self, el: &NodeId, prop: StyleProperty, value: &str) {
        let styles = &mut self.nodes[el.0].styles;
        if value.is_empty() {
            styles.remove(&prop);
        } else {
            styles.insert(prop, value.to_string());
        }
    }

    fn set_marker(&mut self, el: &NodeId) {
        self.nodes[el.0].marked = true;
    }

    fn clear_marker(&mut self, el: &NodeId) {
        self.nodes[el.0].marked = false;
    }

    fn marked_elements(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.node(*id).marked)
            .collect()
    }

    fn set_global_cursor(&mut self, cursor: Option<&str>) {
        self.global_cursor = cursor.map(str::to_string);
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn random(&self) -> f64 {
        self.random
    }

    fn mount_banner(&mut self, markup: &OverlayMarkup) {
        self.banner_mounts += 1;
        self.banner = Some(markup.clone());
    }

    fn remove_banner(&mut self) {
        self.banner = None;
    }

    fn mount_dialog(&mut self, markup: &OverlayMarkup) {
        self.dialog_mounts += 1;
        self.dialog = Some(markup.clone());
        // A fresh mount sits where its markup says; the origin falls back to it.
        self.dialog_position = None;
    }

    fn remove_dialog(&mut self) {
        self.dialog = None;
        self.dialog_position = None;
    }

    fn move_dialog(&mut self, to: Position) {
        if self.dialog.is_some() {
            self.dialog_position = Some(to);
        }
    }

    fn dialog_size(&self) -> Option<Size> {
        self.dialog.as_ref().map(|_| self.dialog_extent)
    }

    fn dialog_origin(&self) -> Option<Position> {
        self.dialog.as_ref()?;
        self.dialog_position
    }

    fn flash_copied(&mut self) {
        self.flashes += 1;
    }

    fn install(&mut self, set: ListenerSet) {
        let count = self.listeners.entry(set).or_default();
        if *count > 0 {
            self.unbalanced += 1;
        }
        *count += 1;
    }

    fn uninstall(&mut self, set: ListenerSet) {
        match self.listeners.get_mut(&set) {
            Some(count) if *count > 0 => *count -= 1,
            _ => self.unbalanced += 1,
        }
    }

    fn write_clipboard(&mut self, text: String) {
        self.clipboard_writes.push(text);
    }
}

/// Store that keeps the entry in memory and counts calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub entry: Option<Vec<ElementSnapshot>>,
    pub loads: usize,
    pub saves: usize,
    pub clears: usize,
}

impl MemoryStore {
    pub fn with_entry(entry: Vec<ElementSnapshot>) -> Self {
        Self {
            entry: Some(entry),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Option<&[ElementSnapshot]> {
        self.entry.as_deref()
    }
}

impl SelectionStore for MemoryStore {
    fn load(&mut self) {
        self.loads += 1;
    }

    fn save(&mut self, snapshots: &[ElementSnapshot]) {
        self.saves += 1;
        self.entry = Some(snapshots.to_vec());
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.entry = None;
    }
}

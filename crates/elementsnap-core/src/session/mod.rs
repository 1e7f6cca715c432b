//! The selection session.
//!
//! [`Session`] owns the authoritative state: picking status, the selection
//! list, the note, and the dialog's visibility and position. Every operation
//! mutates that state first and then brings the page in line with it:
//! listeners are reconciled, decorations rebuilt, and the overlay
//! regenerated. Input arrives through [`Session::handle_event`] (see
//! `events.rs`); the same operations are callable directly.

use std::collections::HashSet;

use smol_str::SmolStr;
use tracing::{debug, error, warn};

use crate::actions::{RejectReason, SelectOutcome};
use crate::clipboard::format_selection;
use crate::config::{SnapCallbacks, SnapConfig};
use crate::persist;
use crate::platform::{ListenerSet, SelectionStore, SnapHost};
use crate::render::{
    BannerState, DIALOG_HEIGHT, DIALOG_WIDTH, DialogState, banner_markup, dialog_markup,
    random_position,
};
use crate::style::StyleLayers;
use crate::types::{ElementSnapshot, Mode, Picking, Position, SelectedElement, Size};

/// Page cursor while picking is running.
pub const PICKING_CURSOR: &str = "crosshair";

/// One selection controller bound to one page.
pub struct Session<Host: SnapHost, S: SelectionStore> {
    pub(crate) host: Host,
    pub(crate) store: S,
    pub(crate) config: SnapConfig,
    callbacks: SnapCallbacks<Host::Handle>,

    pub(crate) picking: Picking,
    /// The dialog has been asked for. It only renders with a non-empty list.
    pub(crate) dialog_visible: bool,
    /// The banner has been asked for (picking, or a restored selection).
    banner_shown: bool,
    pub(crate) selection: Vec<SelectedElement<Host::Handle>>,
    pub(crate) note: String,
    pub(crate) position: Position,
    /// Pointer offset from the dialog origin while dragging.
    pub(crate) drag_offset: Option<Position>,

    styles: StyleLayers<Host::Handle>,
    installed: HashSet<ListenerSet>,
    /// The store has been asked for a persisted list and nothing has
    /// superseded it yet.
    restore_pending: bool,
    pub(crate) destroyed: bool,
}

impl<Host: SnapHost, S: SelectionStore> Session<Host, S> {
    /// Build a session, install the keyboard listener when enabled, and ask
    /// the store for a previously persisted selection.
    pub fn new(
        host: Host,
        store: S,
        config: SnapConfig,
        callbacks: SnapCallbacks<Host::Handle>,
    ) -> Self {
        let mut session = Self {
            host,
            store,
            config,
            callbacks,
            picking: Picking::Off,
            dialog_visible: false,
            banner_shown: false,
            selection: Vec::new(),
            note: String::new(),
            position: Position::default(),
            drag_offset: None,
            styles: StyleLayers::new(),
            installed: HashSet::new(),
            restore_pending: true,
            destroyed: false,
        };
        session.sync_listeners();
        session.store.load();
        debug!(enabled = session.config.enabled, "selection session created");
        session
    }

    // === State queries ===

    pub fn mode(&self) -> Mode {
        match self.picking {
            Picking::Active => Mode::Selecting,
            Picking::Paused => Mode::Paused,
            Picking::Off if self.is_dialog_open() => Mode::DialogOpen,
            Picking::Off => Mode::Idle,
        }
    }

    pub fn picking(&self) -> Picking {
        self.picking
    }

    /// The dialog is requested and has something to show.
    pub fn is_dialog_open(&self) -> bool {
        self.dialog_visible && !self.selection.is_empty()
    }

    pub fn selection(&self) -> &[SelectedElement<Host::Handle>] {
        &self.selection
    }

    pub fn snapshots(&self) -> Vec<ElementSnapshot> {
        persist::snapshots(&self.selection)
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn hovered(&self) -> Option<&Host::Handle> {
        self.styles.hovered()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // === Transitions ===

    /// Begin a fresh pick: drop the current selection and note, then resume.
    pub fn start(&mut self) {
        if self.destroyed {
            return;
        }
        debug!("starting fresh selection");
        self.selection.clear();
        self.note.clear();
        self.notify();
        self.store.clear();
        self.refresh_styles();
        self.resume();
    }

    /// Continue picking while keeping the current selection.
    ///
    /// Closes the dialog unless it is configured to open on the first pick,
    /// in which case it stays up beside the banner.
    pub fn resume(&mut self) {
        if self.destroyed {
            return;
        }
        debug!(selected = self.selection.len(), "picking");
        self.restore_pending = false;
        self.picking = Picking::Active;
        self.host.set_global_cursor(Some(PICKING_CURSOR));
        if !self.config.auto_open_dialog {
            self.dialog_visible = false;
            self.drag_offset = None;
        }
        self.banner_shown = true;
        self.sync_listeners();
        self.render();
    }

    /// Suspend hover and click handling without leaving the session.
    pub fn pause(&mut self) {
        if self.picking != Picking::Active {
            return;
        }
        debug!("picking paused");
        self.picking = Picking::Paused;
        self.styles.clear_hover(&mut self.host);
        self.host.set_global_cursor(None);
        self.render();
    }

    /// Undo [`pause`](Self::pause).
    pub fn unpause(&mut self) {
        if self.picking != Picking::Paused {
            return;
        }
        debug!("picking unpaused");
        self.picking = Picking::Active;
        self.host.set_global_cursor(Some(PICKING_CURSOR));
        self.render();
    }

    pub fn toggle_pause(&mut self) {
        match self.picking {
            Picking::Active => self.pause(),
            Picking::Paused => self.unpause(),
            Picking::Off => {}
        }
    }

    /// Stop picking. With something selected and no dialog up yet, the
    /// dialog opens at a random position.
    pub fn finish(&mut self) {
        if self.destroyed {
            return;
        }
        debug!(selected = self.selection.len(), "picking finished");
        self.stop_picking();
        if !self.selection.is_empty() && !self.dialog_visible {
            self.open_dialog();
        } else {
            self.render();
        }
    }

    /// Reset everything: selection, note, decorations, persisted entry and
    /// overlay. Valid from any state.
    pub fn close(&mut self) {
        if self.destroyed {
            return;
        }
        debug!("session closed");
        self.restore_pending = false;
        self.dialog_visible = false;
        self.drag_offset = None;
        self.note.clear();
        self.selection.clear();
        self.stop_picking();
        self.notify();
        self.store.clear();
        self.styles.clear(&mut self.host);
        self.sync_listeners();
        self.render();
    }

    /// Toggle `el` in the selection.
    pub fn select(&mut self, el: Host::Handle) -> SelectOutcome {
        if self.destroyed {
            return SelectOutcome::Rejected(RejectReason::Inactive);
        }
        if self.host.is_document_root(&el) {
            return SelectOutcome::Rejected(RejectReason::DocumentRoot);
        }
        if self.is_excluded(&el) {
            return SelectOutcome::Rejected(RejectReason::Excluded);
        }

        let outcome = match self.selection.iter().position(|entry| entry.is_handle(&el)) {
            Some(idx) => {
                self.selection.remove(idx);
                SelectOutcome::Removed
            }
            None if !self.config.has_room(self.selection.len()) => {
                debug!(max = ?self.config.max_elements, "selection ceiling reached");
                return SelectOutcome::Rejected(RejectReason::AtCeiling);
            }
            None => {
                let snapshot = self.capture(&el);
                self.selection.push(SelectedElement::live(snapshot, el));
                SelectOutcome::Added
            }
        };
        debug!(?outcome, selected = self.selection.len(), "selection changed");

        self.notify();
        self.persist();
        self.styles.clear_hover(&mut self.host);
        self.refresh_styles();

        if self.config.auto_open_dialog && !self.selection.is_empty() && !self.dialog_visible {
            self.open_dialog();
        } else {
            self.render();
        }
        outcome
    }

    /// Drop the entry at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.destroyed || index >= self.selection.len() {
            return false;
        }
        self.selection.remove(index);
        debug!(index, selected = self.selection.len(), "element removed");
        self.notify();
        self.persist();
        self.refresh_styles();
        self.render();
        true
    }

    /// Empty the selection. The note is kept.
    pub fn clear_all(&mut self) {
        if self.destroyed {
            return;
        }
        debug!("selection cleared");
        self.restore_pending = false;
        self.selection.clear();
        self.notify();
        self.store.clear();
        self.refresh_styles();
        self.render();
    }

    /// Replace the note and re-render the dialog around it.
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
        if self.is_dialog_open() {
            self.render();
        }
    }

    /// Move the dialog, clamped so it stays fully inside the viewport.
    pub fn reposition(&mut self, to: Position) {
        let size = self
            .host
            .dialog_size()
            .unwrap_or(Size::new(DIALOG_WIDTH, DIALOG_HEIGHT));
        let viewport = self.host.viewport();
        let max_x = viewport.width - size.width;
        let max_y = viewport.height - size.height;
        self.position = Position::new(to.x.min(max_x).max(0.0), to.y.min(max_y).max(0.0));
        if self.is_dialog_open() {
            self.host.move_dialog(self.position);
        }
    }

    /// Start writing the formatted selection to the clipboard. Returns
    /// `false` when there is nothing to copy.
    pub fn copy(&mut self) -> bool {
        if self.destroyed || self.selection.is_empty() {
            return false;
        }
        let text = format_selection(&self.snapshots(), &self.note);
        self.host.write_clipboard(text);
        true
    }

    /// Handle the outcome of a clipboard write.
    pub fn copy_finished(&mut self, result: Result<String, String>) {
        match result {
            Ok(text) => {
                debug!(bytes = text.len(), "copied selection");
                if let Some(on_copy) = &self.callbacks.on_copy {
                    on_copy(&text);
                }
                if self.is_dialog_open() {
                    self.host.flash_copied();
                }
            }
            Err(err) => error!(%err, "failed to copy selection"),
        }
    }

    /// Adopt a persisted selection. Only the first answer to the load issued
    /// at construction counts, and only if the user has not started, resumed,
    /// closed or cleared in the meantime.
    pub fn restore(&mut self, snapshots: Vec<ElementSnapshot>) {
        if self.destroyed || !std::mem::take(&mut self.restore_pending) {
            debug!("persisted list arrived late, ignoring");
            return;
        }
        if snapshots.is_empty() {
            return;
        }
        if !self.selection.is_empty() {
            debug!("selection already in progress, ignoring persisted list");
            return;
        }
        debug!(count = snapshots.len(), "restored persisted selection");
        self.selection = persist::restore(snapshots);
        self.notify();
        self.banner_shown = true;
        self.render();
    }

    /// Tear down for good: reset, then remove every listener. Later calls
    /// and events are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.close();
        self.destroyed = true;
        self.sync_listeners();
        debug!("selection session destroyed");
    }

    // === Internals ===

    fn stop_picking(&mut self) {
        self.picking = Picking::Off;
        self.banner_shown = false;
        self.styles.clear_hover(&mut self.host);
        self.host.set_global_cursor(None);
        self.sync_listeners();
    }

    fn open_dialog(&mut self) {
        let viewport = self.host.viewport();
        let (rx, ry) = (self.host.random(), self.host.random());
        self.position = random_position(viewport.width, viewport.height, rx, ry);
        self.dialog_visible = true;
        self.render();
    }

    /// Reconcile installed listener sets with the current state. Every set is
    /// installed at most once and removed exactly when no longer wanted.
    pub(crate) fn sync_listeners(&mut self) {
        let live = !self.destroyed;
        let wanted = [
            (ListenerSet::Keyboard, live && self.config.enabled),
            (ListenerSet::Pointer, live && self.picking.wants_pointer()),
            (ListenerSet::Drag, live && self.drag_offset.is_some()),
        ];
        for (set, want) in wanted {
            let have = self.installed.contains(&set);
            if want && !have {
                self.host.install(set);
                self.installed.insert(set);
            } else if !want && have {
                self.host.uninstall(set);
                self.installed.remove(&set);
            }
        }
    }

    /// Regenerate both overlay pieces from state.
    pub(crate) fn render(&mut self) {
        if self.is_dialog_open() {
            let snapshots = self.snapshots();
            let markup = dialog_markup(DialogState {
                config: &self.config,
                elements: &snapshots,
                note: &self.note,
                position: self.position,
                picking: self.picking.wants_pointer(),
            });
            self.host.mount_dialog(&markup);
        } else {
            if self.dialog_visible {
                debug!("selection emptied, hiding dialog");
            }
            self.dialog_visible = false;
            if self.drag_offset.take().is_some() {
                self.sync_listeners();
            }
            self.host.remove_dialog();
        }

        if self.config.show_banner && self.banner_shown && !self.is_dialog_open() {
            let markup = banner_markup(BannerState {
                config: &self.config,
                count: self.selection.len(),
                paused: self.picking == Picking::Paused,
            });
            self.host.mount_banner(&markup);
        } else {
            self.host.remove_banner();
        }
    }

    pub(crate) fn is_eligible(&self, el: &Host::Handle) -> bool {
        !self.host.is_document_root(el) && !self.is_excluded(el)
    }

    fn is_excluded(&self, el: &Host::Handle) -> bool {
        self.config.exclude_selectors.iter().any(|selector| {
            self.host
                .matches_selector(el, selector)
                .unwrap_or_else(|err| {
                    warn!(%err, "ignoring exclusion rule");
                    false
                })
        })
    }

    pub(crate) fn hover(&mut self, el: Host::Handle) {
        self.styles
            .set_hover(&mut self.host, el, &self.config.hover_color);
    }

    fn capture(&self, el: &Host::Handle) -> ElementSnapshot {
        let url = self.host.page_url().unwrap_or_else(|err| {
            warn!(%err, "capturing without page url");
            String::new()
        });
        ElementSnapshot {
            tag: SmolStr::new(self.host.tag_name(el).to_lowercase()),
            id: self.host.element_id(el),
            classes: self.host.class_names(el).into_iter().map(SmolStr::from).collect(),
            html: String::new(),
            text: String::new(),
            url,
            selector: self.host.css_path(el),
        }
        .with_snippets(&self.host.outer_html(el), &self.host.text_content(el))
    }

    fn refresh_styles(&mut self) {
        let live = self.selection.iter().filter_map(|entry| entry.handle.as_ref());
        self.styles
            .refresh_selection(&mut self.host, live, &self.config.selected_color);
    }

    fn notify(&self) {
        if let Some(observer) = &self.callbacks.on_selection_change {
            observer(&self.selection);
        }
    }

    fn persist(&mut self) {
        persist::write_through(&mut self.store, &self.selection);
    }
}

impl<Host: SnapHost, S: SelectionStore> std::fmt::Debug for Session<Host, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode())
            .field("selected", &self.selection.len())
            .field("note_len", &self.note.len())
            .field("position", &self.position)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;

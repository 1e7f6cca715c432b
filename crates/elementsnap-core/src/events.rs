//! Event mediation: raw input to session transitions.

use tracing::trace;

use crate::actions::{
    EventResult, KEY_ENTER, KEY_ESCAPE, KEY_SPACE, KeyInput, OverlayAction, PointerTarget,
    SnapEvent,
};
use crate::config::HotkeyModifier;
use crate::platform::{SelectionStore, SnapHost};
use crate::session::Session;
use crate::types::{Picking, Position};

impl<Host: SnapHost, S: SelectionStore> Session<Host, S> {
    /// Apply one input event. Events reaching a destroyed session are
    /// passed through untouched.
    pub fn handle_event(&mut self, event: SnapEvent<Host::Handle>) -> EventResult {
        if self.destroyed {
            return EventResult::PassThrough;
        }
        match event {
            SnapEvent::KeyDown(key) => self.on_key_down(&key),
            SnapEvent::KeyUp(key) => self.on_key_up(&key),
            SnapEvent::MouseMove(target) => self.on_mouse_move(target),
            SnapEvent::Click(target) => self.on_click(target),
            SnapEvent::DragStart { client, on_button } => self.on_drag_start(client, on_button),
            SnapEvent::DragMove { client } => match self.drag_offset {
                Some(offset) => {
                    self.reposition(client.offset_from(offset));
                    EventResult::Handled
                }
                None => EventResult::PassThrough,
            },
            SnapEvent::DragEnd => {
                if self.drag_offset.take().is_some() {
                    self.sync_listeners();
                }
                EventResult::PassThrough
            }
            SnapEvent::Overlay(action) => {
                self.on_overlay(action);
                EventResult::Handled
            }
            SnapEvent::NoteInput(text) => {
                // The textarea already shows it; re-rendering would drop focus.
                self.note = text;
                EventResult::PassThrough
            }
            SnapEvent::ClipboardWritten(result) => {
                self.copy_finished(result);
                EventResult::PassThrough
            }
            SnapEvent::Restored(snapshots) => {
                self.restore(snapshots);
                EventResult::PassThrough
            }
        }
    }

    /// Whether `key` is the configured hotkey chord. The `ctrl` modifier also
    /// accepts Cmd.
    pub fn is_hotkey(&self, key: &KeyInput) -> bool {
        let modifier = match self.config.hotkey_modifier {
            HotkeyModifier::Ctrl => key.ctrl || key.meta,
            HotkeyModifier::Alt => key.alt,
            HotkeyModifier::Shift => key.shift,
        };
        modifier && key.key.to_lowercase() == self.config.hotkey.to_lowercase()
    }

    /// Space pauses on release; the press is swallowed so the page does not
    /// scroll underneath the picker.
    fn on_key_down(&mut self, key: &KeyInput) -> EventResult {
        if self.config.enabled
            && key.is(KEY_SPACE)
            && self.picking.wants_pointer()
            && !key.in_text_field
        {
            EventResult::Handled
        } else {
            EventResult::PassThrough
        }
    }

    fn on_key_up(&mut self, key: &KeyInput) -> EventResult {
        if !self.config.enabled {
            return EventResult::PassThrough;
        }

        if key.is(KEY_ESCAPE) {
            self.close();
            EventResult::PassThrough
        } else if self.is_hotkey(key) {
            if !self.selection.is_empty() || self.is_dialog_open() {
                self.resume();
            } else {
                self.start();
            }
            EventResult::Handled
        } else if key.is(KEY_SPACE) && self.picking.wants_pointer() && !key.in_text_field {
            self.toggle_pause();
            EventResult::Handled
        } else if key.is(KEY_ENTER)
            && self.picking == Picking::Active
            && !self.config.auto_open_dialog
            && !key.in_text_field
        {
            self.finish();
            EventResult::PassThrough
        } else {
            EventResult::PassThrough
        }
    }

    fn on_mouse_move(&mut self, target: PointerTarget<Host::Handle>) -> EventResult {
        if self.picking != Picking::Active {
            return EventResult::PassThrough;
        }
        let Some(el) = target.resolve() else {
            return EventResult::PassThrough;
        };
        if self.host.overlay_contains(&el) || !self.is_eligible(&el) {
            return EventResult::PassThrough;
        }
        self.hover(el);
        EventResult::PassThrough
    }

    fn on_click(&mut self, target: PointerTarget<Host::Handle>) -> EventResult {
        if self.picking != Picking::Active {
            return EventResult::PassThrough;
        }
        let Some(el) = target.resolve() else {
            return EventResult::PassThrough;
        };
        if self.host.overlay_contains(&el) {
            return EventResult::PassThrough;
        }
        // No page interaction while picking, even when nothing gets selected.
        let outcome = self.select(el);
        trace!(?outcome, "click while picking");
        EventResult::Captured
    }

    fn on_drag_start(&mut self, client: Position, on_button: bool) -> EventResult {
        if on_button || !self.is_dialog_open() {
            return EventResult::PassThrough;
        }
        let origin = self.host.dialog_origin().unwrap_or(self.position);
        self.drag_offset = Some(client.offset_from(origin));
        self.sync_listeners();
        EventResult::Handled
    }

    fn on_overlay(&mut self, action: OverlayAction) {
        trace!(?action, "overlay control");
        match action {
            OverlayAction::TogglePause => self.toggle_pause(),
            OverlayAction::Finish => self.finish(),
            OverlayAction::Close => self.close(),
            OverlayAction::Remove(index) => {
                self.remove(index);
            }
            OverlayAction::AddMore => self.resume(),
            OverlayAction::ClearAll => self.clear_all(),
            OverlayAction::Copy => {
                self.copy();
            }
        }
    }
}

//! Session behavior against the in-memory host.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;

use super::Session;
use crate::actions::{
    EventResult, KeyInput, OverlayAction, PointerTarget, RejectReason, SelectOutcome, SnapEvent,
};
use crate::config::{HotkeyModifier, SnapCallbacks, SnapConfig};
use crate::platform::{ListenerSet, SnapHost, StyleProperty};
use crate::testing::{FakeHost, FakeNode, MemoryStore, NodeId};
use crate::types::{ElementSnapshot, Mode, Position, SelectedElement};

type TestSession = Session<FakeHost, MemoryStore>;

/// Selection sizes reported to the observer, in order.
#[derive(Clone, Default)]
struct Observed {
    counts: Rc<RefCell<Vec<usize>>>,
    copies: Rc<RefCell<Vec<String>>>,
}

impl Observed {
    fn callbacks(&self) -> SnapCallbacks<NodeId> {
        let counts = self.counts.clone();
        let copies = self.copies.clone();
        SnapCallbacks {
            on_selection_change: Some(Box::new(move |list: &[SelectedElement<NodeId>]| {
                counts.borrow_mut().push(list.len())
            })),
            on_copy: Some(Box::new(move |text: &str| {
                copies.borrow_mut().push(text.to_string())
            })),
        }
    }

    fn last_count(&self) -> Option<usize> {
        self.counts.borrow().last().copied()
    }
}

struct Page {
    a: NodeId,
    b: NodeId,
    c: NodeId,
    ad: NodeId,
    overlay: NodeId,
}

fn page() -> (FakeHost, Page) {
    let mut host = FakeHost::new();
    let a = host.insert(
        FakeNode::new("div")
            .id("hero")
            .class("card")
            .style(StyleProperty::Outline, "1px solid red"),
    );
    let b = host.insert(
        FakeNode::new("p")
            .text("  hello  ")
            .style(StyleProperty::Cursor, "pointer"),
    );
    let c = host.insert(FakeNode::new("span").style(StyleProperty::BoxShadow, "none"));
    let ad = host.insert(FakeNode::new("aside").class("ad"));
    let overlay = host.insert(FakeNode::new("button").overlay());
    (
        host,
        Page {
            a,
            b,
            c,
            ad,
            overlay,
        },
    )
}

fn session_with(config: SnapConfig) -> (TestSession, Page, Observed) {
    let (host, page) = page();
    let observed = Observed::default();
    let session = Session::new(host, MemoryStore::default(), config, observed.callbacks());
    (session, page, observed)
}

fn session() -> (TestSession, Page, Observed) {
    session_with(SnapConfig::default())
}

fn hotkey() -> SnapEvent<NodeId> {
    SnapEvent::KeyUp(KeyInput::new("e").with_ctrl())
}

fn click(el: NodeId) -> SnapEvent<NodeId> {
    SnapEvent::Click(PointerTarget::Element(el))
}

fn hover(el: NodeId) -> SnapEvent<NodeId> {
    SnapEvent::MouseMove(PointerTarget::Element(el))
}

fn handles(session: &TestSession) -> Vec<Option<NodeId>> {
    session.selection().iter().map(|e| e.handle).collect()
}

fn assert_listeners_match_mode(session: &TestSession) {
    let host = session.host();
    assert_eq!(host.unbalanced, 0, "unbalanced listener calls");
    let picking = matches!(session.mode(), Mode::Selecting | Mode::Paused);
    assert_eq!(host.is_installed(ListenerSet::Pointer), picking, "mode {:?}", session.mode());
    assert_eq!(host.is_installed(ListenerSet::Keyboard), session.config().enabled);
}

#[test]
fn test_new_session_is_idle_and_loads() {
    let (session, _, _) = session();
    assert_eq!(session.mode(), Mode::Idle);
    assert_eq!(session.store().loads, 1);
    assert!(session.host().is_installed(ListenerSet::Keyboard));
    assert!(!session.host().is_installed(ListenerSet::Pointer));
    assert!(session.host().banner.is_none());
}

#[test]
fn test_disabled_session_ignores_keys() {
    let (mut session, _, _) = session_with(SnapConfig {
        enabled: false,
        ..SnapConfig::default()
    });
    assert_eq!(session.host().installed_count(), 0);
    assert_eq!(session.handle_event(hotkey()), EventResult::PassThrough);
    assert_eq!(session.mode(), Mode::Idle);
}

#[test]
fn test_hotkey_starts_picking() {
    let (mut session, _, observed) = session();
    assert_eq!(session.handle_event(hotkey()), EventResult::Handled);
    assert_eq!(session.mode(), Mode::Selecting);
    assert_eq!(observed.last_count(), Some(0));
    assert_eq!(session.store().clears, 1);
    assert_eq!(session.host().global_cursor.as_deref(), Some("crosshair"));
    let banner = session.host().banner.as_ref().expect("banner shown");
    assert!(banner.html.contains("Click to select"));
    assert_listeners_match_mode(&session);
}

#[test]
fn test_hotkey_matching_rules() {
    let (mut session, _, _) = session();
    // Cmd counts as ctrl, and the key is case-insensitive.
    assert!(session.is_hotkey(&KeyInput::new("E").with_meta()));
    assert!(!session.is_hotkey(&KeyInput::new("e")));
    assert!(!session.is_hotkey(&KeyInput::new("e").with_alt()));
    assert!(!session.is_hotkey(&KeyInput::new("x").with_ctrl()));

    session.handle_event(SnapEvent::KeyUp(KeyInput::new("E").with_meta()));
    assert_eq!(session.mode(), Mode::Selecting);

    let (session, _, _) = session_with(SnapConfig {
        hotkey: "k".into(),
        hotkey_modifier: HotkeyModifier::Shift,
        ..SnapConfig::default()
    });
    assert!(session.is_hotkey(&KeyInput::new("K").with_shift()));
    assert!(!session.is_hotkey(&KeyInput::new("k").with_ctrl()));
}

#[test]
fn test_hotkey_resumes_when_selection_exists() {
    let (mut session, page, _) = session();
    session.handle_event(hotkey());
    session.handle_event(click(page.a));
    session.handle_event(SnapEvent::KeyUp(KeyInput::new("Enter")));
    assert_eq!(session.mode(), Mode::DialogOpen);

    session.handle_event(hotkey());
    assert_eq!(session.mode(), Mode::Selecting);
    assert_eq!(handles(&session), vec![Some(page.a)]);
    assert!(session.host().dialog.is_none());
    assert_listeners_match_mode(&session);
}

#[test]
fn test_select_twice_toggles_out() {
    let (mut session, page, observed) = session();
    session.start();
    session.select(page.b);
    let before = handles(&session);

    assert_eq!(session.select(page.a), SelectOutcome::Added);
    assert_eq!(session.select(page.a), SelectOutcome::Removed);
    assert_eq!(handles(&session), before);
    assert!(!session.host().is_marked(page.a));
    assert_eq!(session.host().inline(page.a, StyleProperty::Outline), "1px solid red");
    assert_eq!(*observed.counts.borrow(), vec![0, 1, 2, 1]);
}

#[test]
fn test_capture_snapshot_fields() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.select(page.b);

    let snaps = session.snapshots();
    assert_eq!(snaps[0].tag, "div");
    assert_eq!(snaps[0].id, "hero");
    assert_eq!(snaps[0].classes, vec!["card"]);
    assert_eq!(snaps[0].url, "https://example.com/page");
    assert_eq!(snaps[0].selector.as_deref(), Some("html > body > div"));
    assert_eq!(snaps[1].text, "hello");
    assert_eq!(snaps[1].html, "<p>  hello  </p>");
}

#[test]
fn test_unreadable_url_captures_empty() {
    let (mut session, page, _) = session();
    session.host_mut().url = Err(crate::HostError::Location("sandboxed".into()));
    session.start();
    session.select(page.a);
    assert_eq!(session.snapshots()[0].url, "");
}

#[test]
fn test_roots_and_exclusions_rejected() {
    let (mut session, page, _) = session_with(SnapConfig {
        exclude_selectors: vec!["[broken".into(), ".ad".into()],
        ..SnapConfig::default()
    });
    session.start();
    let body = session.host().body();
    let html = session.host().html_root();

    assert_eq!(session.select(body), SelectOutcome::Rejected(RejectReason::DocumentRoot));
    assert_eq!(session.select(html), SelectOutcome::Rejected(RejectReason::DocumentRoot));
    assert_eq!(session.select(page.ad), SelectOutcome::Rejected(RejectReason::Excluded));
    // A malformed rule is skipped, not fatal.
    assert_eq!(session.select(page.c), SelectOutcome::Added);
    assert_eq!(session.selection().len(), 1);
}

#[test]
fn test_ceiling_scenario() {
    let (mut session, page, _) = session_with(SnapConfig {
        max_elements: NonZeroUsize::new(2),
        ..SnapConfig::default()
    });
    session.start();

    session.select(page.a);
    session.select(page.b);
    assert_eq!(handles(&session), vec![Some(page.a), Some(page.b)]);

    assert_eq!(session.select(page.c), SelectOutcome::Rejected(RejectReason::AtCeiling));
    assert_eq!(handles(&session), vec![Some(page.a), Some(page.b)]);
    assert!(!session.host().is_marked(page.c));

    assert!(session.remove(0));
    assert_eq!(handles(&session), vec![Some(page.b)]);

    assert_eq!(session.select(page.c), SelectOutcome::Added);
    assert_eq!(handles(&session), vec![Some(page.b), Some(page.c)]);

    // Toggling off is allowed at the ceiling.
    assert_eq!(session.select(page.b), SelectOutcome::Removed);
    assert_eq!(handles(&session), vec![Some(page.c)]);
}

#[test]
fn test_remove_bounds() {
    let (mut session, page, observed) = session();
    session.start();
    for el in [page.a, page.b, page.c] {
        session.select(el);
    }
    let notified = observed.counts.borrow().len();

    for index in [3, 4, usize::MAX] {
        assert!(!session.remove(index));
    }
    assert_eq!(session.selection().len(), 3);
    assert_eq!(observed.counts.borrow().len(), notified);

    assert!(session.remove(1));
    assert_eq!(handles(&session), vec![Some(page.a), Some(page.c)]);
    assert!(!session.host().is_marked(page.b));
    assert_eq!(session.host().inline(page.b, StyleProperty::Cursor), "pointer");
}

#[test]
fn test_close_resets_from_every_state() {
    let setups: Vec<(&str, fn(&mut TestSession, &Page))> = vec![
        ("idle", |_, _| {}),
        ("selecting", |s, p| {
            s.start();
            s.select(p.a);
            s.set_note("note");
        }),
        ("paused", |s, p| {
            s.start();
            s.select(p.a);
            s.pause();
        }),
        ("dialog", |s, p| {
            s.start();
            s.select(p.a);
            s.select(p.b);
            s.finish();
            s.set_note("context");
        }),
        ("restored", |s, _| {
            s.handle_event(SnapEvent::Restored(vec![restored_snapshot("li")]));
        }),
    ];

    for (name, setup) in setups {
        let (mut session, page, observed) = session();
        setup(&mut session, &page);
        session.close();

        assert_eq!(session.mode(), Mode::Idle, "{name}");
        assert!(session.selection().is_empty(), "{name}");
        assert_eq!(session.note(), "", "{name}");
        assert!(session.store().saved().is_none(), "{name}");
        assert_eq!(observed.last_count(), Some(0), "{name}");
        assert!(session.host().banner.is_none(), "{name}");
        assert!(session.host().dialog.is_none(), "{name}");
        assert!(session.host().global_cursor.is_none(), "{name}");
        assert_listeners_match_mode(&session);
    }
}

#[test]
fn test_close_restores_exact_styles() {
    let (mut session, page, _) = session();
    let original: Vec<_> = [page.a, page.b, page.c]
        .iter()
        .map(|&el| {
            [
                StyleProperty::Outline,
                StyleProperty::OutlineOffset,
                StyleProperty::Cursor,
                StyleProperty::BoxShadow,
            ]
            .map(|prop| session.host().inline(el, prop).to_string())
        })
        .collect();

    session.handle_event(hotkey());
    session.handle_event(hover(page.a));
    session.handle_event(click(page.a));
    session.handle_event(hover(page.b));
    session.handle_event(click(page.c));
    session.handle_event(hover(page.a));
    session.handle_event(hover(page.c));
    assert_eq!(
        session.host().inline(page.c, StyleProperty::Outline),
        "2px solid #000000"
    );
    session.handle_event(SnapEvent::KeyUp(KeyInput::new("Escape")));

    for (el, before) in [page.a, page.b, page.c].iter().zip(original) {
        let after = [
            StyleProperty::Outline,
            StyleProperty::OutlineOffset,
            StyleProperty::Cursor,
            StyleProperty::BoxShadow,
        ]
        .map(|prop| session.host().inline(*el, prop).to_string());
        assert_eq!(after, before, "{el:?}");
        assert!(!session.host().is_marked(*el));
    }
}

#[test]
fn test_listeners_follow_mode_through_cycles() {
    let (mut session, page, _) = session();
    for _ in 0..3 {
        session.handle_event(hotkey());
        assert_listeners_match_mode(&session);
        session.handle_event(click(page.a));
        session.handle_event(SnapEvent::KeyUp(KeyInput::new(" ")));
        assert_eq!(session.mode(), Mode::Paused);
        assert_listeners_match_mode(&session);
        session.handle_event(SnapEvent::Overlay(OverlayAction::TogglePause));
        session.handle_event(SnapEvent::KeyUp(KeyInput::new("Enter")));
        assert_eq!(session.mode(), Mode::DialogOpen);
        assert_listeners_match_mode(&session);
        session.handle_event(SnapEvent::Overlay(OverlayAction::AddMore));
        assert_listeners_match_mode(&session);
        session.handle_event(SnapEvent::KeyUp(KeyInput::new("Escape")));
        assert_listeners_match_mode(&session);
    }
    assert_eq!(session.host().installed_count(), 1);

    session.destroy();
    assert_eq!(session.host().installed_count(), 0);
    assert_eq!(session.host().unbalanced, 0);
}

#[test]
fn test_destroy_mid_drag_removes_everything() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.finish();
    session.handle_event(SnapEvent::DragStart {
        client: Position::new(400.0, 200.0),
        on_button: false,
    });
    assert!(session.host().is_installed(ListenerSet::Drag));

    session.destroy();
    assert_eq!(session.host().installed_count(), 0);
    assert_eq!(session.host().unbalanced, 0);
    assert!(session.is_destroyed());

    assert_eq!(session.handle_event(hotkey()), EventResult::PassThrough);
    assert_eq!(session.mode(), Mode::Idle);
    assert_eq!(session.select(page.b), SelectOutcome::Rejected(RejectReason::Inactive));
    assert_eq!(session.host().installed_count(), 0);
}

#[test]
fn test_space_toggles_pause() {
    let (mut session, page, _) = session();
    session.handle_event(hotkey());

    assert_eq!(session.handle_event(SnapEvent::KeyUp(KeyInput::new(" "))), EventResult::Handled);
    assert_eq!(session.mode(), Mode::Paused);
    assert!(session.host().global_cursor.is_none());
    assert!(session.host().banner.as_ref().unwrap().html.contains("▶ Resume"));

    // Paused: no hover, clicks reach the page.
    session.handle_event(hover(page.a));
    assert_eq!(session.hovered(), None);
    assert_eq!(session.handle_event(click(page.a)), EventResult::PassThrough);
    assert!(session.selection().is_empty());

    // Enter does nothing while paused.
    session.handle_event(SnapEvent::KeyUp(KeyInput::new("Enter")));
    assert_eq!(session.mode(), Mode::Paused);

    // Typing a space in a field is not a pause toggle.
    let typed = session.handle_event(SnapEvent::KeyUp(KeyInput::new(" ").in_text_field()));
    assert_eq!(typed, EventResult::PassThrough);
    assert_eq!(session.mode(), Mode::Paused);

    session.handle_event(SnapEvent::KeyUp(KeyInput::new(" ")));
    assert_eq!(session.mode(), Mode::Selecting);
    assert_eq!(session.host().global_cursor.as_deref(), Some("crosshair"));
}

#[test]
fn test_space_press_is_swallowed_while_picking() {
    let (mut session, _, _) = session();
    let press = || SnapEvent::KeyDown(KeyInput::new(" "));
    assert_eq!(session.handle_event(press()), EventResult::PassThrough);

    session.handle_event(hotkey());
    assert_eq!(session.handle_event(press()), EventResult::Handled);
    // The press alone never toggles.
    assert_eq!(session.mode(), Mode::Selecting);
    assert_eq!(
        session.handle_event(SnapEvent::KeyDown(KeyInput::new(" ").in_text_field())),
        EventResult::PassThrough
    );

    session.pause();
    assert_eq!(session.handle_event(press()), EventResult::Handled);
    assert_eq!(session.mode(), Mode::Paused);
}

#[test]
fn test_space_outside_picking_passes_through() {
    let (mut session, _, _) = session();
    assert_eq!(
        session.handle_event(SnapEvent::KeyUp(KeyInput::new(" "))),
        EventResult::PassThrough
    );
    assert_eq!(session.mode(), Mode::Idle);
}

#[test]
fn test_pause_clears_hover() {
    let (mut session, page, _) = session();
    session.start();
    session.handle_event(hover(page.b));
    assert_eq!(session.hovered(), Some(&page.b));
    session.toggle_pause();
    assert_eq!(session.hovered(), None);
    assert_eq!(session.host().inline(page.b, StyleProperty::Cursor), "pointer");
}

#[test]
fn test_mouse_move_rules() {
    let (mut session, page, _) = session_with(SnapConfig {
        hover_color: "#0066ff".into(),
        exclude_selectors: vec![".ad".into()],
        ..SnapConfig::default()
    });

    // Not picking yet.
    session.handle_event(hover(page.a));
    assert_eq!(session.hovered(), None);

    session.start();
    session.handle_event(hover(page.a));
    assert_eq!(session.hovered(), Some(&page.a));
    assert_eq!(session.host().inline(page.a, StyleProperty::Outline), "2px solid #0066ff");

    for ignored in [page.overlay, page.ad, session.host().body()] {
        session.handle_event(hover(ignored));
        assert_eq!(session.hovered(), Some(&page.a));
    }

    session.handle_event(SnapEvent::MouseMove(PointerTarget::Text { parent: Some(page.c) }));
    assert_eq!(session.hovered(), Some(&page.c));
    assert_eq!(session.host().inline(page.a, StyleProperty::Outline), "1px solid red");
}

#[test]
fn test_click_capture_rules() {
    let (mut session, page, _) = session_with(SnapConfig {
        exclude_selectors: vec![".ad".into()],
        ..SnapConfig::default()
    });
    assert_eq!(session.handle_event(click(page.a)), EventResult::PassThrough);

    session.start();
    assert_eq!(session.handle_event(click(page.overlay)), EventResult::PassThrough);

    let body = session.host().body();
    assert_eq!(session.handle_event(click(body)), EventResult::Captured);
    assert_eq!(session.handle_event(click(page.ad)), EventResult::Captured);
    assert!(session.selection().is_empty());

    let text = SnapEvent::Click(PointerTarget::Text { parent: Some(page.b) });
    assert_eq!(session.handle_event(text), EventResult::Captured);
    assert_eq!(handles(&session), vec![Some(page.b)]);
    assert_eq!(session.hovered(), None);

    let orphan = SnapEvent::Click(PointerTarget::Text { parent: None });
    assert_eq!(session.handle_event(orphan), EventResult::PassThrough);
}

#[test]
fn test_banner_tracks_count() {
    let (mut session, page, _) = session_with(SnapConfig {
        max_elements: NonZeroUsize::new(3),
        selected_color: "#00cc66".into(),
        ..SnapConfig::default()
    });
    session.start();
    session.select(page.a);
    session.select(page.b);
    let banner = session.host().banner.as_ref().unwrap();
    assert!(banner.html.contains("color: #00cc66\">2/3</span>"));
}

#[test]
fn test_hidden_banner_never_mounts() {
    let (mut session, page, _) = session_with(SnapConfig {
        show_banner: false,
        ..SnapConfig::default()
    });
    session.start();
    session.select(page.a);
    assert!(session.host().banner.is_none());
    assert_eq!(session.host().banner_mounts, 0);
}

#[test]
fn test_finish_opens_dialog_at_random_position() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.handle_event(SnapEvent::KeyUp(KeyInput::new("Enter")));

    assert_eq!(session.mode(), Mode::DialogOpen);
    assert_eq!(session.position(), Position::new(390.0, 140.0));
    assert!(session.host().banner.is_none());
    assert!(!session.host().is_installed(ListenerSet::Pointer));
    let dialog = session.host().dialog.as_ref().expect("dialog shown");
    assert!(dialog.style.contains("left: 390px; top: 140px;"));
    assert!(!dialog.html.contains("data-finish-btn"));
}

#[test]
fn test_finish_with_nothing_goes_idle() {
    let (mut session, _, _) = session();
    session.start();
    session.finish();
    assert_eq!(session.mode(), Mode::Idle);
    assert!(session.host().dialog.is_none());
    assert!(session.host().banner.is_none());
    assert_listeners_match_mode(&session);
}

#[test]
fn test_enter_ignored_when_auto_open_or_typing() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.handle_event(SnapEvent::KeyUp(KeyInput::new("Enter").in_text_field()));
    assert_eq!(session.mode(), Mode::Selecting);

    let (mut session, _, _) = session_with(SnapConfig {
        auto_open_dialog: true,
        ..SnapConfig::default()
    });
    session.start();
    session.handle_event(SnapEvent::KeyUp(KeyInput::new("Enter")));
    assert_eq!(session.mode(), Mode::Selecting);
}

#[test]
fn test_auto_open_shows_dialog_while_picking() {
    let (mut session, page, _) = session_with(SnapConfig {
        auto_open_dialog: true,
        ..SnapConfig::default()
    });
    session.start();
    assert!(session.host().banner.as_ref().is_some_and(|b| !b.html.contains("Enter to finish")));

    session.select(page.a);
    assert!(session.is_dialog_open());
    assert_eq!(session.mode(), Mode::Selecting);
    assert!(session.host().banner.is_none());
    let dialog = session.host().dialog.as_ref().unwrap();
    assert!(dialog.html.contains("data-finish-btn"));

    session.select(page.b);
    assert!(session.host().dialog.as_ref().unwrap().html.contains("2 elements"));

    // "Add more" keeps the dialog in this mode.
    session.handle_event(SnapEvent::Overlay(OverlayAction::AddMore));
    assert!(session.is_dialog_open());

    session.handle_event(SnapEvent::Overlay(OverlayAction::Finish));
    assert_eq!(session.mode(), Mode::DialogOpen);
}

#[test]
fn test_dialog_actions() {
    let (mut session, page, observed) = session();
    session.start();
    for el in [page.a, page.b, page.c] {
        session.select(el);
    }
    session.finish();

    session.handle_event(SnapEvent::Overlay(OverlayAction::Remove(1)));
    assert_eq!(handles(&session), vec![Some(page.a), Some(page.c)]);
    assert!(session.host().dialog.as_ref().unwrap().html.contains("2 elements"));

    session.handle_event(SnapEvent::NoteInput("keep me".into()));
    session.handle_event(SnapEvent::Overlay(OverlayAction::ClearAll));
    assert!(session.selection().is_empty());
    assert_eq!(session.note(), "keep me");
    assert_eq!(observed.last_count(), Some(0));
    assert!(session.store().saved().is_none());
    assert!(session.host().dialog.is_none());
    assert_eq!(session.mode(), Mode::Idle);
    assert_listeners_match_mode(&session);
}

#[test]
fn test_remove_last_hides_dialog() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.finish();
    assert!(session.remove(0));
    assert_eq!(session.mode(), Mode::Idle);
    assert!(session.host().dialog.is_none());
    assert!(session.store().saved().is_none());

    // A later pick does not resurrect the old dialog.
    session.start();
    session.select(page.b);
    assert!(session.host().dialog.is_none());
}

#[test]
fn test_note_input_does_not_rerender() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.finish();
    let mounts = session.host().dialog_mounts;

    session.handle_event(SnapEvent::NoteInput("typing".into()));
    assert_eq!(session.host().dialog_mounts, mounts);
    assert_eq!(session.note(), "typing");

    session.set_note("<b>set</b>");
    assert_eq!(session.host().dialog_mounts, mounts + 1);
    assert!(session.host().dialog.as_ref().unwrap().html.contains("&lt;b&gt;set&lt;/b&gt;"));
}

#[test]
fn test_persistence_write_through() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.select(page.b);
    let saved = session.store().saved().expect("persisted");
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[1].tag, "p");

    session.select(page.b);
    assert_eq!(session.store().saved().map(<[_]>::len), Some(1));

    session.close();
    assert!(session.store().saved().is_none());
}

#[test]
fn test_drag_moves_and_clamps() {
    let (mut session, page, _) = session();
    session.start();
    session.select(page.a);
    session.finish();
    let origin = session.position();

    let on_button = SnapEvent::DragStart {
        client: Position::new(origin.x + 470.0, origin.y + 10.0),
        on_button: true,
    };
    assert_eq!(session.handle_event(on_button), EventResult::PassThrough);
    assert!(!session.host().is_installed(ListenerSet::Drag));

    let grab = SnapEvent::DragStart {
        client: Position::new(origin.x + 10.0, origin.y + 5.0),
        on_button: false,
    };
    assert_eq!(session.handle_event(grab), EventResult::Handled);
    assert!(session.host().is_installed(ListenerSet::Drag));

    session.handle_event(SnapEvent::DragMove {
        client: Position::new(110.0, 105.0),
    });
    assert_eq!(session.position(), Position::new(100.0, 100.0));
    assert_eq!(session.host().dialog_position, Some(Position::new(100.0, 100.0)));

    session.handle_event(SnapEvent::DragMove {
        client: Position::new(-50.0, 5000.0),
    });
    // 800 tall viewport, 420 tall dialog.
    assert_eq!(session.position(), Position::new(0.0, 380.0));

    session.handle_event(SnapEvent::DragMove {
        client: Position::new(5000.0, -5.0),
    });
    assert_eq!(session.position(), Position::new(800.0, 0.0));

    session.handle_event(SnapEvent::DragEnd);
    assert!(!session.host().is_installed(ListenerSet::Drag));
    session.handle_event(SnapEvent::DragMove {
        client: Position::new(300.0, 300.0),
    });
    assert_eq!(session.position(), Position::new(800.0, 0.0));
    assert_eq!(session.host().unbalanced, 0);
}

#[test]
fn test_copy_round_trip() {
    let (mut session, page, observed) = session();
    assert!(!session.copy());

    session.start();
    session.select(page.c);
    session.finish();
    session.handle_event(SnapEvent::NoteInput("why".into()));
    session.handle_event(SnapEvent::Overlay(OverlayAction::Copy));

    let written = session.host().clipboard_writes.last().cloned().expect("copy started");
    assert_eq!(
        written,
        "=== Element 1 ===\nurl: https://example.com/page\ntag: span\nselector: html > body > span\n\nHTML:\n<span></span>\n\n=== Prompt ===\nwhy"
    );
    assert!(observed.copies.borrow().is_empty());

    session.handle_event(SnapEvent::ClipboardWritten(Ok(written.clone())));
    assert_eq!(*observed.copies.borrow(), vec![written]);
    assert_eq!(session.host().flashes, 1);
}

#[test]
fn test_failed_copy_is_silent() {
    let (mut session, page, observed) = session();
    session.start();
    session.select(page.a);
    session.finish();
    session.copy();
    session.handle_event(SnapEvent::ClipboardWritten(Err("denied".into())));
    assert!(observed.copies.borrow().is_empty());
    assert_eq!(session.host().flashes, 0);
    assert_eq!(session.mode(), Mode::DialogOpen);
}

fn restored_snapshot(tag: &str) -> ElementSnapshot {
    ElementSnapshot {
        tag: tag.into(),
        id: String::new(),
        classes: vec![],
        html: format!("<{tag}></{tag}>"),
        text: String::new(),
        url: "https://example.com/old".into(),
        selector: None,
    }
}

#[test]
fn test_restore_shows_banner_without_dialog() {
    let (mut session, page, observed) = session();
    session.handle_event(SnapEvent::Restored(vec![
        restored_snapshot("li"),
        restored_snapshot("h2"),
    ]));

    assert_eq!(session.selection().len(), 2);
    assert!(session.selection().iter().all(|e| e.handle.is_none()));
    assert_eq!(observed.last_count(), Some(2));
    assert!(session.host().banner.as_ref().unwrap().html.contains(">2</span>"));
    assert!(session.host().dialog.is_none());
    assert_eq!(session.mode(), Mode::Idle);
    assert!(session.host().marked_elements().is_empty());

    // Hotkey resumes instead of wiping the restored list.
    session.handle_event(hotkey());
    assert_eq!(session.selection().len(), 2);
    session.select(page.a);
    assert_eq!(session.selection().len(), 3);
    assert!(session.host().is_marked(page.a));

    session.finish();
    session.remove(0);
    assert_eq!(session.selection().len(), 2);
    assert!(session.copy());
}

#[test]
fn test_restore_ignored_when_empty_or_busy() {
    let (mut session, page, observed) = session();
    session.handle_event(SnapEvent::Restored(vec![]));
    assert!(observed.counts.borrow().is_empty());
    assert!(session.host().banner.is_none());

    session.start();
    session.select(page.a);
    session.handle_event(SnapEvent::Restored(vec![restored_snapshot("li")]));
    assert_eq!(handles(&session), vec![Some(page.a)]);
}

#[test]
fn test_restore_after_hotkey_is_ignored() {
    let (mut session, _, observed) = session();
    session.handle_event(hotkey());
    session.handle_event(SnapEvent::Restored(vec![restored_snapshot("li")]));

    assert_eq!(session.mode(), Mode::Selecting);
    assert!(session.selection().is_empty());
    assert_eq!(*observed.counts.borrow(), vec![0]);
    assert!(session.host().banner.as_ref().unwrap().html.contains(">0</span>"));
}

#[test]
fn test_restore_after_close_is_ignored() {
    let (mut session, _, observed) = session();
    session.close();
    session.handle_event(SnapEvent::Restored(vec![restored_snapshot("li")]));

    assert_eq!(session.mode(), Mode::Idle);
    assert!(session.selection().is_empty());
    assert_eq!(*observed.counts.borrow(), vec![0]);
    assert!(session.host().banner.is_none());
}

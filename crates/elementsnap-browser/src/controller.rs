//! A session bound to the current page.

use std::cell::{OnceCell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use elementsnap_core::{
    Destroy, ElementSnapshot, EventResult, HostError, Mode, SelectedElement, Session,
    SnapCallbacks, SnapConfig, SnapEvent,
};
use web_sys::Element;

use crate::events::Dispatch;
use crate::host::BrowserHost;
use crate::storage::BrowserStore;

pub type BrowserSession = Session<BrowserHost, BrowserStore>;

/// An observer call held back until the session borrow is released.
enum Notice {
    SelectionChanged(Vec<SelectedElement<Element>>),
    Copied(String),
}

type Pending = Rc<RefCell<VecDeque<Notice>>>;

struct Shared {
    session: RefCell<BrowserSession>,
    pending: Pending,
    observers: SnapCallbacks<Element>,
}

impl Shared {
    /// Run queued observers in order. Nothing is borrowed while one runs.
    fn flush(&self) {
        loop {
            let Some(notice) = self.pending.borrow_mut().pop_front() else {
                break;
            };
            match notice {
                Notice::SelectionChanged(selection) => {
                    if let Some(observer) = &self.observers.on_selection_change {
                        observer(&selection);
                    }
                }
                Notice::Copied(text) => {
                    if let Some(observer) = &self.observers.on_copy {
                        observer(&text);
                    }
                }
            }
        }
    }
}

/// Session-side callbacks that only enqueue.
fn deferred(pending: &Pending, observers: &SnapCallbacks<Element>) -> SnapCallbacks<Element> {
    let mut callbacks = SnapCallbacks::default();
    if observers.on_selection_change.is_some() {
        let pending = pending.clone();
        callbacks.on_selection_change = Some(Box::new(move |selection: &[_]| {
            pending
                .borrow_mut()
                .push_back(Notice::SelectionChanged(selection.to_vec()));
        }));
    }
    if observers.on_copy.is_some() {
        let pending = pending.clone();
        callbacks.on_copy = Some(Box::new(move |text: &str| {
            pending
                .borrow_mut()
                .push_back(Notice::Copied(text.to_string()));
        }));
    }
    callbacks
}

/// Shared handle to a [`BrowserSession`].
///
/// DOM listeners hold only a weak reference, so dropping every controller
/// clone drops the session, its listeners and its overlay. Call
/// [`destroy`](Self::destroy) first to also restore page styles.
///
/// Observers run once the call that triggered them has left the session,
/// so they can query and drive the controller freely.
#[derive(Clone)]
pub struct SnapController {
    shared: Rc<Shared>,
}

fn deliver(shared: &Weak<Shared>, event: SnapEvent<Element>) -> EventResult {
    let Some(shared) = shared.upgrade() else {
        return EventResult::PassThrough;
    };
    let result = match shared.session.try_borrow_mut() {
        Ok(mut session) => session.handle_event(event),
        Err(_) => {
            tracing::warn!(?event, "session busy, dropping event");
            return EventResult::PassThrough;
        }
    };
    shared.flush();
    result
}

impl SnapController {
    /// Build a session on the current page.
    ///
    /// The store is chosen by [`BrowserStore::detect`]; any persisted
    /// selection is restored once the store answers.
    pub fn new(config: SnapConfig, observers: SnapCallbacks<Element>) -> Result<Self, HostError> {
        let target: Rc<OnceCell<Weak<Shared>>> = Rc::new(OnceCell::new());
        let dispatch: Dispatch = {
            let target = target.clone();
            Rc::new(move |event: SnapEvent<Element>| match target.get() {
                Some(shared) => deliver(shared, event),
                None => EventResult::PassThrough,
            })
        };

        let host = BrowserHost::new(dispatch.clone())?;
        let store = BrowserStore::detect(dispatch);
        tracing::debug!(?store, "selection store selected");

        let pending = Pending::default();
        let callbacks = deferred(&pending, &observers);
        let shared = Rc::new(Shared {
            session: RefCell::new(Session::new(host, store, config, callbacks)),
            pending,
            observers,
        });
        let _ = target.set(Rc::downgrade(&shared));
        Ok(Self { shared })
    }

    /// Run `f` against the session unless it is already borrowed, then run
    /// the observers it triggered.
    pub fn with<R>(&self, f: impl FnOnce(&mut BrowserSession) -> R) -> Option<R> {
        let result = match self.shared.session.try_borrow_mut() {
            Ok(mut session) => f(&mut session),
            Err(_) => {
                tracing::warn!("session is busy; call ignored");
                return None;
            }
        };
        self.shared.flush();
        Some(result)
    }

    fn read<R>(&self, fallback: R, f: impl FnOnce(&BrowserSession) -> R) -> R {
        match self.shared.session.try_borrow() {
            Ok(session) => f(&session),
            Err(_) => {
                tracing::warn!("session is busy; query answered with a default");
                fallback
            }
        }
    }

    pub fn start(&self) {
        self.with(BrowserSession::start);
    }

    pub fn resume(&self) {
        self.with(BrowserSession::resume);
    }

    pub fn finish(&self) {
        self.with(BrowserSession::finish);
    }

    pub fn close(&self) {
        self.with(BrowserSession::close);
    }

    pub fn toggle_pause(&self) {
        self.with(BrowserSession::toggle_pause);
    }

    pub fn clear_all(&self) {
        self.with(BrowserSession::clear_all);
    }

    pub fn remove(&self, index: usize) -> bool {
        self.with(|session| session.remove(index)).unwrap_or(false)
    }

    pub fn set_note(&self, note: String) {
        self.with(|session| session.set_note(note));
    }

    /// Start a clipboard write of the current payload.
    pub fn copy(&self) -> bool {
        self.with(BrowserSession::copy).unwrap_or(false)
    }

    pub fn mode(&self) -> Mode {
        self.read(Mode::Idle, BrowserSession::mode)
    }

    pub fn snapshots(&self) -> Vec<ElementSnapshot> {
        self.read(Vec::new(), BrowserSession::snapshots)
    }

    pub fn selection(&self) -> Vec<SelectedElement<Element>> {
        self.read(Vec::new(), |session| session.selection().to_vec())
    }

    pub fn note(&self) -> String {
        self.read(String::new(), |session| session.note().to_string())
    }

    pub fn is_destroyed(&self) -> bool {
        self.read(false, BrowserSession::is_destroyed)
    }

    /// Reset the page and remove every listener. The session ignores all
    /// later calls.
    pub fn destroy(&self) {
        self.with(BrowserSession::destroy);
    }

    /// Deliver an event as if a listener had fired.
    pub fn dispatch(&self, event: SnapEvent<Element>) -> EventResult {
        deliver(&Rc::downgrade(&self.shared), event)
    }
}

impl Destroy for SnapController {
    fn destroy(&mut self) {
        SnapController::destroy(self);
    }
}

impl std::fmt::Debug for SnapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shared.session.try_borrow() {
            Ok(session) => std::fmt::Debug::fmt(&*session, f),
            Err(_) => f.write_str("SnapController { <busy> }"),
        }
    }
}

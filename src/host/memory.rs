//! MemoryHost: In-Process Editor Host
//!
//! A native host that keeps documents, focus and decorations in memory and
//! delivers events synchronously. Useful for embedding the annotator in a
//! Rust editor and for exercising it without a JavaScript runtime.
//!
//! # Usage
//! ```rust
//! use emote_inlay::{activate, MemoryContext, MemoryHost};
//!
//! let host = MemoryHost::new();
//! let view = host.open("hi <:wave:12345678901234567>");
//! host.focus(Some(&view));
//!
//! let mut context = MemoryContext::default();
//! activate(&mut context, host.clone());
//!
//! host.edit(&view, "<a:dance:12345678901234567> and more");
//! assert_eq!(view.overlays().len(), 1);
//!
//! context.dispose_all();
//! assert!(view.overlays().is_empty());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::config::OverlayStyle;
use crate::host::{
    deliver, Disposable, DocumentChangeEvent, EditorHost, ExtensionContext, ObserverRef,
    TextView, ViewFocusEvent,
};
use crate::scanner::{text_lines, OverlayAnnotation};

// =============================================================================
// Views
// =============================================================================

#[derive(Debug)]
struct ViewState {
    lines: Vec<String>,
    /// decoration id -> overlays
    overlays: BTreeMap<u64, Vec<OverlayAnnotation>>,
    overlay_writes: usize,
}

/// Non-owning handle to a view opened on a `MemoryHost`
#[derive(Debug, Clone)]
pub struct MemoryView {
    id: u64,
    state: Weak<RefCell<ViewState>>,
}

/// Decoration type created by a `MemoryHost`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDecoration {
    pub id: u64,
    pub style: OverlayStyle,
}

impl MemoryView {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// All overlays on this view, grouped by decoration type in creation order
    pub fn overlays(&self) -> Vec<OverlayAnnotation> {
        self.with_state(|state| state.overlays.values().flatten().cloned().collect())
            .unwrap_or_default()
    }

    /// Overlays set through one decoration type
    pub fn overlays_for(&self, decoration: &MemoryDecoration) -> Vec<OverlayAnnotation> {
        self.with_state(|state| state.overlays.get(&decoration.id).cloned())
            .flatten()
            .unwrap_or_default()
    }

    /// Number of `set_overlays` calls that reached this view
    pub fn overlay_writes(&self) -> usize {
        self.with_state(|state| state.overlay_writes).unwrap_or(0)
    }

    /// Current text, lines joined with `\n`
    pub fn text(&self) -> Option<String> {
        self.with_state(|state| state.lines.join("\n"))
    }

    fn with_state<R>(&self, f: impl FnOnce(&ViewState) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let state = state.borrow();
        Some(f(&state))
    }
}

impl TextView for MemoryView {
    type Decoration = MemoryDecoration;

    fn line_count(&self) -> usize {
        self.with_state(|state| state.lines.len()).unwrap_or(0)
    }

    fn line(&self, index: usize) -> Option<String> {
        self.with_state(|state| state.lines.get(index).cloned()).flatten()
    }

    fn set_overlays(&self, decoration: &MemoryDecoration, overlays: &[OverlayAnnotation]) {
        if let Some(state) = self.state.upgrade() {
            let mut state = state.borrow_mut();
            state.overlays.insert(decoration.id, overlays.to_vec());
            state.overlay_writes += 1;
        }
    }

    fn is_disposed(&self) -> bool {
        self.state.strong_count() == 0
    }
}

// =============================================================================
// MemoryHost
// =============================================================================

#[derive(Default)]
struct HostInner {
    views: RefCell<BTreeMap<u64, Rc<RefCell<ViewState>>>>,
    active: Cell<Option<u64>>,
    document_observers: RefCell<Vec<(u64, ObserverRef<DocumentChangeEvent>)>>,
    focus_observers: RefCell<Vec<(u64, ObserverRef<ViewFocusEvent>)>>,
    next_id: Cell<u64>,
}

impl HostInner {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    fn handle(&self, id: u64) -> Option<MemoryView> {
        self.views.borrow().get(&id).map(|state| MemoryView {
            id,
            state: Rc::downgrade(state),
        })
    }
}

/// In-memory editor host. Clones share the same editor.
#[derive(Clone, Default)]
pub struct MemoryHost {
    inner: Rc<HostInner>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a view on `text` without focusing it
    pub fn open(&self, text: &str) -> MemoryView {
        let id = self.inner.next_id();
        let state = Rc::new(RefCell::new(ViewState {
            lines: split_lines(text),
            overlays: BTreeMap::new(),
            overlay_writes: 0,
        }));
        let view = MemoryView {
            id,
            state: Rc::downgrade(&state),
        };
        self.inner.views.borrow_mut().insert(id, state);
        view
    }

    /// Move focus to `view`, or away from every view
    pub fn focus(&self, view: Option<&MemoryView>) {
        let id = view.map(MemoryView::id).filter(|id| self.inner.views.borrow().contains_key(id));
        self.inner.active.set(id);
        self.emit_focus(id);
    }

    /// Replace the text of `view` and announce the change. Closed views are ignored.
    pub fn edit(&self, view: &MemoryView, text: &str) {
        let Some(state) = view.state.upgrade() else {
            return;
        };
        state.borrow_mut().lines = split_lines(text);
        drop(state);

        let event = DocumentChangeEvent {
            document: Some(format!("memory:{}", view.id)),
        };
        emit(&self.inner.document_observers, &event);
    }

    /// Close `view`. Its handles become disposed. Focus is lost if it was active.
    pub fn close(&self, view: &MemoryView) {
        let removed = self.inner.views.borrow_mut().remove(&view.id);
        if removed.is_none() {
            return;
        }
        drop(removed);

        if self.inner.active.get() == Some(view.id) {
            self.inner.active.set(None);
            self.emit_focus(None);
        }
    }

    pub fn view_count(&self) -> usize {
        self.inner.views.borrow().len()
    }

    pub fn observer_count(&self) -> usize {
        self.inner.document_observers.borrow().len() + self.inner.focus_observers.borrow().len()
    }

    fn emit_focus(&self, id: Option<u64>) {
        let event = ViewFocusEvent {
            view: id.map(|id| format!("memory:{}", id)),
        };
        emit(&self.inner.focus_observers, &event);
    }

    fn subscribe(&self, kind: SubscriptionKind) -> (u64, Box<dyn Disposable>) {
        let id = self.inner.next_id();
        let subscription = MemorySubscription {
            host: Rc::downgrade(&self.inner),
            id,
            kind,
        };
        (id, Box::new(subscription))
    }
}

impl EditorHost for MemoryHost {
    type View = MemoryView;

    fn active_view(&self) -> Option<MemoryView> {
        self.inner.active.get().and_then(|id| self.inner.handle(id))
    }

    fn create_decoration(&self, style: &OverlayStyle) -> MemoryDecoration {
        MemoryDecoration {
            id: self.inner.next_id(),
            style: style.clone(),
        }
    }

    fn on_document_changed(&self, observer: ObserverRef<DocumentChangeEvent>) -> Box<dyn Disposable> {
        let (id, subscription) = self.subscribe(SubscriptionKind::Document);
        self.inner.document_observers.borrow_mut().push((id, observer));
        subscription
    }

    fn on_view_focus_changed(&self, observer: ObserverRef<ViewFocusEvent>) -> Box<dyn Disposable> {
        let (id, subscription) = self.subscribe(SubscriptionKind::Focus);
        self.inner.focus_observers.borrow_mut().push((id, observer));
        subscription
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text_lines(text).map(str::to_string).collect()
}

/// Deliver to live observers. The list borrow is released before delivery so
/// observers may subscribe or unsubscribe from inside `notify`.
fn emit<E>(observers: &RefCell<Vec<(u64, ObserverRef<E>)>>, event: &E) {
    let live: Vec<_> = {
        let mut observers = observers.borrow_mut();
        observers.retain(|(_, observer)| observer.strong_count() > 0);
        observers.iter().filter_map(|(_, observer)| observer.upgrade()).collect()
    };
    for observer in live {
        deliver(&observer, event);
    }
}

// =============================================================================
// Subscriptions & Context
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum SubscriptionKind {
    Document,
    Focus,
}

struct MemorySubscription {
    host: Weak<HostInner>,
    id: u64,
    kind: SubscriptionKind,
}

impl Disposable for MemorySubscription {
    fn dispose(&mut self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let id = self.id;
        match self.kind {
            SubscriptionKind::Document => host.document_observers.borrow_mut().retain(|(i, _)| *i != id),
            SubscriptionKind::Focus => host.focus_observers.borrow_mut().retain(|(i, _)| *i != id),
        };
    }
}

/// Extension context that owns registered resources until `dispose_all`
#[derive(Default)]
pub struct MemoryContext {
    resources: Vec<Box<dyn Disposable>>,
}

impl MemoryContext {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Dispose every resource in registration order
    pub fn dispose_all(&mut self) {
        for mut resource in self.resources.drain(..) {
            resource.dispose();
        }
    }
}

impl ExtensionContext for MemoryContext {
    fn register(&mut self, resource: Box<dyn Disposable>) {
        self.resources.push(resource);
    }
}

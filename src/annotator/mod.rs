//! Annotator: keeps emote overlays in sync with the active view
//!
//! # Design Principles
//! 1. State machine: Attached → Disposed (terminal)
//! 2. Every document or focus change rescans the whole active view and
//!    replaces its overlay set in one write
//! 3. The view reference is a handle, never ownership; a view the host has torn
//!    down is skipped silently
//!
//! # Usage
//! ```rust
//! use emote_inlay::{Annotator, MemoryHost, OverlayStyle, Observer, DocumentChangeEvent};
//!
//! let host = MemoryHost::new();
//! let view = host.open("<:wave:12345678901234567>");
//! host.focus(Some(&view));
//!
//! let mut annotator = Annotator::new(host.clone(), &OverlayStyle::default());
//! assert_eq!(view.overlays().len(), 1);
//!
//! annotator.notify(&DocumentChangeEvent::default());
//! annotator.dispose();
//! assert!(view.overlays().is_empty());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::OverlayStyle;
use crate::host::{Disposable, DocumentChangeEvent, EditorHost, Observer, TextView, ViewFocusEvent};
use crate::scanner::{EmoteScanner, ScanStats};

// =============================================================================
// State Machine
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Reacting to events, may or may not track a view
    Attached,
    /// Subscriptions released, overlays cleared. Terminal.
    Disposed,
}

// =============================================================================
// Annotator
// =============================================================================

/// Overlay synchronizer for one editor host
pub struct Annotator<H: EditorHost> {
    host: H,
    scanner: EmoteScanner,
    decoration: <H::View as TextView>::Decoration,
    view: Option<H::View>,
    subscriptions: Vec<Box<dyn Disposable>>,
    state: State,
    last_scan: Option<ScanStats>,
}

impl<H: EditorHost> Annotator<H> {
    /// Create the decoration type from `style`, bind to the active view and
    /// annotate it. Does not subscribe; the caller forwards events via `notify`.
    pub fn new(host: H, style: &OverlayStyle) -> Self {
        let decoration = host.create_decoration(style);
        let view = host.active_view();

        let mut annotator = Self {
            host,
            scanner: EmoteScanner::new(),
            decoration,
            view,
            subscriptions: Vec::new(),
            state: State::Attached,
            last_scan: None,
        };
        annotator.refresh();
        annotator
    }

    /// Create an annotator and subscribe it to the host's change events.
    ///
    /// The host only receives weak observer references, so dropping every
    /// returned handle ends delivery even without `dispose`.
    pub fn attach(host: H, style: &OverlayStyle) -> Rc<RefCell<Self>>
    where
        H: 'static,
    {
        let annotator = Rc::new(RefCell::new(Self::new(host, style)));

        let document_observer: Rc<RefCell<dyn Observer<DocumentChangeEvent>>> = annotator.clone();
        let focus_observer: Rc<RefCell<dyn Observer<ViewFocusEvent>>> = annotator.clone();

        let subscriptions = {
            let this = annotator.borrow();
            vec![
                this.host.on_document_changed(Rc::downgrade(&document_observer)),
                this.host.on_view_focus_changed(Rc::downgrade(&focus_observer)),
            ]
        };
        annotator.borrow_mut().subscriptions = subscriptions;

        annotator
    }

    /// Clear overlays on the tracked view, release subscriptions, stop reacting.
    /// Safe to call repeatedly and after the view has been torn down.
    pub fn dispose(&mut self) {
        if self.state == State::Disposed {
            return;
        }

        if let Some(view) = self.view.take() {
            if !view.is_disposed() {
                view.set_overlays(&self.decoration, &[]);
            }
        }

        for mut subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }

        self.state = State::Disposed;
        tracing::info!("annotator disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.state == State::Disposed
    }

    /// Current state name (for debugging)
    pub fn state_name(&self) -> &'static str {
        match self.state {
            State::Attached => "attached",
            State::Disposed => "disposed",
        }
    }

    /// View the annotator is currently bound to
    pub fn view(&self) -> Option<&H::View> {
        self.view.as_ref()
    }

    /// Statistics of the most recent scan
    pub fn last_scan(&self) -> Option<&ScanStats> {
        self.last_scan.as_ref()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn on_change(&mut self, cause: &'static str) {
        if self.state == State::Disposed {
            tracing::debug!(cause, "event after dispose ignored");
            return;
        }

        // Losing focus leaves the old view's overlays in place until that view
        // is scanned again.
        self.view = self.host.active_view();
        if self.view.is_none() {
            tracing::debug!(cause, "no active view");
        }
        self.refresh();
    }

    /// Rescan the bound view and replace its overlay set
    fn refresh(&mut self) {
        let Some(view) = self.view.as_ref() else {
            return;
        };
        if view.is_disposed() {
            tracing::debug!("bound view torn down, skipping scan");
            return;
        }

        let lines = (0..view.line_count()).map(|index| view.line(index).unwrap_or_default());
        let scan = self.scanner.scan_lines(lines);
        view.set_overlays(&self.decoration, &scan.overlays);

        tracing::debug!(
            lines = scan.stats.lines_scanned,
            tokens = scan.stats.tokens_found,
            animated = scan.stats.animated_found,
            elapsed_us = scan.stats.elapsed_us,
            "overlays replaced"
        );
        self.last_scan = Some(scan.stats);
    }
}

impl<H: EditorHost> Observer<DocumentChangeEvent> for Annotator<H> {
    fn notify(&mut self, _event: &DocumentChangeEvent) {
        self.on_change("document changed");
    }
}

impl<H: EditorHost> Observer<ViewFocusEvent> for Annotator<H> {
    fn notify(&mut self, _event: &ViewFocusEvent) {
        self.on_change("active view changed");
    }
}

// =============================================================================
// Disposal handle
// =============================================================================

/// Registers a shared annotator with an `ExtensionContext`
pub struct AnnotatorResource<H: EditorHost> {
    annotator: Rc<RefCell<Annotator<H>>>,
}

impl<H: EditorHost> AnnotatorResource<H> {
    pub fn new(annotator: Rc<RefCell<Annotator<H>>>) -> Self {
        Self { annotator }
    }
}

impl<H: EditorHost> Disposable for AnnotatorResource<H> {
    /// Dispose the shared annotator.
    ///
    /// If the annotator is borrowed (dispose called from inside one of its own
    /// handlers) nothing happens: it stays Attached with live subscriptions,
    /// and a later `dispose` completes the teardown.
    fn dispose(&mut self) {
        match self.annotator.try_borrow_mut() {
            Ok(mut annotator) => annotator.dispose(),
            Err(_) => tracing::warn!("annotator busy during dispose"),
        }
    }
}

#[cfg(test)]
mod tests;

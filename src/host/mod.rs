//! Host integration surface.
//!
//! The editor owns views, event delivery and decoration rendering. The
//! annotator only reaches it through these traits:
//! - `EditorHost` - active view lookup, decoration type creation, event subscription
//! - `TextView` - line access and overlay replacement on one view
//! - `Observer<E>` - synchronous event delivery
//! - `Disposable` / `ExtensionContext` - teardown bookkeeping
//!
//! Two hosts ship with the crate: `memory` (native, in-process) and `js`
//! (wasm-bindgen adapter for a JavaScript editor).

pub mod options;
pub mod memory;
pub mod js;

pub use options::*;
pub use memory::*;
pub use js::*;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::config::OverlayStyle;
use crate::scanner::OverlayAnnotation;

// =============================================================================
// Events
// =============================================================================

/// Text of some document changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChangeEvent {
    /// Host identifier of the edited document, if known
    pub document: Option<String>,
}

/// Focus moved to another view, or away from all views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFocusEvent {
    /// Host identifier of the newly focused view, if any
    pub view: Option<String>,
}

/// Receives events of one kind, synchronously, on the host's thread
pub trait Observer<E> {
    fn notify(&mut self, event: &E);
}

/// Shared observer as stored by a host. Hosts never own their observers.
pub type ObserverRef<E> = Weak<RefCell<dyn Observer<E>>>;

/// Hand one event to one observer.
///
/// An observer that is already borrowed is inside its own handler (the host
/// re-entered while it was writing overlays); the event is dropped since the
/// running handler is working on current content.
pub(crate) fn deliver<E>(observer: &Rc<RefCell<dyn Observer<E>>>, event: &E) {
    match observer.try_borrow_mut() {
        Ok(mut observer) => observer.notify(event),
        Err(_) => tracing::debug!("observer busy, re-entrant event dropped"),
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// A resource released by the host on teardown
pub trait Disposable {
    fn dispose(&mut self);
}

/// Collects resources that live as long as the extension
pub trait ExtensionContext {
    fn register(&mut self, resource: Box<dyn Disposable>);
}

// =============================================================================
// Views
// =============================================================================

/// Non-owning handle to one editor view.
///
/// Implementations must tolerate the underlying view going away: reads then
/// return empty results, writes are ignored, and `is_disposed` reports true.
pub trait TextView: Clone {
    /// Decoration type handle created by the host
    type Decoration;

    fn line_count(&self) -> usize;

    fn line(&self, index: usize) -> Option<String>;

    /// Replace every overlay of `decoration` on this view
    fn set_overlays(&self, decoration: &Self::Decoration, overlays: &[OverlayAnnotation]);

    fn is_disposed(&self) -> bool;
}

/// The editor as seen by the annotator
pub trait EditorHost {
    type View: TextView;

    /// Currently focused view, if any
    fn active_view(&self) -> Option<Self::View>;

    fn create_decoration(&self, style: &OverlayStyle) -> <Self::View as TextView>::Decoration;

    fn on_document_changed(&self, observer: ObserverRef<DocumentChangeEvent>) -> Box<dyn Disposable>;

    fn on_view_focus_changed(&self, observer: ObserverRef<ViewFocusEvent>) -> Box<dyn Disposable>;
}

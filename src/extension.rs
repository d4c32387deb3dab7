//! Extension lifecycle for native hosts.
//!
//! The WASM entry points with the same names live in `host::js`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::annotator::{Annotator, AnnotatorResource};
use crate::config::OverlayStyle;
use crate::host::{EditorHost, ExtensionContext};

/// Attach one annotator to `host` and hand its teardown to `context`.
///
/// The returned handle is for inspection; the context keeps the annotator
/// alive on its own.
pub fn activate<H, C>(context: &mut C, host: H) -> Rc<RefCell<Annotator<H>>>
where
    H: EditorHost + 'static,
    C: ExtensionContext + ?Sized,
{
    let style = OverlayStyle::default();
    let annotator = Annotator::attach(host, &style);
    context.register(Box::new(AnnotatorResource::new(annotator.clone())));

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "emote inlay active");
    annotator
}

/// Nothing to do: the context already disposes the annotator.
pub fn deactivate() {
    tracing::info!("emote inlay deactivated");
}

//! JsEditorAdapter: wasm-bindgen bridge to a JavaScript editor host
//!
//! The extension glue passes an adapter object and its extension context to
//! `activate`. The adapter is a thin shim over the editor API:
//!
//! ```javascript,ignore
//! import init, { activate as activateInlay } from 'emote-inlay';
//!
//! export async function activate(context) {
//!   await init();
//!   activateInlay(context, {
//!     activeTextEditor: () => adaptEditor(vscode.window.activeTextEditor),
//!     createDecorationType: (options) => vscode.window.createTextEditorDecorationType(options),
//!     onDidChangeTextDocument: (listener) =>
//!       vscode.workspace.onDidChangeTextDocument((e) => listener(e.document.uri.toString())),
//!     onDidChangeActiveTextEditor: (listener) =>
//!       vscode.window.onDidChangeActiveTextEditor((e) => listener(e?.document.uri.toString())),
//!   }, { logLevel: 'info' });
//! }
//! ```
//!
//! where `adaptEditor` exposes `lineCount`, `lineAt(i)` returning the line
//! text, `setDecorations(type, options)` converting plain ranges to host
//! ranges, and `isDisposed`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::annotator::Annotator;
use crate::config::{InlayConfig, OverlayStyle};
use crate::error::InlayError;
use crate::host::{
    deliver, host_decorations, Disposable, DocumentChangeEvent, EditorHost, HostDecorationTypeOptions,
    ObserverRef, TextView, ViewFocusEvent,
};
use crate::scanner::OverlayAnnotation;

// =============================================================================
// Imported host types
// =============================================================================

#[wasm_bindgen]
extern "C" {
    /// Editor adapter object supplied by the extension glue
    #[derive(Debug, Clone)]
    pub type JsEditorAdapter;

    #[wasm_bindgen(method, js_name = activeTextEditor)]
    fn js_active_text_editor(this: &JsEditorAdapter) -> Option<JsTextEditor>;

    #[wasm_bindgen(method, js_name = createDecorationType)]
    fn js_create_decoration_type(this: &JsEditorAdapter, options: JsValue) -> JsValue;

    #[wasm_bindgen(method, js_name = onDidChangeTextDocument)]
    fn js_on_did_change_text_document(
        this: &JsEditorAdapter,
        listener: &Closure<dyn FnMut(JsValue)>,
    ) -> JsDisposable;

    #[wasm_bindgen(method, js_name = onDidChangeActiveTextEditor)]
    fn js_on_did_change_active_text_editor(
        this: &JsEditorAdapter,
        listener: &Closure<dyn FnMut(JsValue)>,
    ) -> JsDisposable;

    /// One editor view
    #[derive(Debug, Clone)]
    pub type JsTextEditor;

    #[wasm_bindgen(method, getter, js_name = lineCount)]
    fn js_line_count(this: &JsTextEditor) -> u32;

    #[wasm_bindgen(method, js_name = lineAt)]
    fn js_line_at(this: &JsTextEditor, line: u32) -> Option<String>;

    #[wasm_bindgen(method, js_name = setDecorations)]
    fn js_set_decorations(this: &JsTextEditor, decoration_type: &JsValue, options: JsValue);

    #[wasm_bindgen(method, getter, js_name = isDisposed)]
    fn js_is_disposed(this: &JsTextEditor) -> Option<bool>;

    /// `{ dispose() }` returned by event registration
    #[derive(Debug, Clone)]
    pub type JsDisposable;

    #[wasm_bindgen(method, js_name = dispose)]
    fn js_dispose(this: &JsDisposable);

    /// Host extension context
    #[derive(Debug, Clone)]
    pub type JsExtensionContext;

    #[wasm_bindgen(method, getter)]
    fn subscriptions(this: &JsExtensionContext) -> js_sys::Array;
}

// =============================================================================
// Host trait impls
// =============================================================================

impl TextView for JsTextEditor {
    type Decoration = JsValue;

    fn line_count(&self) -> usize {
        self.js_line_count() as usize
    }

    fn line(&self, index: usize) -> Option<String> {
        self.js_line_at(index as u32)
    }

    fn set_overlays(&self, decoration: &JsValue, overlays: &[OverlayAnnotation]) {
        match serde_wasm_bindgen::to_value(&host_decorations(overlays)) {
            Ok(options) => self.js_set_decorations(decoration, options),
            Err(e) => {
                let err = InlayError::Serialization {
                    what: "decoration options",
                    message: e.to_string(),
                };
                tracing::error!(error = %err, "overlays not written");
            }
        }
    }

    fn is_disposed(&self) -> bool {
        self.js_is_disposed().unwrap_or(false)
    }
}

impl EditorHost for JsEditorAdapter {
    type View = JsTextEditor;

    fn active_view(&self) -> Option<JsTextEditor> {
        self.js_active_text_editor()
    }

    fn create_decoration(&self, style: &OverlayStyle) -> JsValue {
        match serde_wasm_bindgen::to_value(&HostDecorationTypeOptions::from(style)) {
            Ok(options) => self.js_create_decoration_type(options),
            Err(e) => {
                let err = InlayError::Serialization {
                    what: "decoration type",
                    message: e.to_string(),
                };
                tracing::error!(error = %err, "falling back to default decoration type");
                self.js_create_decoration_type(js_sys::Object::new().into())
            }
        }
    }

    fn on_document_changed(&self, observer: ObserverRef<DocumentChangeEvent>) -> Box<dyn Disposable> {
        let listener = listen(observer, |payload| DocumentChangeEvent {
            document: payload.as_string(),
        });
        let disposable = self.js_on_did_change_text_document(&listener);
        Box::new(JsSubscription::new(disposable, listener))
    }

    fn on_view_focus_changed(&self, observer: ObserverRef<ViewFocusEvent>) -> Box<dyn Disposable> {
        let listener = listen(observer, |payload| ViewFocusEvent {
            view: payload.as_string(),
        });
        let disposable = self.js_on_did_change_active_text_editor(&listener);
        Box::new(JsSubscription::new(disposable, listener))
    }
}

/// Wrap an observer in a JS callback. The callback holds only a weak
/// reference, so it never keeps the annotator alive.
fn listen<E: 'static>(
    observer: ObserverRef<E>,
    to_event: fn(&JsValue) -> E,
) -> Closure<dyn FnMut(JsValue)> {
    Closure::wrap(Box::new(move |payload: JsValue| {
        if let Some(observer) = observer.upgrade() {
            deliver(&observer, &to_event(&payload));
        }
    }) as Box<dyn FnMut(JsValue)>)
}

/// Host registration plus the Rust closure it calls into
struct JsSubscription {
    disposable: Option<JsDisposable>,
    _listener: Closure<dyn FnMut(JsValue)>,
}

impl JsSubscription {
    fn new(disposable: JsDisposable, listener: Closure<dyn FnMut(JsValue)>) -> Self {
        Self {
            disposable: Some(disposable),
            _listener: listener,
        }
    }
}

impl Disposable for JsSubscription {
    fn dispose(&mut self) {
        if let Some(disposable) = self.disposable.take() {
            disposable.js_dispose();
        }
    }
}

// =============================================================================
// WASM entry points
// =============================================================================

/// Active annotator, pushed onto `context.subscriptions`
#[wasm_bindgen]
pub struct EmoteInlay {
    annotator: Rc<RefCell<Annotator<JsEditorAdapter>>>,
}

#[wasm_bindgen]
impl EmoteInlay {
    /// Clear overlays and release host subscriptions. Idempotent.
    ///
    /// Called while the annotator is handling an event, this only logs a
    /// warning; the annotator stays attached until the next `dispose`.
    #[wasm_bindgen(js_name = dispose)]
    pub fn dispose(&self) {
        match self.annotator.try_borrow_mut() {
            Ok(mut annotator) => annotator.dispose(),
            Err(_) => tracing::warn!("annotator busy during dispose"),
        }
    }

    #[wasm_bindgen(js_name = isDisposed)]
    pub fn is_disposed(&self) -> bool {
        self.annotator.borrow().is_disposed()
    }

    /// Stats of the last scan, or null
    #[wasm_bindgen(js_name = lastScan)]
    pub fn last_scan(&self) -> JsValue {
        let annotator = self.annotator.borrow();
        annotator
            .last_scan()
            .and_then(|stats| serde_wasm_bindgen::to_value(stats).ok())
            .unwrap_or(JsValue::NULL)
    }
}

fn parse_config(config: JsValue) -> Result<InlayConfig, InlayError> {
    if config.is_undefined() || config.is_null() {
        return Ok(InlayConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| InlayError::Config(e.to_string()))
}

/// Start annotating. `config` may be omitted.
#[wasm_bindgen(js_name = activate)]
pub fn js_activate(
    context: &JsExtensionContext,
    adapter: JsEditorAdapter,
    config: JsValue,
) -> Result<(), JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let config = parse_config(config)?;
    if let Err(InlayError::LoggingAlreadySet) = crate::logging::init(&config.log_level) {
        tracing::debug!("reusing installed subscriber");
    }

    let style = OverlayStyle::default();
    let annotator = Annotator::attach(adapter, &style);
    context.subscriptions().push(&JsValue::from(EmoteInlay { annotator }));

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "emote inlay active");
    Ok(())
}

/// Disposal is handled by the context subscription.
#[wasm_bindgen(js_name = deactivate)]
pub fn js_deactivate() {
    crate::extension::deactivate();
}

use std::rc::Rc;

use crate::annotator::tests::{focused_host, gif, urls, DANCE, WAVE};
use crate::annotator::{Annotator, AnnotatorResource};
use crate::config::OverlayStyle;
use crate::extension::{activate, deactivate};
use crate::host::{
    Disposable, DocumentChangeEvent, ExtensionContext, MemoryContext, MemoryHost, Observer,
    ViewFocusEvent,
};

#[test]
fn test_attach_subscribes_to_both_events() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());

    assert_eq!(annotator.borrow().subscription_count(), 2);
    assert_eq!(host.observer_count(), 2);
    assert_eq!(annotator.borrow().state_name(), "attached");

    host.edit(&view, DANCE);
    assert_eq!(urls(&view.overlays()), vec![gif("76543210987654321")]);

    let other = host.open(WAVE);
    host.focus(Some(&other));
    assert_eq!(other.overlays().len(), 1);
}

#[test]
fn test_dispose_clears_overlays_and_unsubscribes() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());
    assert_eq!(view.overlays().len(), 1);

    annotator.borrow_mut().dispose();

    assert!(view.overlays().is_empty());
    assert_eq!(host.observer_count(), 0);
    assert!(annotator.borrow().is_disposed());
    assert_eq!(annotator.borrow().state_name(), "disposed");
    assert!(annotator.borrow().view().is_none());
}

#[test]
fn test_dispose_twice_is_harmless() {
    let (host, view) = focused_host(WAVE);
    let mut annotator = Annotator::new(host, &OverlayStyle::default());

    annotator.dispose();
    let writes = view.overlay_writes();
    annotator.dispose();

    assert_eq!(view.overlay_writes(), writes);
    assert!(annotator.is_disposed());
}

#[test]
fn test_events_after_dispose_are_ignored() {
    let (host, view) = focused_host(WAVE);
    let mut annotator = Annotator::new(host.clone(), &OverlayStyle::default());
    annotator.dispose();
    let writes = view.overlay_writes();

    host.edit(&view, DANCE);
    annotator.notify(&DocumentChangeEvent::default());
    annotator.notify(&ViewFocusEvent::default());

    assert_eq!(view.overlay_writes(), writes);
    assert!(view.overlays().is_empty());
}

#[test]
fn test_dispose_after_view_torn_down() {
    let (host, view) = focused_host(WAVE);
    let mut annotator = Annotator::new(host.clone(), &OverlayStyle::default());

    // No subscription, so the annotator still holds the closed view
    host.close(&view);
    assert!(annotator.view().is_some());

    annotator.dispose();

    assert!(annotator.is_disposed());
    assert_eq!(view.overlay_writes(), 0);
}

#[test]
fn test_stale_view_is_not_scanned() {
    let (host, view) = focused_host(WAVE);
    let mut annotator = Annotator::new(host.clone(), &OverlayStyle::default());
    let stats = annotator.last_scan().cloned();

    host.close(&view);
    host.focus(Some(&view));
    annotator.notify(&ViewFocusEvent::default());

    assert!(annotator.view().is_none());
    assert_eq!(annotator.last_scan().cloned(), stats);
}

#[test]
fn test_closing_active_view_while_attached() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());

    host.close(&view);
    assert!(annotator.borrow().view().is_none());

    annotator.borrow_mut().dispose();
    assert!(annotator.borrow().is_disposed());
}

#[test]
fn test_focus_away_then_dispose_keeps_old_overlays() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());

    host.focus(None);
    annotator.borrow_mut().dispose();

    // The view was no longer tracked, so dispose had nothing to clear
    assert_eq!(view.overlays().len(), 1);
}

#[test]
fn test_dropping_annotator_stops_delivery() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());
    let weak = Rc::downgrade(&annotator);
    drop(annotator);

    assert!(weak.upgrade().is_none());
    host.edit(&view, DANCE);
    assert_eq!(view.overlay_writes(), 1);
}

#[test]
fn test_resource_disposes_shared_annotator() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host, &OverlayStyle::default());
    let mut resource = AnnotatorResource::new(annotator.clone());

    resource.dispose();
    resource.dispose();

    assert!(annotator.borrow().is_disposed());
    assert!(view.overlays().is_empty());
}

#[test]
fn test_resource_dispose_while_busy_is_deferred() {
    let (host, view) = focused_host(WAVE);
    let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());
    let mut resource = AnnotatorResource::new(annotator.clone());

    {
        let _busy = annotator.borrow_mut();
        resource.dispose();
    }

    assert!(!annotator.borrow().is_disposed());
    assert_eq!(host.observer_count(), 2);
    assert_eq!(view.overlays().len(), 1);

    resource.dispose();

    assert!(annotator.borrow().is_disposed());
    assert_eq!(host.observer_count(), 0);
    assert!(view.overlays().is_empty());
}

#[test]
fn test_activate_registers_with_context() {
    let host = MemoryHost::new();
    let view = host.open(WAVE);
    let mut context = MemoryContext::default();

    let annotator = activate(&mut context, host.clone());
    assert_eq!(context.len(), 1);
    assert!(view.overlays().is_empty());

    host.focus(Some(&view));
    assert_eq!(view.overlays().len(), 1);

    context.dispose_all();
    deactivate();

    assert!(annotator.borrow().is_disposed());
    assert!(view.overlays().is_empty());
    assert_eq!(host.observer_count(), 0);
}

#[test]
fn test_context_trait_object() {
    let (host, _view) = focused_host(WAVE);
    let mut context = MemoryContext::default();
    {
        let context: &mut dyn ExtensionContext = &mut context;
        let annotator = Annotator::attach(host.clone(), &OverlayStyle::default());
        context.register(Box::new(AnnotatorResource::new(annotator)));
    }

    // The context keeps the annotator alive and subscribed
    assert_eq!(host.observer_count(), 2);
    context.dispose_all();
    assert_eq!(host.observer_count(), 0);
}

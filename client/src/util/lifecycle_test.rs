use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::host::memory::{MemoryDocument, MemoryNode};

fn counter() -> (Rc<Cell<u32>>, Handler) {
    let hits = Rc::new(Cell::new(0));
    let inner = Rc::clone(&hits);
    (hits, Rc::new(move || inner.set(inner.get() + 1)))
}

#[test]
fn auto_init_runs_immediately_when_ready() {
    let doc = MemoryDocument::new();
    let (hits, init) = counter();
    let _sub = auto_init(&*doc, NavigationTrigger::AfterSwap, init);
    assert_eq!(hits.get(), 1);
    doc.dispatch(AFTER_SWAP);
    doc.dispatch(PAGE_LOAD);
    assert_eq!(hits.get(), 2);
}

#[test]
fn auto_init_waits_for_dom_content_loaded() {
    let doc = MemoryDocument::new();
    doc.set_loading(true);
    let (hits, init) = counter();
    let _sub = auto_init(&*doc, NavigationTrigger::PageLoad, init);
    assert_eq!(hits.get(), 0);
    doc.dispatch(DOM_CONTENT_LOADED);
    doc.dispatch(DOM_CONTENT_LOADED);
    assert_eq!(hits.get(), 1);
    doc.dispatch(PAGE_LOAD);
    assert_eq!(hits.get(), 2);
}

#[test]
fn auto_init_handle_detaches_navigation_listener() {
    let doc = MemoryDocument::new();
    let (hits, init) = counter();
    auto_init(&*doc, NavigationTrigger::AfterSwap, init).unsubscribe();
    doc.dispatch(AFTER_SWAP);
    assert_eq!(hits.get(), 1);
}

#[test]
fn navigation_scoped_listener_detaches_before_swap() {
    let doc = MemoryDocument::new();
    let button = doc.body().append(MemoryNode::new("button"));
    let (hits, handler) = counter();
    navigation_scoped(&*doc, &*button, "click", handler);
    button.click();
    doc.dispatch(BEFORE_SWAP);
    button.click();
    assert_eq!(hits.get(), 1);
    assert_eq!(button.listener_count("click"), 0);
}

#[test]
fn once_runs_a_single_time() {
    let guard = Once::new();
    let hits = Cell::new(0);
    assert!(guard.call(|| hits.set(hits.get() + 1)));
    assert!(!guard.call(|| hits.set(hits.get() + 1)));
    assert_eq!(hits.get(), 1);
    assert!(guard.is_done());
}

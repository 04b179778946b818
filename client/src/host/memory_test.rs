use super::*;

fn fixture() -> Rc<MemoryDocument> {
    let doc = MemoryDocument::new();
    let body = doc.body();
    let section = body.append(MemoryNode::new("section").with_attr("id", "remark42"));
    section.append(MemoryNode::new("iframe"));
    section.append(MemoryNode::new("button").with_attr("data-like-button", "").with_attr("data-slug", "a"));
    body.append(MemoryNode::new("button").with_attr("data-like-button", "").with_attr("data-slug", "b"));
    doc
}

#[test]
fn selector_parse_covers_supported_forms() {
    assert_eq!(Selector::parse("#remark42").id.as_deref(), Some("remark42"));
    assert_eq!(Selector::parse("iframe").tag.as_deref(), Some("iframe"));
    let parsed = Selector::parse("script[data-cusdis]");
    assert_eq!(parsed.tag.as_deref(), Some("script"));
    assert_eq!(parsed.attribute, Some(("data-cusdis".to_owned(), None)));
    let parsed = Selector::parse(r#"[data-slug="b"]"#);
    assert_eq!(parsed.attribute, Some(("data-slug".to_owned(), Some("b".to_owned()))));
}

#[test]
fn query_all_returns_document_order() {
    let doc = fixture();
    let slugs: Vec<_> = doc
        .query_all("[data-like-button]")
        .iter()
        .filter_map(|el| el.attribute("data-slug"))
        .collect();
    assert_eq!(slugs, vec!["a", "b"]);
    assert_eq!(doc.query(r#"[data-slug="b"]"#).and_then(|el| el.attribute("data-slug")).as_deref(), Some("b"));
}

#[test]
fn remove_detaches_from_parent() {
    let doc = fixture();
    let section = doc.by_id("remark42").unwrap();
    for frame in section.query_all("iframe") {
        frame.remove();
    }
    assert!(section.query_all("iframe").is_empty());
    assert_eq!(section.query_all("button").len(), 1);
}

#[test]
fn unsubscribe_stops_delivery() {
    let node = MemoryNode::new("button");
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let sub = node.listen("click", Rc::new(move || counter.set(counter.get() + 1)));
    node.click();
    sub.unsubscribe();
    node.click();
    assert_eq!(hits.get(), 1);
    assert_eq!(node.listener_count("click"), 0);
}

#[test]
fn dropped_subscription_keeps_listener() {
    let node = MemoryNode::new("button");
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    drop(node.listen("click", Rc::new(move || counter.set(counter.get() + 1))));
    node.click();
    assert_eq!(hits.get(), 1);
}

#[test]
fn listen_once_fires_once() {
    let doc = MemoryDocument::new();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    doc.listen_once("DOMContentLoaded", Box::new(move || counter.set(counter.get() + 1)));
    doc.dispatch("DOMContentLoaded");
    doc.dispatch("DOMContentLoaded");
    assert_eq!(hits.get(), 1);
    assert_eq!(doc.listener_count("DOMContentLoaded"), 0);
}

#[test]
fn globals_report_absent_methods_without_recording() {
    let globals = MemoryGlobals::new();
    assert_eq!(globals.call("CUSDIS", "initial", &[]), Ok(false));
    globals.define("CUSDIS", &["initial"]);
    assert_eq!(globals.call("CUSDIS", "initial", &[]), Ok(true));
    assert_eq!(globals.calls().len(), 1);
}

#[test]
fn failing_storage_surfaces_errors() {
    let storage = MemoryStorage::new();
    storage.set_failing(true, true);
    assert!(storage.get_item("k").is_err());
    assert!(storage.set_item("k", "v").is_err());
}

#[test]
fn manual_timers_run_nested_callbacks() {
    let timers = ManualTimers::new();
    let hits = Rc::new(Cell::new(0));
    let inner_timers = Rc::clone(&timers);
    let counter = Rc::clone(&hits);
    timers.set_timeout(
        10,
        Box::new(move || {
            counter.set(counter.get() + 1);
            let counter = Rc::clone(&counter);
            inner_timers.set_timeout(20, Box::new(move || counter.set(counter.get() + 1)));
        }),
    );
    assert_eq!(timers.pending_delays(), vec![10]);
    timers.run_all();
    assert_eq!(hits.get(), 2);
}

//! In-memory host used by native builds and tests.
//!
//! DESIGN
//! ======
//! A tiny element tree with attributes, text, and listener registries, plus
//! recording fakes for storage, the color-scheme query, window globals, and
//! timers. Selector support covers what the client queries: `tag`, `#id`,
//! `[attr]`, `[attr="value"]`, and `tag[attr]`.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use serde_json::Value;

use super::{AudioOutput, ColorScheme, Document, Element, ElementRef, Env, Globals, Handler, HostError, Storage, Subscription, Timers};

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

struct Registry<F: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, String, Rc<F>)>>,
}

impl<F: ?Sized + 'static> Registry<F> {
    fn new() -> Rc<Self> {
        Rc::new(Self { next_id: Cell::new(0), entries: RefCell::new(Vec::new()) })
    }

    fn insert(&self, event: &str, handler: Rc<F>) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, event.to_owned(), handler));
        id
    }

    fn add(self: &Rc<Self>, event: &str, handler: Rc<F>) -> Subscription {
        let id = self.insert(event, handler);
        let registry = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry, ..)| *entry != id);
    }

    fn snapshot(&self, event: &str) -> Vec<(u64, Rc<F>)> {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(id, _, handler)| (*id, Rc::clone(handler)))
            .collect()
    }

    fn is_live(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry, ..)| *entry == id)
    }

    fn count(&self, event: &str) -> usize {
        self.entries.borrow().iter().filter(|(_, name, _)| name == event).count()
    }
}

impl Registry<dyn Fn()> {
    fn add_once(self: &Rc<Self>, event: &str, handler: Box<dyn FnOnce()>) {
        let slot = RefCell::new(Some(handler));
        let id_cell = Rc::new(Cell::new(0));
        let registry = Rc::downgrade(self);
        let own_id = Rc::clone(&id_cell);
        let id = self.insert(
            event,
            Rc::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(own_id.get());
                }
                if let Some(handler) = slot.borrow_mut().take() {
                    handler();
                }
            }),
        );
        id_cell.set(id);
    }

    /// Deliver `event` to every handler registered when dispatch began that
    /// is still registered when its turn comes.
    fn dispatch(&self, event: &str) {
        for (id, handler) in self.snapshot(event) {
            if self.is_live(id) {
                handler();
            }
        }
    }
}

// =============================================================================
// SELECTORS
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    attribute: Option<(String, Option<String>)>,
}

impl Selector {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(id) = raw.strip_prefix('#') {
            return Self { tag: None, id: Some(id.to_owned()), attribute: None };
        }
        let (tag, attribute) = match raw.split_once('[') {
            Some((tag, rest)) => {
                let inner = rest.trim_end_matches(']');
                let attribute = match inner.split_once('=') {
                    Some((name, value)) => (name.to_owned(), Some(value.trim_matches('"').trim_matches('\'').to_owned())),
                    None => (inner.to_owned(), None),
                };
                (tag, Some(attribute))
            }
            None => (raw, None),
        };
        let tag = (!tag.is_empty()).then(|| tag.to_ascii_lowercase());
        Self { tag, id: None, attribute }
    }

    fn matches(&self, node: &MemoryNode) -> bool {
        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        match &self.attribute {
            Some((name, None)) => node.has_attribute(name),
            Some((name, Some(value))) => node.attribute(name).as_deref() == Some(value.as_str()),
            None => true,
        }
    }
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// Element node in the in-memory tree.
pub struct MemoryNode {
    tag: String,
    attributes: RefCell<BTreeMap<String, String>>,
    styles: RefCell<BTreeMap<String, String>>,
    text: RefCell<String>,
    children: RefCell<Vec<Rc<MemoryNode>>>,
    parent: RefCell<std::rc::Weak<MemoryNode>>,
    listeners: Rc<Registry<dyn Fn()>>,
    audio: Option<Rc<MemoryAudio>>,
}

impl MemoryNode {
    pub fn new(tag: &str) -> Rc<Self> {
        let tag = tag.to_ascii_lowercase();
        let audio = (tag == "audio").then(MemoryAudio::new);
        Rc::new(Self {
            tag,
            attributes: RefCell::new(BTreeMap::new()),
            styles: RefCell::new(BTreeMap::new()),
            text: RefCell::new(String::new()),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(std::rc::Weak::new()),
            listeners: Registry::new(),
            audio,
        })
    }

    /// Builder-style attribute setter for test fixtures.
    pub fn with_attr(self: Rc<Self>, name: &str, value: &str) -> Rc<Self> {
        self.attributes.borrow_mut().insert(name.to_owned(), value.to_owned());
        self
    }

    /// Append `child` and return it.
    pub fn append(self: &Rc<Self>, child: Rc<MemoryNode>) -> Rc<MemoryNode> {
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().push(Rc::clone(&child));
        child
    }

    pub fn children(&self) -> Vec<Rc<MemoryNode>> {
        self.children.borrow().clone()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    /// Fire `event` at this element's listeners.
    pub fn dispatch(&self, event: &str) {
        self.listeners.dispatch(event);
    }

    pub fn click(&self) {
        self.dispatch("click");
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }

    pub fn memory_audio(&self) -> Option<Rc<MemoryAudio>> {
        self.audio.clone()
    }

    fn collect(&self, selector: &Selector, out: &mut Vec<ElementRef>) {
        for child in self.children.borrow().iter() {
            if selector.matches(child) {
                out.push(Rc::clone(child) as ElementRef);
            }
            child.collect(selector, out);
        }
    }

    fn find_by_id(self: &Rc<Self>, id: &str) -> Option<Rc<MemoryNode>> {
        if self.attribute("id").as_deref() == Some(id) {
            return Some(Rc::clone(self));
        }
        self.children.borrow().iter().find_map(|child| child.find_by_id(id))
    }
}

impl Element for MemoryNode {
    fn tag(&self) -> String {
        self.tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes.borrow_mut().insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        self.children.borrow_mut().clear();
        text.clone_into(&mut self.text.borrow_mut());
    }

    fn value(&self) -> Option<String> {
        self.attribute("value")
    }

    fn set_value(&self, value: &str) {
        self.set_attribute("value", value);
    }

    fn set_style(&self, property: &str, value: &str) {
        self.styles.borrow_mut().insert(property.to_owned(), value.to_owned());
    }

    fn clear_children(&self) {
        self.children.borrow_mut().clear();
        self.text.borrow_mut().clear();
    }

    fn remove(&self) {
        let parent = self.parent.borrow().upgrade();
        if let Some(parent) = parent {
            parent.children.borrow_mut().retain(|child| !std::ptr::eq(Rc::as_ptr(child), self));
        }
        *self.parent.borrow_mut() = std::rc::Weak::new();
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        let selector = Selector::parse(selector);
        let mut out = Vec::new();
        self.collect(&selector, &mut out);
        out
    }

    fn listen(&self, event: &str, handler: Handler) -> Subscription {
        self.listeners.add(event, handler)
    }

    fn listen_once(&self, event: &str, handler: Box<dyn FnOnce()>) {
        self.listeners.add_once(event, handler);
    }

    fn audio(&self) -> Option<Rc<dyn AudioOutput>> {
        self.audio.clone().map(|audio| audio as Rc<dyn AudioOutput>)
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

pub struct MemoryDocument {
    root: Rc<MemoryNode>,
    head: Rc<MemoryNode>,
    body: Rc<MemoryNode>,
    title: RefCell<String>,
    loading: Cell<bool>,
    listeners: Rc<Registry<dyn Fn()>>,
    key_listeners: Rc<Registry<dyn Fn(&str)>>,
}

impl MemoryDocument {
    pub fn new() -> Rc<Self> {
        let root = MemoryNode::new("html");
        let head = root.append(MemoryNode::new("head"));
        let body = root.append(MemoryNode::new("body"));
        Rc::new(Self {
            root,
            head,
            body,
            title: RefCell::new(String::new()),
            loading: Cell::new(false),
            listeners: Registry::new(),
            key_listeners: Registry::new(),
        })
    }

    pub fn root_node(&self) -> Rc<MemoryNode> {
        Rc::clone(&self.root)
    }

    pub fn head(&self) -> Rc<MemoryNode> {
        Rc::clone(&self.head)
    }

    pub fn body(&self) -> Rc<MemoryNode> {
        Rc::clone(&self.body)
    }

    pub fn set_title(&self, title: &str) {
        title.clone_into(&mut self.title.borrow_mut());
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    /// Fire a document-level event such as `astro:after-swap`.
    pub fn dispatch(&self, event: &str) {
        self.listeners.dispatch(event);
    }

    pub fn press_key(&self, key: &str) {
        for (id, handler) in self.key_listeners.snapshot("keydown") {
            if self.key_listeners.is_live(id) {
                handler(key);
            }
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }

    /// Replace the page body, as an in-place navigation does.
    pub fn swap_body(&self) -> Rc<MemoryNode> {
        self.body.clear_children();
        Rc::clone(&self.body)
    }

    /// First element matching `selector` as a concrete node.
    pub fn node(&self, selector: &str) -> Option<Rc<MemoryNode>> {
        let selector = Selector::parse(selector);
        find_node(&self.root, &selector)
    }

    pub fn nodes(&self, selector: &str) -> Vec<Rc<MemoryNode>> {
        let selector = Selector::parse(selector);
        let mut out = Vec::new();
        collect_nodes(&self.root, &selector, &mut out);
        out
    }
}

fn find_node(node: &Rc<MemoryNode>, selector: &Selector) -> Option<Rc<MemoryNode>> {
    node.children().into_iter().find_map(|child| {
        if selector.matches(&child) { Some(child) } else { find_node(&child, selector) }
    })
}

fn collect_nodes(node: &Rc<MemoryNode>, selector: &Selector, out: &mut Vec<Rc<MemoryNode>>) {
    for child in node.children() {
        if selector.matches(&child) {
            out.push(Rc::clone(&child));
        }
        collect_nodes(&child, selector, out);
    }
}

impl Document for MemoryDocument {
    fn root(&self) -> ElementRef {
        Rc::clone(&self.root) as ElementRef
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        let parsed = Selector::parse(selector);
        let mut out = Vec::new();
        if parsed.matches(&self.root) {
            out.push(Rc::clone(&self.root) as ElementRef);
        }
        out.extend(self.root.query_all(selector));
        out
    }

    fn by_id(&self, id: &str) -> Option<ElementRef> {
        self.root.find_by_id(id).map(|node| node as ElementRef)
    }

    fn append_script(&self, src: &str, marker: &str, value: &str) -> Result<ElementRef, HostError> {
        let script = MemoryNode::new("script").with_attr("src", src).with_attr("async", "").with_attr(marker, value);
        Ok(self.head.append(script) as ElementRef)
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn is_loading(&self) -> bool {
        self.loading.get()
    }

    fn listen(&self, event: &str, handler: Handler) -> Subscription {
        self.listeners.add(event, handler)
    }

    fn listen_once(&self, event: &str, handler: Box<dyn FnOnce()>) {
        self.listeners.add_once(event, handler);
    }

    fn on_keydown(&self, handler: Rc<dyn Fn(&str)>) -> Subscription {
        self.key_listeners.add("keydown", handler)
    }
}

// =============================================================================
// AUDIO
// =============================================================================

pub struct MemoryAudio {
    source: RefCell<Option<String>>,
    playing: Cell<bool>,
    volume: Cell<f64>,
    reject_play: Cell<bool>,
    loads: Cell<u32>,
    listeners: Rc<Registry<dyn Fn()>>,
}

impl MemoryAudio {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            source: RefCell::new(None),
            playing: Cell::new(false),
            volume: Cell::new(1.0),
            reject_play: Cell::new(false),
            loads: Cell::new(0),
            listeners: Registry::new(),
        })
    }

    pub fn source(&self) -> Option<String> {
        self.source.borrow().clone()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn volume(&self) -> f64 {
        self.volume.get()
    }

    /// Make the next `play()` calls fail as a blocked autoplay would.
    pub fn reject_play(&self, reject: bool) {
        self.reject_play.set(reject);
    }

    pub fn loads(&self) -> u32 {
        self.loads.get()
    }

    pub fn dispatch(&self, event: &str) {
        self.listeners.dispatch(event);
    }
}

impl AudioOutput for MemoryAudio {
    fn set_source(&self, url: &str) {
        *self.source.borrow_mut() = Some(url.to_owned());
        self.loads.set(self.loads.get() + 1);
    }

    fn clear_source(&self) {
        *self.source.borrow_mut() = None;
        self.playing.set(false);
        self.loads.set(self.loads.get() + 1);
    }

    fn has_source(&self) -> bool {
        self.source.borrow().is_some()
    }

    fn play(&self, on_rejected: Box<dyn FnOnce()>) {
        if self.reject_play.get() {
            on_rejected();
        } else {
            self.playing.set(true);
        }
    }

    fn pause(&self) {
        self.playing.set(false);
    }

    fn set_volume(&self, volume: f64) {
        self.volume.set(volume);
    }

    fn listen(&self, event: &str, handler: Handler) -> Subscription {
        self.listeners.add(event, handler)
    }
}

// =============================================================================
// STORAGE
// =============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    /// Simulate disabled storage (private browsing, blocked cookies).
    pub fn set_failing(&self, reads: bool, writes: bool) {
        self.fail_reads.set(reads);
        self.fail_writes.set(writes);
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        if self.fail_reads.get() {
            return Err(HostError::Unavailable("localStorage"));
        }
        Ok(self.item(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError> {
        if self.fail_writes.get() {
            return Err(HostError::Call { api: "localStorage.setItem", message: "quota exceeded".into() });
        }
        self.insert(key, value);
        Ok(())
    }
}

// =============================================================================
// COLOR SCHEME
// =============================================================================

pub struct MemoryColorScheme {
    dark: Cell<Option<bool>>,
    listeners: Rc<Registry<dyn Fn(bool)>>,
}

impl MemoryColorScheme {
    pub fn new(dark: Option<bool>) -> Rc<Self> {
        Rc::new(Self { dark: Cell::new(dark), listeners: Registry::new() })
    }

    /// Change the OS scheme and notify listeners.
    pub fn set_dark(&self, dark: bool) {
        self.dark.set(Some(dark));
        for (id, handler) in self.listeners.snapshot("change") {
            if self.listeners.is_live(id) {
                handler(dark);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count("change")
    }
}

impl ColorScheme for MemoryColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.dark.get()
    }

    fn on_change(&self, handler: Rc<dyn Fn(bool)>) -> Subscription {
        self.listeners.add("change", handler)
    }
}

// =============================================================================
// GLOBALS
// =============================================================================

/// One recorded `window[object][method](args)` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalCall {
    pub object: String,
    pub method: String,
    pub args: Vec<Value>,
}

#[derive(Default)]
pub struct MemoryGlobals {
    objects: RefCell<HashMap<String, HashSet<String>>>,
    throwing: RefCell<HashSet<(String, String)>>,
    calls: RefCell<Vec<GlobalCall>>,
    slots: RefCell<HashMap<String, Value>>,
}

impl MemoryGlobals {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Install `window[object]` exposing `methods`.
    pub fn define(&self, object: &str, methods: &[&str]) {
        let mut objects = self.objects.borrow_mut();
        let entry = objects.entry(object.to_owned()).or_default();
        entry.extend(methods.iter().map(|m| (*m).to_owned()));
    }

    /// Make `object.method` throw when called.
    pub fn throw_on(&self, object: &str, method: &str) {
        self.throwing.borrow_mut().insert((object.to_owned(), method.to_owned()));
    }

    pub fn calls(&self) -> Vec<GlobalCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, object: &str, method: &str) -> Vec<Vec<Value>> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.object == object && c.method == method)
            .map(|c| c.args.clone())
            .collect()
    }

    pub fn slot(&self, slot: &str) -> Option<Value> {
        self.slots.borrow().get(slot).cloned()
    }
}

impl Globals for MemoryGlobals {
    fn call(&self, object: &str, method: &str, args: &[Value]) -> Result<bool, HostError> {
        if !self.objects.borrow().get(object).is_some_and(|methods| methods.contains(method)) {
            return Ok(false);
        }
        self.calls.borrow_mut().push(GlobalCall { object: object.to_owned(), method: method.to_owned(), args: args.to_vec() });
        if self.throwing.borrow().contains(&(object.to_owned(), method.to_owned())) {
            return Err(HostError::Call { api: "global call", message: format!("{object}.{method} threw") });
        }
        Ok(true)
    }

    fn set_slot(&self, slot: &str, value: &Value) -> Result<(), HostError> {
        self.slots.borrow_mut().insert(slot.to_owned(), value.clone());
        Ok(())
    }
}

// =============================================================================
// TIMERS
// =============================================================================

/// Timers that only fire when the test says so.
#[derive(Default)]
pub struct ManualTimers {
    pending: RefCell<Vec<(u32, Box<dyn FnOnce()>)>>,
}

impl ManualTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending_delays(&self) -> Vec<u32> {
        self.pending.borrow().iter().map(|(ms, _)| *ms).collect()
    }

    /// Fire every pending callback, including ones scheduled while running.
    pub fn run_all(&self) {
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for (_, callback) in batch {
                callback();
            }
        }
    }
}

impl Timers for ManualTimers {
    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push((millis, callback));
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Concrete handles to every in-memory capability, for fixtures to drive.
#[derive(Clone)]
pub struct MemoryEnv {
    pub document: Rc<MemoryDocument>,
    pub storage: Rc<MemoryStorage>,
    pub color_scheme: Rc<MemoryColorScheme>,
    pub globals: Rc<MemoryGlobals>,
    pub timers: Rc<ManualTimers>,
}

impl MemoryEnv {
    /// Light OS scheme, empty storage, no globals.
    pub fn new() -> Self {
        Self {
            document: MemoryDocument::new(),
            storage: MemoryStorage::new(),
            color_scheme: MemoryColorScheme::new(Some(false)),
            globals: MemoryGlobals::new(),
            timers: ManualTimers::new(),
        }
    }

    pub fn env(&self) -> Env {
        Env {
            document: Rc::clone(&self.document) as Rc<dyn Document>,
            storage: Rc::clone(&self.storage) as Rc<dyn Storage>,
            color_scheme: Rc::clone(&self.color_scheme) as Rc<dyn ColorScheme>,
            globals: Rc::clone(&self.globals) as Rc<dyn Globals>,
            timers: Rc::clone(&self.timers) as Rc<dyn Timers>,
        }
    }
}

impl Default for MemoryEnv {
    fn default() -> Self {
        Self::new()
    }
}

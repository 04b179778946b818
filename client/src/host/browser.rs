//! `web-sys` implementations of the host capabilities.
//!
//! Listener closures are handed to the JS side with `into_js_value`, so a
//! registration outlives its Rust handle. Unsubscribing removes the listener
//! and lets the garbage collector take the function.

use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use leptos::logging::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{AudioOutput, ColorScheme, Document, Element, ElementRef, Env, Globals, Handler, HostError, Storage, Subscription, Timers};

fn call_error(api: &'static str, err: &JsValue) -> HostError {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    HostError::Call { api, message }
}

fn listen_event(target: &web_sys::EventTarget, event: &str, handler: Rc<dyn Fn(web_sys::Event)>) -> Subscription {
    let function: Function =
        Closure::<dyn Fn(web_sys::Event)>::new(move |e: web_sys::Event| handler(e)).into_js_value().unchecked_into();
    if let Err(e) = target.add_event_listener_with_callback(event, &function) {
        warn!("host: could not listen for {event}: {}", call_error("addEventListener", &e));
        return Subscription::noop();
    }
    let target = target.clone();
    let event = event.to_owned();
    Subscription::new(move || {
        let _ = target.remove_event_listener_with_callback(&event, &function);
    })
}

fn listen(target: &web_sys::EventTarget, event: &str, handler: Handler) -> Subscription {
    listen_event(target, event, Rc::new(move |_| handler()))
}

fn listen_once(target: &web_sys::EventTarget, event: &str, handler: Box<dyn FnOnce()>) {
    let function: Function = Closure::once_into_js(move || handler()).unchecked_into();
    let options = web_sys::AddEventListenerOptions::new();
    options.set_once(true);
    if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(event, &function, &options) {
        warn!("host: could not listen once for {event}: {}", call_error("addEventListener", &e));
    }
}

fn collect(list: &web_sys::NodeList) -> Vec<ElementRef> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(|el| Rc::new(BrowserElement(el)) as ElementRef)
        .collect()
}

// =============================================================================
// ELEMENTS
// =============================================================================

pub struct BrowserElement(web_sys::Element);

impl BrowserElement {
    pub fn new(element: web_sys::Element) -> Self {
        Self(element)
    }
}

impl Element for BrowserElement {
    fn tag(&self) -> String {
        self.0.tag_name().to_lowercase()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0.has_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn remove_attribute(&self, name: &str) {
        let _ = self.0.remove_attribute(name);
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn value(&self) -> Option<String> {
        self.0.dyn_ref::<web_sys::HtmlInputElement>().map(web_sys::HtmlInputElement::value)
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.0.dyn_ref::<web_sys::HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn set_style(&self, property: &str, value: &str) {
        // Through `style` so SVG elements work too.
        let style = Reflect::get(&self.0, &JsValue::from_str("style")).ok();
        if let Some(style) = style.and_then(|s| s.dyn_into::<web_sys::CssStyleDeclaration>().ok()) {
            let _ = style.set_property(property, value);
        }
    }

    fn clear_children(&self) {
        self.0.set_inner_html("");
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        self.0.query_selector_all(selector).map(|list| collect(&list)).unwrap_or_default()
    }

    fn query(&self, selector: &str) -> Option<ElementRef> {
        let found = self.0.query_selector(selector).ok().flatten()?;
        Some(Rc::new(BrowserElement(found)))
    }

    fn listen(&self, event: &str, handler: Handler) -> Subscription {
        listen(&self.0, event, handler)
    }

    fn listen_once(&self, event: &str, handler: Box<dyn FnOnce()>) {
        listen_once(&self.0, event, handler);
    }

    fn on_click(&self, handler: Handler) -> Subscription {
        listen_event(
            &self.0,
            "click",
            Rc::new(move |event: web_sys::Event| {
                event.prevent_default();
                handler();
            }),
        )
    }

    fn on_click_stopped(&self, handler: Handler) -> Subscription {
        listen_event(
            &self.0,
            "click",
            Rc::new(move |event: web_sys::Event| {
                event.prevent_default();
                event.stop_propagation();
                handler();
            }),
        )
    }

    fn audio(&self) -> Option<Rc<dyn AudioOutput>> {
        let audio = self.0.dyn_ref::<web_sys::HtmlAudioElement>()?;
        Some(Rc::new(BrowserAudio(audio.clone())))
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

pub struct BrowserDocument {
    document: web_sys::Document,
    root: web_sys::Element,
}

impl Document for BrowserDocument {
    fn root(&self) -> ElementRef {
        Rc::new(BrowserElement(self.root.clone()))
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        self.document.query_selector_all(selector).map(|list| collect(&list)).unwrap_or_default()
    }

    fn query(&self, selector: &str) -> Option<ElementRef> {
        let found = self.document.query_selector(selector).ok().flatten()?;
        Some(Rc::new(BrowserElement(found)))
    }

    fn by_id(&self, id: &str) -> Option<ElementRef> {
        let found = self.document.get_element_by_id(id)?;
        Some(Rc::new(BrowserElement(found)))
    }

    fn append_script(&self, src: &str, marker: &str, value: &str) -> Result<ElementRef, HostError> {
        let script = self
            .document
            .create_element("script")
            .map_err(|e| call_error("createElement", &e))?
            .dyn_into::<web_sys::HtmlScriptElement>()
            .map_err(|_| HostError::Unavailable("HTMLScriptElement"))?;
        script.set_src(src);
        script.set_async(true);
        script.set_attribute(marker, value).map_err(|e| call_error("setAttribute", &e))?;
        let head = self.document.head().ok_or(HostError::Unavailable("document.head"))?;
        head.append_child(&script).map_err(|e| call_error("appendChild", &e))?;
        Ok(Rc::new(BrowserElement(script.into())))
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    fn listen(&self, event: &str, handler: Handler) -> Subscription {
        listen(&self.document, event, handler)
    }

    fn listen_once(&self, event: &str, handler: Box<dyn FnOnce()>) {
        listen_once(&self.document, event, handler);
    }

    fn on_keydown(&self, handler: Rc<dyn Fn(&str)>) -> Subscription {
        listen_event(
            &self.document,
            "keydown",
            Rc::new(move |event: web_sys::Event| {
                if let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>().map(web_sys::KeyboardEvent::key) {
                    handler(&key);
                }
            }),
        )
    }
}

// =============================================================================
// STORAGE / COLOR SCHEME
// =============================================================================

pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Result<web_sys::Storage, HostError> {
        web_sys::window()
            .ok_or(HostError::Unavailable("window"))?
            .local_storage()
            .map_err(|e| call_error("localStorage", &e))?
            .ok_or(HostError::Unavailable("localStorage"))
    }
}

impl Storage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        Self::local()?.get_item(key).map_err(|e| call_error("localStorage.getItem", &e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError> {
        Self::local()?.set_item(key, value).map_err(|e| call_error("localStorage.setItem", &e))
    }
}

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

pub struct BrowserColorScheme {
    query: Option<web_sys::MediaQueryList>,
}

impl BrowserColorScheme {
    pub fn new(window: &web_sys::Window) -> Self {
        Self { query: window.match_media(DARK_QUERY).ok().flatten() }
    }
}

impl ColorScheme for BrowserColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.query.as_ref().map(web_sys::MediaQueryList::matches)
    }

    fn on_change(&self, handler: Rc<dyn Fn(bool)>) -> Subscription {
        let Some(query) = self.query.clone() else {
            return Subscription::noop();
        };
        let source = query.clone();
        let function: Function =
            Closure::<dyn Fn()>::new(move || handler(source.matches())).into_js_value().unchecked_into();

        let modern = Reflect::get(&query, &JsValue::from_str("addEventListener")).is_ok_and(|f| f.is_function());
        if modern {
            if query.add_event_listener_with_callback("change", &function).is_err() {
                return Subscription::noop();
            }
            return Subscription::new(move || {
                let _ = query.remove_event_listener_with_callback("change", &function);
            });
        }

        // Older engines only expose addListener/removeListener.
        let legacy = |method: &str| Reflect::get(&query, &JsValue::from_str(method)).ok()?.dyn_into::<Function>().ok();
        let Some(add) = legacy("addListener") else {
            return Subscription::noop();
        };
        if add.call1(&query, &function).is_err() {
            return Subscription::noop();
        }
        let remove = legacy("removeListener");
        Subscription::new(move || {
            if let Some(remove) = remove {
                let _ = remove.call1(&query, &function);
            }
        })
    }
}

// =============================================================================
// GLOBALS / TIMERS / AUDIO
// =============================================================================

pub struct BrowserGlobals {
    window: web_sys::Window,
}

impl BrowserGlobals {
    fn object(&self, name: &str) -> Option<JsValue> {
        Reflect::get(&self.window, &JsValue::from_str(name)).ok().filter(|v| !v.is_undefined() && !v.is_null())
    }

    fn method(&self, object: &str, method: &str) -> Option<(JsValue, Function)> {
        let target = self.object(object)?;
        let function = Reflect::get(&target, &JsValue::from_str(method)).ok()?.dyn_into::<Function>().ok()?;
        Some((target, function))
    }
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, HostError> {
    js_sys::JSON::parse(&value.to_string()).map_err(|e| call_error("JSON.parse", &e))
}

impl Globals for BrowserGlobals {
    fn call(&self, object: &str, method: &str, args: &[serde_json::Value]) -> Result<bool, HostError> {
        let Some((target, function)) = self.method(object, method) else {
            return Ok(false);
        };
        let js_args = Array::new();
        for arg in args {
            js_args.push(&to_js(arg)?);
        }
        function.apply(&target, &js_args).map_err(|e| call_error("global call", &e))?;
        Ok(true)
    }

    fn set_slot(&self, slot: &str, value: &serde_json::Value) -> Result<(), HostError> {
        Reflect::set(&self.window, &JsValue::from_str(slot), &to_js(value)?).map_err(|e| call_error("window slot", &e))?;
        Ok(())
    }
}

pub struct BrowserTimers;

impl Timers for BrowserTimers {
    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) {
        gloo_timers::callback::Timeout::new(millis, callback).forget();
    }
}

pub struct BrowserAudio(web_sys::HtmlAudioElement);

impl AudioOutput for BrowserAudio {
    fn set_source(&self, url: &str) {
        self.0.set_src(url);
        self.0.load();
    }

    fn clear_source(&self) {
        let _ = self.0.remove_attribute("src");
        self.0.load();
    }

    fn has_source(&self) -> bool {
        !self.0.src().is_empty()
    }

    fn play(&self, on_rejected: Box<dyn FnOnce()>) {
        match self.0.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    warn!("radio: playback refused: {}", call_error("play", &e));
                    on_rejected();
                }
            }),
            Err(e) => {
                warn!("radio: playback failed: {}", call_error("play", &e));
                on_rejected();
            }
        }
    }

    fn pause(&self) {
        let _ = self.0.pause();
    }

    fn set_volume(&self, volume: f64) {
        self.0.set_volume(volume);
    }

    fn listen(&self, event: &str, handler: Handler) -> Subscription {
        listen(&self.0, event, handler)
    }
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

impl Env {
    /// Capabilities of the current browser page.
    ///
    /// # Errors
    ///
    /// Fails outside a window with a document and root element.
    pub fn browser() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::Unavailable("window"))?;
        let document = window.document().ok_or(HostError::Unavailable("document"))?;
        let root = document.document_element().ok_or(HostError::Unavailable("document element"))?;
        Ok(Self {
            document: Rc::new(BrowserDocument { document, root }),
            storage: Rc::new(BrowserStorage),
            color_scheme: Rc::new(BrowserColorScheme::new(&window)),
            globals: Rc::new(BrowserGlobals { window }),
            timers: Rc::new(BrowserTimers),
        })
    }
}

//! Browser capability seams.
//!
//! DESIGN
//! ======
//! Everything that touches the live page goes through the traits in this
//! module: DOM queries and attributes, `localStorage`, the color-scheme media
//! query, third-party window globals, timers, and the radio `<audio>` element.
//! `browser` implements them over `web-sys` (hydrate only); `memory`
//! implements them in plain Rust so the theme, embed, like, and radio logic
//! runs natively under `cargo test`.
//!
//! TRADE-OFFS
//! ==========
//! Handlers are `Rc<dyn Fn()>` rather than event objects. The few places that
//! need event data (key name, media-query match) get a dedicated method.
//! Registrations are not tied to handle lifetimes: dropping a
//! [`Subscription`] keeps the listener alive, matching how page scripts
//! attach listeners. Call [`Subscription::unsubscribe`] to detach.

#[cfg(feature = "hydrate")]
pub mod browser;
pub mod memory;

use std::rc::Rc;

/// Shared handle to a DOM element.
pub type ElementRef = Rc<dyn Element>;

/// Event callback without event data.
pub type Handler = Rc<dyn Fn()>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("{api} failed: {message}")]
    Call { api: &'static str, message: String },
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Teardown handle for a listener registration.
pub struct Subscription(Option<Box<dyn FnOnce()>>);

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(teardown)))
    }

    /// Handle for a registration that has nothing to tear down.
    pub fn noop() -> Self {
        Self(None)
    }

    /// Detach the registration.
    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.0.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Subscription").field(&self.0.is_some()).finish()
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

pub trait Element {
    fn tag(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    /// Current value of a form control (`<input>`).
    fn value(&self) -> Option<String>;
    fn set_value(&self, value: &str);
    fn set_style(&self, property: &str, value: &str);
    /// Remove every child node.
    fn clear_children(&self);
    /// Detach this element from its parent.
    fn remove(&self);
    /// Descendants matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementRef>;
    fn query(&self, selector: &str) -> Option<ElementRef> {
        self.query_all(selector).into_iter().next()
    }
    fn listen(&self, event: &str, handler: Handler) -> Subscription;
    /// Listener removed after its first delivery.
    fn listen_once(&self, event: &str, handler: Box<dyn FnOnce()>);
    /// Click listener. The browser host also prevents the default action.
    fn on_click(&self, handler: Handler) -> Subscription {
        self.listen("click", handler)
    }
    /// Click listener that keeps the click from reaching ancestor listeners.
    fn on_click_stopped(&self, handler: Handler) -> Subscription {
        self.on_click(handler)
    }
    /// Media controls when this element is an `<audio>` element.
    fn audio(&self) -> Option<Rc<dyn AudioOutput>> {
        None
    }
}

pub trait Document {
    /// The `<html>` element.
    fn root(&self) -> ElementRef;
    fn query_all(&self, selector: &str) -> Vec<ElementRef>;
    fn query(&self, selector: &str) -> Option<ElementRef> {
        self.query_all(selector).into_iter().next()
    }
    fn by_id(&self, id: &str) -> Option<ElementRef>;
    /// Append an async `<script src>` to `<head>`, tagged with `marker=value`.
    ///
    /// # Errors
    ///
    /// Fails when the element cannot be created or `<head>` is missing.
    fn append_script(&self, src: &str, marker: &str, value: &str) -> Result<ElementRef, HostError>;
    fn title(&self) -> String;
    /// `document.readyState == "loading"`.
    fn is_loading(&self) -> bool;
    fn listen(&self, event: &str, handler: Handler) -> Subscription;
    fn listen_once(&self, event: &str, handler: Box<dyn FnOnce()>);
    /// `keydown` listener receiving `KeyboardEvent.key`.
    fn on_keydown(&self, handler: Rc<dyn Fn(&str)>) -> Subscription;
}

/// Fallible `localStorage` access.
pub trait Storage {
    /// # Errors
    ///
    /// Fails when storage is disabled or access is denied.
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError>;
    /// # Errors
    ///
    /// Fails when storage is disabled, access is denied, or quota is exceeded.
    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError>;
}

/// `(prefers-color-scheme: dark)` media query.
pub trait ColorScheme {
    /// `None` when the environment cannot evaluate media queries.
    fn prefers_dark(&self) -> Option<bool>;
    fn on_change(&self, handler: Rc<dyn Fn(bool)>) -> Subscription;
}

/// Third-party `window` globals. Calls check that the method exists first.
pub trait Globals {
    /// Call `window[object][method](...args)`. `Ok(false)` when the object or
    /// method is absent.
    ///
    /// # Errors
    ///
    /// Fails when the call itself throws.
    fn call(&self, object: &str, method: &str, args: &[serde_json::Value]) -> Result<bool, HostError>;
    /// Write `window[slot] = value`.
    ///
    /// # Errors
    ///
    /// Fails when the value cannot be converted or assigned.
    fn set_slot(&self, slot: &str, value: &serde_json::Value) -> Result<(), HostError>;
}

pub trait Timers {
    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>);
}

/// Playback controls for an `<audio>` element.
pub trait AudioOutput {
    fn set_source(&self, url: &str);
    /// Drop the source and reload so the stream buffer is released.
    fn clear_source(&self);
    fn has_source(&self) -> bool;
    /// Start playback. `on_rejected` runs if the browser refuses to play.
    fn play(&self, on_rejected: Box<dyn FnOnce()>);
    fn pause(&self);
    fn set_volume(&self, volume: f64);
    fn listen(&self, event: &str, handler: Handler) -> Subscription;
}

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// The capability bundle handed to every client subsystem.
#[derive(Clone)]
pub struct Env {
    pub document: Rc<dyn Document>,
    pub storage: Rc<dyn Storage>,
    pub color_scheme: Rc<dyn ColorScheme>,
    pub globals: Rc<dyn Globals>,
    pub timers: Rc<dyn Timers>,
}

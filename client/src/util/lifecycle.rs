//! In-place navigation lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The site swaps page bodies without a full reload and announces it with
//! document events. Anything bound to page content must re-run after a swap,
//! and anything page-scoped must detach before the next one.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::host::{Document, Element, Handler, Subscription};

pub const BEFORE_SWAP: &str = "astro:before-swap";
pub const AFTER_SWAP: &str = "astro:after-swap";
pub const PAGE_LOAD: &str = "astro:page-load";
pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";

/// Which navigation event re-runs an initializer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigationTrigger {
    /// Right after the new body is in place.
    #[default]
    AfterSwap,
    /// After the new page has fully loaded.
    PageLoad,
}

impl NavigationTrigger {
    pub fn event(self) -> &'static str {
        match self {
            Self::AfterSwap => AFTER_SWAP,
            Self::PageLoad => PAGE_LOAD,
        }
    }
}

/// Run `init` once the document is ready, then again after every navigation.
///
/// The returned handle detaches the navigation listener; a pending
/// `DOMContentLoaded` run is not cancelled.
pub fn auto_init(document: &dyn Document, trigger: NavigationTrigger, init: Handler) -> Subscription {
    if document.is_loading() {
        let first = Rc::clone(&init);
        document.listen_once(DOM_CONTENT_LOADED, Box::new(move || first()));
    } else {
        init();
    }
    document.listen(trigger.event(), init)
}

/// Listener on `target` that is removed at the next `before-swap`.
pub fn navigation_scoped(document: &dyn Document, target: &dyn Element, event: &str, handler: Handler) {
    let subscription = target.listen(event, handler);
    document.listen_once(BEFORE_SWAP, Box::new(move || subscription.unsubscribe()));
}

/// Run-at-most-once guard.
#[derive(Debug, Default)]
pub struct Once(Cell<bool>);

impl Once {
    pub const fn new() -> Self {
        Self(Cell::new(false))
    }

    /// Run `f` if this guard has never fired. Returns whether it ran.
    pub fn call(&self, f: impl FnOnce()) -> bool {
        if self.0.replace(true) {
            return false;
        }
        f();
        true
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.0.get()
    }
}

//! Theme side effects: persistence, DOM attributes, OS and navigation events.
//!
//! DESIGN
//! ======
//! `ThemeEffects` owns the [`ThemeStore`] and is the single writer. One
//! preference listener, registered by `init`, recomputes the active theme,
//! applies it to `<html>`, persists it, and fans the new state out to
//! `on_change` listeners. `set_preference` and `cycle` only write the
//! preference cell and inherit everything else from that listener.
//!
//! `<html>` carries `data-theme` (resolved) and `data-theme-mode`
//! (preference). Both are re-applied around every in-place navigation,
//! because the swap can replace root attributes and flash the default theme.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures are logged and ignored; the theme keeps working for the
//! session without persistence.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::logging::warn;
use wire::THEME_STORAGE_KEY;

use crate::host::{ElementRef, Env, Subscription};
use crate::state::theme::ThemeStore;
use crate::util::lifecycle::{AFTER_SWAP, BEFORE_SWAP};
use crate::util::theme_core::{ThemeName, ThemePreference, ThemeState, cycle_preference, describe_state, resolve_theme};

pub const TOGGLE_SELECTOR: &str = "[data-theme-toggle]";
pub const TOGGLE_LABEL_SELECTOR: &str = "[data-theme-toggle-label]";
pub const TOGGLE_BOUND_ATTR: &str = "data-theme-bound";

type ThemeListener = Rc<dyn Fn(ThemeState)>;

pub struct ThemeEffects {
    env: Env,
    store: ThemeStore,
    listeners: RefCell<Vec<(u64, ThemeListener)>>,
    next_id: Cell<u64>,
    me: Weak<ThemeEffects>,
}

impl ThemeEffects {
    pub fn new(env: Env) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            env,
            store: ThemeStore::new(),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            me: me.clone(),
        })
    }

    pub fn store(&self) -> &ThemeStore {
        &self.store
    }

    pub fn state(&self) -> ThemeState {
        self.store.state()
    }

    /// Load the persisted preference, apply it, and start listening. Later
    /// calls only return the current state.
    pub fn init(&self) -> ThemeState {
        if self.store.is_initialized() {
            return self.state();
        }

        match self.env.storage.get_item(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => {
                if let Some(preference) = ThemePreference::parse(&raw) {
                    self.store.preference.set(preference);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("theme: could not read preference: {e}"),
        }

        let preference = self.store.preference.get();
        let theme = resolve_theme(preference, self.env.color_scheme.as_ref());
        self.store.active.set(theme);
        self.apply(theme, preference);
        self.store.initialized.set(true);

        let me = self.me.clone();
        let _ = self.store.preference.listen(move |&preference| {
            if let Some(effects) = me.upgrade() {
                effects.preference_changed(preference);
            }
        });

        let me = self.me.clone();
        let _ = self.env.color_scheme.on_change(Rc::new(move |dark| {
            if let Some(effects) = me.upgrade() {
                effects.system_changed(dark);
            }
        }));

        for event in [BEFORE_SWAP, AFTER_SWAP] {
            let me = self.me.clone();
            let _ = self.env.document.listen(
                event,
                Rc::new(move || {
                    if let Some(effects) = me.upgrade() {
                        effects.reapply();
                    }
                }),
            );
        }

        self.state()
    }

    pub fn set_preference(&self, preference: ThemePreference) {
        self.init();
        self.store.preference.set(preference);
    }

    pub fn cycle(&self) {
        self.set_preference(cycle_preference(self.store.preference.get()));
    }

    /// Deliver the current state to `listener` now and after every change.
    pub fn on_change(&self, listener: impl Fn(ThemeState) + 'static) -> Subscription {
        self.init();
        let listener: ThemeListener = Rc::new(listener);
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::clone(&listener)));
        listener(self.state());

        let me = self.me.clone();
        Subscription::new(move || {
            if let Some(effects) = me.upgrade() {
                effects.listeners.borrow_mut().retain(|(entry, _)| *entry != id);
            }
        })
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Bind every `[data-theme-toggle]` under `root` to [`Self::cycle`] and
    /// keep all of them rendering the current state. Toggles that already
    /// carry the bound marker are rendered but not bound again.
    ///
    /// Returns `None` when `root` holds no toggles.
    pub fn bind_toggles(&self, root: &ElementRef) -> Option<Subscription> {
        let toggles = root.query_all(TOGGLE_SELECTOR);
        if toggles.is_empty() {
            return None;
        }

        let unbound: Vec<ElementRef> = toggles.iter().filter(|t| !t.has_attribute(TOGGLE_BOUND_ATTR)).cloned().collect();
        let mut clicks = Vec::with_capacity(unbound.len());
        for toggle in &unbound {
            toggle.set_attribute(TOGGLE_BOUND_ATTR, "true");
            let me = self.me.clone();
            clicks.push(toggle.on_click(Rc::new(move || {
                if let Some(effects) = me.upgrade() {
                    effects.cycle();
                }
            })));
        }

        let updates = self.on_change(move |state| render_toggles(&toggles, state));

        Some(Subscription::new(move || {
            updates.unsubscribe();
            for click in clicks {
                click.unsubscribe();
            }
            for toggle in &unbound {
                toggle.remove_attribute(TOGGLE_BOUND_ATTR);
            }
        }))
    }

    fn preference_changed(&self, preference: ThemePreference) {
        let theme = resolve_theme(preference, self.env.color_scheme.as_ref());
        self.store.active.set(theme);
        self.apply(theme, preference);
        if let Err(e) = self.env.storage.set_item(THEME_STORAGE_KEY, preference.as_str()) {
            warn!("theme: could not persist preference: {e}");
        }
        self.notify(ThemeState { theme, preference });
    }

    fn system_changed(&self, dark: bool) {
        if self.store.preference.get() != ThemePreference::System {
            return;
        }
        let theme = ThemeName::from_dark(dark);
        self.store.active.set(theme);
        self.apply(theme, ThemePreference::System);
        self.notify(ThemeState { theme, preference: ThemePreference::System });
    }

    fn reapply(&self) {
        let state = self.state();
        self.apply(state.theme, state.preference);
    }

    fn apply(&self, theme: ThemeName, preference: ThemePreference) {
        let root = self.env.document.root();
        root.set_attribute("data-theme", theme.as_str());
        root.set_attribute("data-theme-mode", preference.as_str());
    }

    fn notify(&self, state: ThemeState) {
        let snapshot = self.listeners.borrow().clone();
        for (id, listener) in snapshot {
            let live = self.listeners.borrow().iter().any(|(entry, _)| *entry == id);
            if live {
                listener(state);
            }
        }
    }
}

fn render_toggles(toggles: &[ElementRef], state: ThemeState) {
    let description = describe_state(state);
    for toggle in toggles {
        toggle.set_attribute("data-theme-preference", state.preference.as_str());
        toggle.set_attribute("data-theme-state", state.theme.as_str());
        toggle.set_attribute("data-theme-next", description.next_preference.as_str());
        toggle.set_attribute("aria-label", &description.message);
        toggle.set_attribute("title", &description.message);
        if let Some(label) = toggle.query(TOGGLE_LABEL_SELECTOR) {
            label.set_text(&description.message);
        }
    }
}

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::host::Element;
use crate::host::memory::{MemoryEnv, MemoryNode};

fn setup() -> (MemoryEnv, Rc<ThemeEffects>) {
    let mem = MemoryEnv::new();
    let effects = ThemeEffects::new(mem.env());
    (mem, effects)
}

fn root_attrs(mem: &MemoryEnv) -> (Option<String>, Option<String>) {
    let root = mem.document.root_node();
    (root.attribute("data-theme"), root.attribute("data-theme-mode"))
}

fn record(effects: &ThemeEffects) -> (Rc<RefCell<Vec<ThemeState>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = effects.on_change(move |state| sink.borrow_mut().push(state));
    (seen, sub)
}

// =============================================================================
// init
// =============================================================================

#[test]
fn init_defaults_to_system_and_applies_root_attributes() {
    let (mem, effects) = setup();
    let state = effects.init();
    assert_eq!(state, ThemeState { theme: ThemeName::Light, preference: ThemePreference::System });
    assert_eq!(root_attrs(&mem), (Some("light".into()), Some("system".into())));
}

#[test]
fn init_loads_persisted_preference() {
    let (mem, effects) = setup();
    mem.storage.insert(THEME_STORAGE_KEY, "dark");
    assert_eq!(effects.init().theme, ThemeName::Dark);
    assert_eq!(root_attrs(&mem), (Some("dark".into()), Some("dark".into())));
}

#[test]
fn init_ignores_invalid_persisted_value() {
    let (mem, effects) = setup();
    mem.storage.insert(THEME_STORAGE_KEY, "sepia");
    assert_eq!(effects.init().preference, ThemePreference::System);
}

#[test]
fn init_survives_unreadable_storage() {
    let (mem, effects) = setup();
    mem.storage.set_failing(true, true);
    assert_eq!(effects.init().preference, ThemePreference::System);
    effects.set_preference(ThemePreference::Dark);
    assert_eq!(effects.state().theme, ThemeName::Dark);
}

#[test]
fn init_twice_is_idempotent() {
    let (mem, effects) = setup();
    let first = effects.init();
    let second = effects.init();
    assert_eq!(first, second);
    assert_eq!(mem.color_scheme.listener_count(), 1);
    assert_eq!(mem.document.listener_count(AFTER_SWAP), 1);
    assert_eq!(mem.document.listener_count(BEFORE_SWAP), 1);
}

// =============================================================================
// preference changes
// =============================================================================

#[test]
fn set_preference_applies_and_persists() {
    let (mem, effects) = setup();
    effects.init();
    effects.set_preference(ThemePreference::Dark);
    assert_eq!(effects.state(), ThemeState { theme: ThemeName::Dark, preference: ThemePreference::Dark });
    assert_eq!(root_attrs(&mem), (Some("dark".into()), Some("dark".into())));
    assert_eq!(mem.storage.item(THEME_STORAGE_KEY).as_deref(), Some("dark"));
}

#[test]
fn cycle_walks_system_light_dark() {
    let (mem, effects) = setup();
    effects.init();
    effects.cycle();
    assert_eq!(effects.state().preference, ThemePreference::Light);
    effects.cycle();
    assert_eq!(effects.state().preference, ThemePreference::Dark);
    effects.cycle();
    assert_eq!(effects.state().preference, ThemePreference::System);
    assert_eq!(mem.storage.item(THEME_STORAGE_KEY).as_deref(), Some("system"));
}

#[test]
fn os_change_applies_only_under_system_preference() {
    let (mem, effects) = setup();
    effects.init();
    mem.color_scheme.set_dark(true);
    assert_eq!(effects.state().theme, ThemeName::Dark);
    assert_eq!(root_attrs(&mem).0.as_deref(), Some("dark"));

    effects.set_preference(ThemePreference::Light);
    mem.color_scheme.set_dark(false);
    mem.color_scheme.set_dark(true);
    assert_eq!(effects.state(), ThemeState { theme: ThemeName::Light, preference: ThemePreference::Light });
}

#[test]
fn navigation_swap_reapplies_root_attributes() {
    let (mem, effects) = setup();
    effects.init();
    effects.set_preference(ThemePreference::Dark);
    let root = mem.document.root_node();
    root.remove_attribute("data-theme");
    root.remove_attribute("data-theme-mode");
    mem.document.dispatch(AFTER_SWAP);
    assert_eq!(root_attrs(&mem), (Some("dark".into()), Some("dark".into())));
}

// =============================================================================
// on_change
// =============================================================================

#[test]
fn on_change_delivers_current_state_immediately() {
    let (_mem, effects) = setup();
    let (seen, _sub) = record(&effects);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].preference, ThemePreference::System);
}

#[test]
fn on_change_delivers_once_per_change() {
    let (mem, effects) = setup();
    let (seen, _sub) = record(&effects);
    effects.set_preference(ThemePreference::Dark);
    mem.color_scheme.set_dark(true);
    effects.set_preference(ThemePreference::System);
    let states = seen.borrow();
    assert_eq!(states.len(), 3);
    assert_eq!(states[1], ThemeState { theme: ThemeName::Dark, preference: ThemePreference::Dark });
    assert_eq!(states[2], ThemeState { theme: ThemeName::Dark, preference: ThemePreference::System });
}

#[test]
fn unsubscribed_listener_receives_nothing_more() {
    let (mem, effects) = setup();
    let (seen, sub) = record(&effects);
    sub.unsubscribe();
    effects.cycle();
    mem.color_scheme.set_dark(true);
    effects.cycle();
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(effects.listener_count(), 0);
}

// =============================================================================
// bind_toggles
// =============================================================================

fn add_toggle(mem: &MemoryEnv) -> Rc<MemoryNode> {
    let toggle = mem.document.body().append(MemoryNode::new("button").with_attr("data-theme-toggle", ""));
    toggle.append(MemoryNode::new("span").with_attr("data-theme-toggle-label", ""));
    toggle
}

#[test]
fn bind_toggles_without_toggles_returns_none() {
    let (mem, effects) = setup();
    assert!(effects.bind_toggles(&mem.env().document.root()).is_none());
}

#[test]
fn bind_toggles_renders_state_and_cycles_on_click() {
    let (mem, effects) = setup();
    let toggle = add_toggle(&mem);
    let _binding = effects.bind_toggles(&mem.env().document.root()).unwrap();

    assert_eq!(toggle.attribute(TOGGLE_BOUND_ATTR).as_deref(), Some("true"));
    assert_eq!(toggle.attribute("data-theme-preference").as_deref(), Some("system"));
    assert_eq!(toggle.attribute("data-theme-next").as_deref(), Some("light"));

    toggle.click();
    assert_eq!(effects.state().preference, ThemePreference::Light);
    let message = "Current theme: Light Mode. Click to switch to Dark Mode";
    assert_eq!(toggle.attribute("aria-label").as_deref(), Some(message));
    assert_eq!(toggle.attribute("title").as_deref(), Some(message));
    assert_eq!(toggle.attribute("data-theme-state").as_deref(), Some("light"));
    let label = mem.document.node("[data-theme-toggle-label]").unwrap();
    assert_eq!(label.text(), message);
}

#[test]
fn rebinding_does_not_double_bind_but_updates_all_toggles() {
    let (mem, effects) = setup();
    let first = add_toggle(&mem);
    let _a = effects.bind_toggles(&mem.env().document.root()).unwrap();
    let second = add_toggle(&mem);
    let _b = effects.bind_toggles(&mem.env().document.root()).unwrap();

    assert_eq!(first.listener_count("click"), 1);
    assert_eq!(second.listener_count("click"), 1);

    second.click();
    assert_eq!(effects.state().preference, ThemePreference::Light);
    assert_eq!(first.attribute("data-theme-preference").as_deref(), Some("light"));
    assert_eq!(second.attribute("data-theme-preference").as_deref(), Some("light"));
}

#[test]
fn toggle_binding_teardown_unbinds() {
    let (mem, effects) = setup();
    let toggle = add_toggle(&mem);
    effects.bind_toggles(&mem.env().document.root()).unwrap().unsubscribe();
    assert!(!toggle.has_attribute(TOGGLE_BOUND_ATTR));
    assert_eq!(toggle.listener_count("click"), 0);
    assert_eq!(effects.listener_count(), 0);
}

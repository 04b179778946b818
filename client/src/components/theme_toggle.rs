//! Theme toggle button.
//!
//! Renders the `[data-theme-toggle]` contract. Labels are filled with the
//! default state so the markup reads sensibly before `ThemeEffects` binds it.

#[cfg(test)]
#[path = "theme_toggle_test.rs"]
mod theme_toggle_test;

use leptos::prelude::*;

use crate::util::theme_core::{ThemeState, describe_state};

/// Copy shown before the toggle is bound.
pub fn initial_toggle_message() -> String {
    describe_state(ThemeState::default()).message
}

#[component]
pub fn ThemeToggle(#[prop(optional, into)] class: String) -> impl IntoView {
    let message = initial_toggle_message();
    view! {
        <button
            type="button"
            class=format!("theme-toggle {class}")
            data-theme-toggle=""
            aria-label=message.clone()
            title=message.clone()
        >
            <span class="theme-toggle__label" data-theme-toggle-label="">{message.clone()}</span>
        </button>
    }
}

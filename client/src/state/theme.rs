//! Theme state cells.
//!
//! DESIGN
//! ======
//! Pure state, no side effects. `util::theme::ThemeEffects` is the only
//! writer; everything else reads or subscribes through the accessors.

use crate::state::atom::Atom;
use crate::util::theme_core::{ThemeName, ThemePreference, ThemeState};

#[derive(Clone, Default)]
pub struct ThemeStore {
    pub(crate) preference: Atom<ThemePreference>,
    pub(crate) active: Atom<ThemeName>,
    pub(crate) initialized: Atom<bool>,
}

impl ThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn state(&self) -> ThemeState {
        ThemeState { theme: self.active.get(), preference: self.preference.get() }
    }
}

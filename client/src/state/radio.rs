//! Radio player state.
//!
//! DESIGN
//! ======
//! Pure state: atoms plus the derived strings the player renders. Audio and
//! DOM effects live in `util::radio_player`, which subscribes to these cells.

#[cfg(test)]
#[path = "radio_test.rs"]
mod radio_test;

use crate::state::atom::Atom;
use crate::util::dial_math::dial_angle_from_level;

pub const DEFAULT_VOLUME: f64 = 0.7;
pub const DEFAULT_STATION_TITLE: &str = "Trucks.FM";
/// Title shown while nothing is playing.
pub const IDLE_TITLE: &str = "Space Radio";

/// Playback state of the stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RadioState {
    #[default]
    Stopped,
    Loading,
    Playing,
    Error,
}

impl RadioState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Error => "error",
        }
    }

    /// Loading or playing.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Loading | Self::Playing)
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Self::Stopped => "",
            Self::Loading => "Connecting...",
            Self::Playing => "Now playing",
            Self::Error => "Connection error",
        }
    }

    pub fn play_label(self) -> &'static str {
        if self.is_active() { "Stop radio" } else { "Play radio" }
    }
}

/// Shared radio cells. Clones share state.
#[derive(Clone)]
pub struct RadioStore {
    pub state: Atom<RadioState>,
    pub expanded: Atom<bool>,
    pub volume: Atom<f64>,
    pub muted: Atom<bool>,
    pub title: Atom<String>,
}

impl Default for RadioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioStore {
    pub fn new() -> Self {
        Self {
            state: Atom::new(RadioState::Stopped),
            expanded: Atom::new(false),
            volume: Atom::new(DEFAULT_VOLUME),
            muted: Atom::new(false),
            title: Atom::new(DEFAULT_STATION_TITLE.to_owned()),
        }
    }

    pub fn toggle_expanded(&self) {
        self.expanded.set(!self.expanded.get());
    }

    /// Close the drawer if open. Returns whether it was open.
    pub fn collapse(&self) -> bool {
        if !self.expanded.get() {
            return false;
        }
        self.expanded.set(false);
        true
    }

    /// Clamp to `[0, 1]` and unmute. Non-finite input is ignored.
    pub fn set_volume(&self, volume: f64) {
        if !volume.is_finite() {
            return;
        }
        self.volume.set(volume.clamp(0.0, 1.0));
        if self.muted.get() {
            self.muted.set(false);
        }
    }

    pub fn toggle_mute(&self) {
        self.muted.set(!self.muted.get());
    }

    /// Volume the audio output should use.
    pub fn effective_volume(&self) -> f64 {
        if self.muted.get() { 0.0 } else { self.volume.get() }
    }

    /// Station title while active, the idle title otherwise.
    pub fn displayed_title(&self) -> String {
        if self.state.get().is_active() { self.title.get() } else { IDLE_TITLE.to_owned() }
    }

    pub fn dial_angle(&self) -> f64 {
        dial_angle_from_level(self.volume.get())
    }
}

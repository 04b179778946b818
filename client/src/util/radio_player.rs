//! Persistent radio player binding.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `[data-radio-player]` element survives in-place navigation, so it is
//! bound once and the `data-radio-bound` marker stops later passes. The
//! marker is set before the `<audio>` element and stream URL are checked; a
//! player missing either stays unbound for the rest of the session.
//!
//! Children, all optional except the audio element:
//! `[data-radio-audio]`, `[data-radio-play]` (any number),
//! `[data-radio-expand]`, `[data-radio-bar-clickable]`, `[data-radio-drawer]`,
//! `[data-radio-title]`, `[data-radio-status]`, `[data-radio-mute]`,
//! `[data-radio-volume]`, `[data-radio-dial-indicator]`,
//! `[data-radio-cassette-title]`.

#[cfg(test)]
#[path = "radio_player_test.rs"]
mod radio_player_test;

use std::rc::Rc;

use crate::host::{AudioOutput, Document, ElementRef};
use crate::state::radio::{RadioState, RadioStore};
use crate::util::dial_math::rotate_transform;
use crate::util::lifecycle::{AFTER_SWAP, BEFORE_SWAP};

pub const PLAYER_SELECTOR: &str = "[data-radio-player]";
pub const BOUND_ATTR: &str = "data-radio-bound";
/// Present on the player root while a navigation swap is in flight.
pub const NAVIGATING_ATTR: &str = "data-radio-navigating";

/// Controls for a bound player.
pub struct RadioPlayer {
    store: RadioStore,
    audio: Rc<dyn AudioOutput>,
    stream_url: String,
}

impl RadioPlayer {
    pub fn store(&self) -> &RadioStore {
        &self.store
    }

    pub fn play(&self) {
        self.store.state.set(RadioState::Loading);
        self.audio.set_source(&self.stream_url);
        let state = self.store.state.clone();
        self.audio.play(Box::new(move || state.set(RadioState::Error)));
    }

    pub fn stop(&self) {
        self.audio.pause();
        self.audio.clear_source();
        self.store.state.set(RadioState::Stopped);
    }

    pub fn toggle_play(&self) {
        if self.store.state.get().is_active() {
            self.stop();
        } else {
            self.play();
        }
    }
}

struct Parts {
    root: ElementRef,
    play_buttons: Vec<ElementRef>,
    expand: Option<ElementRef>,
    bar: Option<ElementRef>,
    drawer: Option<ElementRef>,
    title: Option<ElementRef>,
    status: Option<ElementRef>,
    mute: Option<ElementRef>,
    volume: Option<ElementRef>,
    dial: Option<ElementRef>,
    cassette: Option<ElementRef>,
}

impl Parts {
    fn find(root: ElementRef) -> Self {
        Self {
            play_buttons: root.query_all("[data-radio-play]"),
            expand: root.query("[data-radio-expand]"),
            bar: root.query("[data-radio-bar-clickable]"),
            drawer: root.query("[data-radio-drawer]"),
            title: root.query("[data-radio-title]"),
            status: root.query("[data-radio-status]"),
            mute: root.query("[data-radio-mute]"),
            volume: root.query("[data-radio-volume]"),
            dial: root.query("[data-radio-dial-indicator]"),
            cassette: root.query("[data-radio-cassette-title]"),
            root,
        }
    }

    fn render_title(&self, store: &RadioStore) {
        let title = store.displayed_title();
        if let Some(el) = &self.title {
            el.set_text(&title);
        }
        if let Some(el) = &self.cassette {
            el.set_text(&title.to_uppercase());
        }
    }

    fn render_state(&self, store: &RadioStore, state: RadioState) {
        self.root.set_attribute("data-radio-state", state.as_str());
        for button in &self.play_buttons {
            button.set_attribute("aria-label", state.play_label());
        }
        if let Some(el) = &self.status {
            el.set_text(state.status_text());
        }
        self.render_title(store);
    }

    fn render_expanded(&self, expanded: bool) {
        self.root.set_attribute("data-radio-expanded", &expanded.to_string());
        if let Some(el) = &self.expand {
            el.set_attribute("aria-expanded", &expanded.to_string());
        }
        if let Some(el) = &self.drawer {
            el.set_attribute("aria-hidden", &(!expanded).to_string());
        }
    }

    fn render_volume(&self, store: &RadioStore, volume: f64) {
        if let Some(el) = &self.volume {
            el.set_value(&volume.to_string());
        }
        if let Some(el) = &self.dial {
            el.set_style("transform", &rotate_transform(store.dial_angle()));
        }
    }
}

/// Bind the page's radio player to `store`. Returns `None` when there is no
/// player, it is already bound, or it lacks audio or a stream URL.
pub fn bind_radio_player(document: &Rc<dyn Document>, store: &RadioStore) -> Option<Rc<RadioPlayer>> {
    let root = document.query(PLAYER_SELECTOR)?;
    if root.has_attribute(BOUND_ATTR) {
        return None;
    }
    root.set_attribute(BOUND_ATTR, "");

    let audio = root.query("[data-radio-audio]")?.audio()?;
    let stream_url = root.attribute("data-stream-url").filter(|url| !url.is_empty())?;
    let player = Rc::new(RadioPlayer { store: store.clone(), audio: Rc::clone(&audio), stream_url });
    let parts = Rc::new(Parts::find(Rc::clone(&root)));

    bind_audio_events(&audio, store);
    bind_controls(document, &player, &parts);
    subscribe_view(&player, &parts);

    for (event, navigating) in [(BEFORE_SWAP, true), (AFTER_SWAP, false)] {
        let root = Rc::clone(&root);
        let _ = document.listen(
            event,
            Rc::new(move || {
                if navigating {
                    root.set_attribute(NAVIGATING_ATTR, "");
                } else {
                    root.remove_attribute(NAVIGATING_ATTR);
                }
            }),
        );
    }

    Some(player)
}

fn bind_audio_events(audio: &Rc<dyn AudioOutput>, store: &RadioStore) {
    for (event, next) in [("playing", RadioState::Playing), ("waiting", RadioState::Loading), ("stalled", RadioState::Loading)] {
        let state = store.state.clone();
        let _ = audio.listen(event, Rc::new(move || state.set(next)));
    }
    // `error` also fires for the emptied source after a stop.
    let state = store.state.clone();
    let source = Rc::clone(audio);
    let _ = audio.listen(
        "error",
        Rc::new(move || {
            if source.has_source() {
                state.set(RadioState::Error);
            }
        }),
    );
}

fn bind_controls(document: &Rc<dyn Document>, player: &Rc<RadioPlayer>, parts: &Rc<Parts>) {
    for button in &parts.play_buttons {
        let player = Rc::clone(player);
        let _ = button.on_click_stopped(Rc::new(move || player.toggle_play()));
    }

    if let Some(expand) = &parts.expand {
        let store = player.store.clone();
        let _ = expand.on_click_stopped(Rc::new(move || store.toggle_expanded()));
    }
    if let Some(bar) = &parts.bar {
        let store = player.store.clone();
        let _ = bar.listen("click", Rc::new(move || store.toggle_expanded()));
    }
    if let Some(mute) = &parts.mute {
        let store = player.store.clone();
        let _ = mute.listen("click", Rc::new(move || store.toggle_mute()));
    }
    if let Some(slider) = &parts.volume {
        let store = player.store.clone();
        let input = Rc::clone(slider);
        let _ = slider.listen(
            "input",
            Rc::new(move || {
                if let Some(volume) = input.value().and_then(|v| v.trim().parse::<f64>().ok()) {
                    store.set_volume(volume);
                }
            }),
        );
    }

    let store = player.store.clone();
    let _ = document.on_keydown(Rc::new(move |key| {
        if key == "Escape" {
            store.collapse();
        }
    }));
}

fn subscribe_view(player: &Rc<RadioPlayer>, parts: &Rc<Parts>) {
    let store = &player.store;

    let (view, cells) = (Rc::clone(parts), store.clone());
    let _ = store.state.subscribe(move |&state| view.render_state(&cells, state));

    let view = Rc::clone(parts);
    let _ = store.expanded.subscribe(move |&expanded| view.render_expanded(expanded));

    let (view, cells, audio) = (Rc::clone(parts), store.clone(), Rc::clone(&player.audio));
    let _ = store.volume.subscribe(move |&volume| {
        audio.set_volume(cells.effective_volume());
        view.render_volume(&cells, volume);
    });

    let (view, cells, audio) = (Rc::clone(parts), store.clone(), Rc::clone(&player.audio));
    let _ = store.muted.subscribe(move |&muted| {
        view.root.set_attribute("data-radio-muted", &muted.to_string());
        audio.set_volume(cells.effective_volume());
    });

    let (view, cells) = (Rc::clone(parts), store.clone());
    let _ = store.title.subscribe(move |_| view.render_title(&cells));
}

//! Persistent radio player markup.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered once in the page shell and kept across navigations.
//! `util::radio_player` binds it to the `RadioStore`; the initial attribute
//! values here mirror the store defaults so the first paint matches.

#[cfg(test)]
#[path = "radio_player_test.rs"]
mod radio_player_test;

use leptos::prelude::*;

use crate::state::radio::{DEFAULT_VOLUME, IDLE_TITLE, RadioState};
use crate::util::dial_math::{dial_angle_from_level, rotate_transform};

/// Dial `style` for the default volume.
pub fn initial_dial_style() -> String {
    format!("transform: {}", rotate_transform(dial_angle_from_level(DEFAULT_VOLUME)))
}

#[component]
pub fn RadioPlayer(#[prop(into)] stream_url: String) -> impl IntoView {
    let idle = RadioState::default();
    view! {
        <div
            class="radio-player"
            data-radio-player=""
            data-stream-url=stream_url
            data-radio-state=idle.as_str()
            data-radio-expanded="false"
            data-radio-muted="false"
        >
            <audio data-radio-audio="" preload="none"></audio>
            <div class="radio-player__bar" data-radio-bar-clickable="">
                <button type="button" class="radio-player__play" data-radio-play="" aria-label=idle.play_label()></button>
                <span class="radio-player__title" data-radio-title="">{IDLE_TITLE}</span>
                <span class="radio-player__status" data-radio-status="">{idle.status_text()}</span>
                <button
                    type="button"
                    class="radio-player__expand"
                    data-radio-expand=""
                    aria-expanded="false"
                    aria-label="Show radio controls"
                ></button>
            </div>
            <div class="radio-player__drawer" data-radio-drawer="" aria-hidden="true">
                <span class="radio-player__cassette" data-radio-cassette-title="">{IDLE_TITLE.to_uppercase()}</span>
                <button type="button" class="radio-player__play" data-radio-play="" aria-label=idle.play_label()></button>
                <button type="button" class="radio-player__mute" data-radio-mute="" aria-label="Mute radio"></button>
                <input
                    type="range"
                    class="radio-player__volume"
                    data-radio-volume=""
                    min="0"
                    max="1"
                    step="0.01"
                    value=DEFAULT_VOLUME.to_string()
                    aria-label="Volume"
                />
                <svg class="radio-player__dial" viewBox="0 0 40 40" aria-hidden="true">
                    <circle cx="20" cy="20" r="18"></circle>
                    <line
                        data-radio-dial-indicator=""
                        x1="20"
                        y1="20"
                        x2="20"
                        y2="6"
                        style=initial_dial_style()
                    ></line>
                </svg>
            </div>
        </div>
    }
}

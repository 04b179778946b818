use std::rc::Rc;

use super::*;
use crate::host::Element;
use crate::host::memory::{MemoryAudio, MemoryEnv, MemoryNode};

struct Fixture {
    mem: MemoryEnv,
    store: RadioStore,
    root: Rc<MemoryNode>,
    audio: Rc<MemoryAudio>,
}

impl Fixture {
    fn node(&self, selector: &str) -> Rc<MemoryNode> {
        self.mem.document.node(selector).unwrap()
    }
}

fn build_player(mem: &MemoryEnv) -> Rc<MemoryNode> {
    let root = mem
        .document
        .body()
        .append(MemoryNode::new("div").with_attr("data-radio-player", "").with_attr("data-stream-url", "https://stream.example.com/live"));
    root.append(MemoryNode::new("audio").with_attr("data-radio-audio", ""));
    let bar = root.append(MemoryNode::new("div").with_attr("data-radio-bar-clickable", ""));
    bar.append(MemoryNode::new("button").with_attr("data-radio-play", "").with_attr("id", "bar-play"));
    bar.append(MemoryNode::new("span").with_attr("data-radio-title", ""));
    bar.append(MemoryNode::new("span").with_attr("data-radio-status", ""));
    bar.append(MemoryNode::new("button").with_attr("data-radio-expand", ""));
    let drawer = root.append(MemoryNode::new("div").with_attr("data-radio-drawer", ""));
    drawer.append(MemoryNode::new("button").with_attr("data-radio-play", "").with_attr("id", "drawer-play"));
    drawer.append(MemoryNode::new("button").with_attr("data-radio-mute", ""));
    drawer.append(MemoryNode::new("input").with_attr("data-radio-volume", ""));
    drawer.append(MemoryNode::new("line").with_attr("data-radio-dial-indicator", ""));
    drawer.append(MemoryNode::new("text").with_attr("data-radio-cassette-title", ""));
    root
}

fn setup() -> (Fixture, Rc<RadioPlayer>) {
    let mem = MemoryEnv::new();
    let root = build_player(&mem);
    let audio = mem.document.node("[data-radio-audio]").unwrap().memory_audio().unwrap();
    let store = RadioStore::new();
    let document = mem.env().document;
    let player = bind_radio_player(&document, &store).unwrap();
    (Fixture { mem, store, root, audio }, player)
}

// =============================================================================
// binding
// =============================================================================

#[test]
fn no_player_binds_nothing() {
    let mem = MemoryEnv::new();
    assert!(bind_radio_player(&mem.env().document, &RadioStore::new()).is_none());
}

#[test]
fn bound_player_is_not_bound_twice() {
    let (fx, _player) = setup();
    assert!(fx.root.has_attribute(BOUND_ATTR));
    assert!(bind_radio_player(&fx.mem.env().document, &fx.store).is_none());
    assert_eq!(fx.node("#bar-play").listener_count("click"), 1);
}

#[test]
fn player_without_stream_url_is_marked_but_unbound() {
    let mem = MemoryEnv::new();
    let root = mem.document.body().append(MemoryNode::new("div").with_attr("data-radio-player", ""));
    root.append(MemoryNode::new("audio").with_attr("data-radio-audio", ""));
    assert!(bind_radio_player(&mem.env().document, &RadioStore::new()).is_none());
    assert!(root.has_attribute(BOUND_ATTR));
}

#[test]
fn initial_render_reflects_store() {
    let (fx, _player) = setup();
    assert_eq!(fx.root.attribute("data-radio-state").as_deref(), Some("stopped"));
    assert_eq!(fx.root.attribute("data-radio-expanded").as_deref(), Some("false"));
    assert_eq!(fx.root.attribute("data-radio-muted").as_deref(), Some("false"));
    assert_eq!(fx.node("#bar-play").attribute("aria-label").as_deref(), Some("Play radio"));
    assert_eq!(fx.node("[data-radio-title]").text(), "Space Radio");
    assert_eq!(fx.node("[data-radio-cassette-title]").text(), "SPACE RADIO");
    assert_eq!(fx.node("[data-radio-status]").text(), "");
    assert_eq!(fx.node("[data-radio-drawer]").attribute("aria-hidden").as_deref(), Some("true"));
    assert_eq!(fx.node("[data-radio-volume]").value().as_deref(), Some("0.7"));
    assert_eq!(fx.node("[data-radio-dial-indicator]").style("transform").as_deref(), Some("rotate(54deg)"));
    assert!((fx.audio.volume() - 0.7).abs() < f64::EPSILON);
}

// =============================================================================
// playback
// =============================================================================

#[test]
fn play_click_connects_then_plays() {
    let (fx, _player) = setup();
    fx.node("#bar-play").click();
    assert_eq!(fx.store.state.get(), RadioState::Loading);
    assert_eq!(fx.audio.source().as_deref(), Some("https://stream.example.com/live"));
    assert!(fx.audio.is_playing());
    assert_eq!(fx.node("[data-radio-status]").text(), "Connecting...");
    assert_eq!(fx.node("[data-radio-title]").text(), "Trucks.FM");

    fx.audio.dispatch("playing");
    assert_eq!(fx.root.attribute("data-radio-state").as_deref(), Some("playing"));
    assert_eq!(fx.node("[data-radio-status]").text(), "Now playing");
    assert_eq!(fx.node("#drawer-play").attribute("aria-label").as_deref(), Some("Stop radio"));
}

#[test]
fn second_click_stops_and_releases_stream() {
    let (fx, _player) = setup();
    let play = fx.node("#drawer-play");
    play.click();
    fx.audio.dispatch("playing");
    let loads = fx.audio.loads();
    play.click();
    assert_eq!(fx.store.state.get(), RadioState::Stopped);
    assert!(!fx.audio.is_playing());
    assert!(fx.audio.source().is_none());
    assert_eq!(fx.audio.loads(), loads + 1);
    assert_eq!(fx.node("[data-radio-title]").text(), "Space Radio");
}

#[test]
fn rejected_play_sets_error() {
    let (fx, player) = setup();
    fx.audio.reject_play(true);
    player.play();
    assert_eq!(fx.store.state.get(), RadioState::Error);
    assert_eq!(fx.node("[data-radio-status]").text(), "Connection error");
}

#[test]
fn buffering_events_return_to_loading() {
    let (fx, player) = setup();
    player.play();
    fx.audio.dispatch("playing");
    fx.audio.dispatch("stalled");
    assert_eq!(fx.store.state.get(), RadioState::Loading);
    fx.audio.dispatch("playing");
    fx.audio.dispatch("waiting");
    assert_eq!(fx.store.state.get(), RadioState::Loading);
}

#[test]
fn audio_error_without_source_is_ignored() {
    let (fx, player) = setup();
    player.play();
    player.stop();
    fx.audio.dispatch("error");
    assert_eq!(fx.store.state.get(), RadioState::Stopped);

    player.play();
    fx.audio.dispatch("error");
    assert_eq!(fx.store.state.get(), RadioState::Error);
}

// =============================================================================
// drawer, volume, mute
// =============================================================================

#[test]
fn expand_and_escape_toggle_drawer() {
    let (fx, _player) = setup();
    fx.node("[data-radio-expand]").click();
    assert_eq!(fx.root.attribute("data-radio-expanded").as_deref(), Some("true"));
    assert_eq!(fx.node("[data-radio-expand]").attribute("aria-expanded").as_deref(), Some("true"));
    assert_eq!(fx.node("[data-radio-drawer]").attribute("aria-hidden").as_deref(), Some("false"));

    fx.mem.document.press_key("Enter");
    assert!(fx.store.expanded.get());
    fx.mem.document.press_key("Escape");
    assert!(!fx.store.expanded.get());
}

#[test]
fn bar_click_toggles_drawer() {
    let (fx, _player) = setup();
    fx.node("[data-radio-bar-clickable]").click();
    assert!(fx.store.expanded.get());
    fx.node("[data-radio-bar-clickable]").click();
    assert!(!fx.store.expanded.get());
}

#[test]
fn volume_input_updates_audio_dial_and_unmutes() {
    let (fx, _player) = setup();
    fx.node("[data-radio-mute]").click();
    assert_eq!(fx.root.attribute("data-radio-muted").as_deref(), Some("true"));
    assert!(fx.audio.volume().abs() < f64::EPSILON);

    let slider = fx.node("[data-radio-volume]");
    slider.set_value("0.5");
    slider.dispatch("input");
    assert!(!fx.store.muted.get());
    assert!((fx.audio.volume() - 0.5).abs() < f64::EPSILON);
    assert_eq!(fx.node("[data-radio-dial-indicator]").style("transform").as_deref(), Some("rotate(0deg)"));
}

#[test]
fn garbage_volume_input_is_ignored() {
    let (fx, _player) = setup();
    let slider = fx.node("[data-radio-volume]");
    slider.set_value("loud");
    slider.dispatch("input");
    assert!((fx.store.volume.get() - 0.7).abs() < f64::EPSILON);
}

#[test]
fn title_change_shows_only_while_active() {
    let (fx, player) = setup();
    fx.store.title.set("Night Shift".into());
    assert_eq!(fx.node("[data-radio-title]").text(), "Space Radio");
    player.play();
    assert_eq!(fx.node("[data-radio-cassette-title]").text(), "NIGHT SHIFT");
}

#[test]
fn navigation_marks_player_during_swap() {
    let (fx, _player) = setup();
    fx.mem.document.dispatch(BEFORE_SWAP);
    assert!(fx.root.has_attribute(NAVIGATING_ATTR));
    fx.mem.document.dispatch(AFTER_SWAP);
    assert!(!fx.root.has_attribute(NAVIGATING_ATTR));
}

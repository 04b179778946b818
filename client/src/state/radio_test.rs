use super::*;

// =============================================================
// RadioState
// =============================================================

#[test]
fn radio_state_strings() {
    assert_eq!(RadioState::Stopped.as_str(), "stopped");
    assert_eq!(RadioState::Loading.status_text(), "Connecting...");
    assert_eq!(RadioState::Playing.status_text(), "Now playing");
    assert_eq!(RadioState::Error.status_text(), "Connection error");
    assert_eq!(RadioState::Stopped.status_text(), "");
}

#[test]
fn play_label_follows_activity() {
    assert_eq!(RadioState::Playing.play_label(), "Stop radio");
    assert_eq!(RadioState::Loading.play_label(), "Stop radio");
    assert_eq!(RadioState::Stopped.play_label(), "Play radio");
    assert_eq!(RadioState::Error.play_label(), "Play radio");
}

// =============================================================
// RadioStore
// =============================================================

#[test]
fn store_defaults() {
    let store = RadioStore::new();
    assert_eq!(store.state.get(), RadioState::Stopped);
    assert!(!store.expanded.get());
    assert!((store.volume.get() - DEFAULT_VOLUME).abs() < f64::EPSILON);
    assert!(!store.muted.get());
    assert_eq!(store.title.get(), "Trucks.FM");
}

#[test]
fn set_volume_clamps_and_unmutes() {
    let store = RadioStore::new();
    store.toggle_mute();
    store.set_volume(1.4);
    assert!((store.volume.get() - 1.0).abs() < f64::EPSILON);
    assert!(!store.muted.get());
    store.set_volume(-0.2);
    assert!(store.volume.get().abs() < f64::EPSILON);
}

#[test]
fn set_volume_ignores_nan() {
    let store = RadioStore::new();
    store.set_volume(f64::NAN);
    assert!((store.volume.get() - DEFAULT_VOLUME).abs() < f64::EPSILON);
}

#[test]
fn effective_volume_is_zero_when_muted() {
    let store = RadioStore::new();
    store.toggle_mute();
    assert!(store.effective_volume().abs() < f64::EPSILON);
    store.toggle_mute();
    assert!((store.effective_volume() - DEFAULT_VOLUME).abs() < f64::EPSILON);
}

#[test]
fn collapse_only_reports_open_drawer() {
    let store = RadioStore::new();
    assert!(!store.collapse());
    store.toggle_expanded();
    assert!(store.collapse());
    assert!(!store.expanded.get());
}

#[test]
fn displayed_title_uses_station_only_while_active() {
    let store = RadioStore::new();
    assert_eq!(store.displayed_title(), IDLE_TITLE);
    store.state.set(RadioState::Loading);
    assert_eq!(store.displayed_title(), "Trucks.FM");
    store.state.set(RadioState::Error);
    assert_eq!(store.displayed_title(), IDLE_TITLE);
}

#[test]
fn dial_angle_tracks_volume() {
    let store = RadioStore::new();
    store.set_volume(0.0);
    assert!((store.dial_angle() + 135.0).abs() < f64::EPSILON);
    store.set_volume(1.0);
    assert!((store.dial_angle() - 135.0).abs() < f64::EPSILON);
}

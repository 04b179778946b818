use super::*;

#[test]
fn initial_dial_style_matches_default_volume() {
    assert_eq!(initial_dial_style(), "transform: rotate(54deg)");
}

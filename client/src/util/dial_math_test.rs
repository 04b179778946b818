use super::*;

#[test]
fn dial_angle_spans_full_sweep() {
    assert!((dial_angle_from_level(0.0) - DIAL_MIN_ANGLE_DEG).abs() < f64::EPSILON);
    assert!((dial_angle_from_level(1.0) - DIAL_MAX_ANGLE_DEG).abs() < f64::EPSILON);
    assert!(dial_angle_from_level(0.5).abs() < 1e-9);
}

#[test]
fn dial_angle_default_volume() {
    assert!((dial_angle_from_level(0.7) - 54.0).abs() < 1e-9);
}

#[test]
fn dial_angle_clamps_out_of_range() {
    assert!((dial_angle_from_level(2.0) - DIAL_MAX_ANGLE_DEG).abs() < f64::EPSILON);
    assert!((dial_angle_from_level(-1.0) - DIAL_MIN_ANGLE_DEG).abs() < f64::EPSILON);
    assert!((dial_angle_from_level(f64::NAN) - DIAL_MIN_ANGLE_DEG).abs() < f64::EPSILON);
}

#[test]
fn rotate_transform_formats_degrees() {
    assert_eq!(rotate_transform(-135.0), "rotate(-135deg)");
    assert_eq!(rotate_transform(54.0), "rotate(54deg)");
    assert_eq!(rotate_transform(13.5), "rotate(13.5deg)");
}

use super::*;

#[test]
fn empty_status_serializes_without_max_reached() {
    let json = serde_json::to_value(LikeStatus::empty()).unwrap();
    assert_eq!(json, serde_json::json!({"count": 0, "userLikes": 0, "maxLikes": 16}));
}

#[test]
fn capped_status_serializes_max_reached_flag() {
    let status = LikeStatus { count: 40, user_likes: 16, max_likes: 16, max_reached: true };
    let json = serde_json::to_value(status).unwrap();
    assert_eq!(json["maxReached"], serde_json::json!(true));
    assert_eq!(json["userLikes"], serde_json::json!(16));
}

#[test]
fn decode_status_defaults_optional_fields() {
    let status = decode_status(r#"{"count":3,"userLikes":1}"#).unwrap();
    assert_eq!(status.count, 3);
    assert_eq!(status.user_likes, 1);
    assert_eq!(status.max_likes, MAX_LIKES_PER_USER);
    assert!(!status.max_reached);
}

#[test]
fn decode_status_rejects_non_object() {
    assert!(decode_status("[1,2]").is_err());
}

#[test]
fn at_cap_compares_against_max_likes() {
    let mut status = LikeStatus::empty();
    status.user_likes = 15;
    assert!(!status.at_cap());
    status.user_likes = 16;
    assert!(status.at_cap());
}

#[test]
fn like_request_missing_slug_is_none() {
    let req: LikeRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(req.slug, None);
}

#[test]
fn normalize_slug_drops_only_empty_values() {
    assert_eq!(normalize_slug(None), None);
    assert_eq!(normalize_slug(Some("")), None);
    assert_eq!(normalize_slug(Some("hello-world")), Some("hello-world"));
    assert_eq!(normalize_slug(Some(" hello-world ")), Some(" hello-world "));
}

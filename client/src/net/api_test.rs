use super::*;

#[test]
fn like_status_endpoint_encodes_slug() {
    assert_eq!(like_status_endpoint("hello-world"), "/api/like?slug=hello-world");
    assert_eq!(like_status_endpoint("a b/c"), "/api/like?slug=a%20b%2Fc");
}

#[test]
fn status_error_names_code() {
    assert_eq!(ApiError::Status(500).to_string(), "like request failed: 500");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn native_http_api_is_unavailable() {
    let api = HttpLikeApi;
    let result = futures::executor::block_on(api.fetch_status("post"));
    assert!(matches!(result, Err(ApiError::Unavailable)));
}

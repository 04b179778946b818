use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u16 = env_parse("__TEST_SPACERAD_MISSING_KEY__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__TEST_SPACERAD_EP_VALID__", "8080") };
    let val: u16 = env_parse("__TEST_SPACERAD_EP_VALID__", 0);
    assert_eq!(val, 8080);
    unsafe { std::env::remove_var("__TEST_SPACERAD_EP_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__TEST_SPACERAD_EP_INVALID__", "eighty") };
    let val: u16 = env_parse("__TEST_SPACERAD_EP_INVALID__", 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var("__TEST_SPACERAD_EP_INVALID__") };
}

// =============================================================================
// parse_backend
// =============================================================================

#[test]
fn backend_unset_without_credentials_is_disabled() {
    let kv = parse_backend(None, None, None, 10).unwrap();
    assert_eq!(kv, KvBackend::Disabled);
}

#[test]
fn backend_unset_with_partial_credentials_is_disabled() {
    let kv = parse_backend(None, Some("https://kv.example".into()), None, 10).unwrap();
    assert_eq!(kv, KvBackend::Disabled);
}

#[test]
fn backend_unset_with_credentials_selects_rest() {
    let kv = parse_backend(None, Some("https://kv.example/".into()), Some("tok".into()), 5).unwrap();
    assert_eq!(kv, KvBackend::Rest { url: "https://kv.example".into(), token: "tok".into(), timeout_secs: 5 });
}

#[test]
fn backend_memory_is_case_insensitive() {
    assert_eq!(parse_backend(Some("Memory"), None, None, 10).unwrap(), KvBackend::Memory);
}

#[test]
fn backend_rest_without_url_errors() {
    let err = parse_backend(Some("rest"), None, Some("tok".into()), 10).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRestVar { var: "KV_REST_API_URL" }));
}

#[test]
fn backend_rest_without_token_errors() {
    let err = parse_backend(Some("rest"), Some("https://kv.example".into()), None, 10).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRestVar { var: "KV_REST_API_TOKEN" }));
}

#[test]
fn backend_unknown_name_errors() {
    let err = parse_backend(Some("redis"), None, None, 10).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownBackend(ref name) if name == "redis"));
}

#[test]
fn backend_explicit_off_is_disabled() {
    assert_eq!(parse_backend(Some("off"), Some("u".into()), Some("t".into()), 10).unwrap(), KvBackend::Disabled);
}

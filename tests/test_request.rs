use pipeline_server::http::request::{ControlHeaders, REQUEST_HEADER, SLEEP_HEADER};

#[test]
fn test_control_headers_default_to_zero() {
    let c = ControlHeaders::default();

    assert_eq!(c.sleep_ms, 0);
    assert_eq!(c.request_id, 0);
    assert!(!c.is_delayed());
}

#[test]
fn test_control_headers_apply_sleep_and_request() {
    let mut c = ControlHeaders::default();

    assert!(c.apply(SLEEP_HEADER, "1000"));
    assert!(c.apply(REQUEST_HEADER, "42"));
    assert_eq!(c.sleep_ms, 1000);
    assert_eq!(c.request_id, 42);
    assert!(c.is_delayed());
}

#[test]
fn test_control_headers_ignore_other_keys() {
    let mut c = ControlHeaders::default();

    assert!(!c.apply("Host", "localhost"));
    assert!(!c.apply("X-Disconnect", "yes"));
    assert_eq!(c, ControlHeaders::default());
}

#[test]
fn test_control_headers_keys_are_case_sensitive() {
    let mut c = ControlHeaders::default();

    assert!(!c.apply("x-sleep", "10"));
    assert_eq!(c.sleep_ms, 0);
}

#[test]
fn test_control_headers_invalid_value_is_zero() {
    let mut c = ControlHeaders {
        sleep_ms: 5,
        request_id: 5,
    };

    c.apply(SLEEP_HEADER, "soon");
    c.apply(REQUEST_HEADER, "-3");
    assert_eq!(c.sleep_ms, 0);
    assert_eq!(c.request_id, 0);
}

#[test]
fn test_control_headers_value_whitespace_trimmed() {
    let mut c = ControlHeaders::default();

    c.apply(REQUEST_HEADER, " 17 ");
    assert_eq!(c.request_id, 17);
}

#[test]
fn test_control_headers_leading_digits_are_used() {
    let mut c = ControlHeaders::default();

    c.apply(SLEEP_HEADER, "12abc");
    c.apply(REQUEST_HEADER, "7 trailing");
    assert_eq!(c.sleep_ms, 12);
    assert_eq!(c.request_id, 7);
}

#[test]
fn test_control_headers_overflow_saturates() {
    let mut c = ControlHeaders::default();

    c.apply(REQUEST_HEADER, "99999999999999999999999");
    assert_eq!(c.request_id, u64::MAX);
}

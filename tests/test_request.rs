mod common;

use s3lite::http::request::{CONTENT_TYPE, Method, RequestBuilder, RequestHead, http_date};
use s3lite::signing;

use common::{ACCESS_KEY, SECRET_KEY, credentials, fixed_time};

#[test]
fn test_http_date_format() {
    assert_eq!(http_date(fixed_time()), "Sun, 06 Nov 1994 08:49:37 GMT");
}

#[test]
fn test_method_names() {
    assert_eq!(Method::GET.as_str(), "GET");
    assert_eq!(Method::PUT.as_str(), "PUT");
}

#[test]
fn test_get_request_head_layout() {
    let head = RequestBuilder::new(Method::GET, "storage.local", "/bucket/key")
        .date(fixed_time())
        .sign(&credentials());

    let names: Vec<&str> = head.headers.iter().map(|(k, _)| *k).collect();
    assert_eq!(names, ["Host", "Content-Type", "Date", "Authorization"]);

    let encoded = head.encode();
    let text = std::str::from_utf8(&encoded).unwrap();
    assert!(text.starts_with("GET /bucket/key HTTP/1.1\r\n"));
    assert!(text.contains("\r\nHost: storage.local\r\n"));
    assert!(text.contains("\r\nContent-Type: application/octet-stream\r\n"));
    assert!(text.contains("\r\nDate: Sun, 06 Nov 1994 08:49:37 GMT\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
    assert!(!text.contains("Content-Length"));
}

#[test]
fn test_put_request_carries_content_length() {
    let head = RequestBuilder::new(Method::PUT, "storage.local", "/bucket/key")
        .date(fixed_time())
        .content_length(Some(1234))
        .sign(&credentials());

    assert_eq!(head.header("content-length"), Some("1234"));
    assert_eq!(head.headers.last().map(|(k, _)| *k), Some("Content-Length"));
    assert!(head.encode().starts_with(b"PUT /bucket/key HTTP/1.1\r\n"));
}

#[test]
fn test_authorization_matches_recomputed_signature() {
    let head = RequestBuilder::new(Method::PUT, "storage.local", "/bucket/key?x=1")
        .date(fixed_time())
        .content_length(Some(3))
        .sign(&credentials());

    let to_sign = format!(
        "PUT\n\n{CONTENT_TYPE}\nSun, 06 Nov 1994 08:49:37 GMT\n/bucket/key?x=1"
    );
    let expected = signing::sign(SECRET_KEY.as_bytes(), to_sign.as_bytes());

    assert_eq!(
        head.header("Authorization"),
        Some(format!("AWS {ACCESS_KEY}:{expected}").as_str())
    );
}

#[test]
fn test_signature_depends_on_method_and_date() {
    let sign = |method, secs| -> RequestHead {
        RequestBuilder::new(method, "h", "/p")
            .date(std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs))
            .sign(&credentials())
    };

    let a = sign(Method::GET, 1_000_000_000);
    let b = sign(Method::PUT, 1_000_000_000);
    let c = sign(Method::GET, 1_000_000_001);

    assert_ne!(a.header("Authorization"), b.header("Authorization"));
    assert_ne!(a.header("Authorization"), c.header("Authorization"));
}

#[test]
fn test_header_lookup_is_case_insensitive() {
    let head = RequestBuilder::new(Method::GET, "h", "/p")
        .date(fixed_time())
        .sign(&credentials());

    assert_eq!(head.header("HOST"), Some("h"));
    assert_eq!(head.header("x-missing"), None);
}

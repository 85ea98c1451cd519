//! Header filtering for both directions of the exchange.
//!
//! # Responsibilities
//! - Drop `Host` so the outbound transport sets it for the backend
//! - Drop `Content-Type`/`Content-Length` on multipart requests (the
//!   re-encoded form gets a new boundary and length)
//! - Strip hop-by-hop headers in both directions

use axum::http::{
    header::{self, HeaderName},
    HeaderMap,
};

use crate::proxy::content::RequestEncoding;

/// Headers that describe a single connection rather than the message.
pub const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
}

/// Headers to send to the backend.
///
/// `carries_body` is false for methods that never forward a body; their
/// `Content-Length` is dropped with the body.
pub fn filter_request_headers(
    headers: &HeaderMap,
    encoding: RequestEncoding,
    carries_body: bool,
) -> HeaderMap {
    let regenerated = encoding == RequestEncoding::Multipart || !carries_body;

    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if name == header::HOST || is_hop_by_hop(name) {
            continue;
        }
        if name == header::CONTENT_LENGTH && regenerated {
            continue;
        }
        if name == header::CONTENT_TYPE && encoding == RequestEncoding::Multipart {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Headers to relay to the caller. The relayed body may be re-serialised,
/// so the server recomputes its framing.
pub fn filter_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if name == header::CONTENT_LENGTH || is_hop_by_hop(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn inbound(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("files.example.com"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("512"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.append("x-trace", HeaderValue::from_static("a"));
        headers.append("x-trace", HeaderValue::from_static("b"));
        headers
    }

    #[test]
    fn test_host_always_dropped() {
        for encoding in [RequestEncoding::Json, RequestEncoding::Binary, RequestEncoding::Multipart] {
            let out = filter_request_headers(&inbound("application/json"), encoding, true);
            assert!(out.get(header::HOST).is_none(), "{:?}", encoding);
            assert!(out.get(header::CONNECTION).is_none(), "{:?}", encoding);
        }
    }

    #[test]
    fn test_multipart_drops_framing_headers() {
        let headers = inbound("multipart/form-data; boundary=xyz");
        let out = filter_request_headers(&headers, RequestEncoding::Multipart, true);
        assert!(out.get(header::CONTENT_TYPE).is_none());
        assert!(out.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(out.get(header::AUTHORIZATION).unwrap(), "Bearer t");
    }

    #[test]
    fn test_json_keeps_framing_headers() {
        let out = filter_request_headers(&inbound("application/json"), RequestEncoding::Json, true);
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(out.get(header::CONTENT_LENGTH).unwrap(), "512");
    }

    #[test]
    fn test_bodyless_drops_content_length() {
        let out = filter_request_headers(&inbound("application/json"), RequestEncoding::Json, false);
        assert!(out.get(header::CONTENT_LENGTH).is_none());
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_repeated_headers_preserved() {
        let out = filter_request_headers(&inbound("text/plain"), RequestEncoding::Binary, true);
        let values: Vec<_> = out.get_all("x-trace").iter().collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_response_filter() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("10"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));

        let out = filter_response_headers(&headers);
        assert_eq!(out.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert!(out.get(header::CONTENT_LENGTH).is_none());
        assert!(out.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(out.get_all(header::SET_COOKIE).iter().count(), 2);
    }
}

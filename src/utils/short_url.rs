//! Public short URL construction.

use crate::AppError;
use axum::http::{HeaderMap, header};
use serde_json::json;

/// Builds the public URL for a short code.
///
/// With a configured `base_url` the code is appended to it. Otherwise the
/// request's `Host` header (port included) is used with the `http` scheme,
/// which is what clients hitting the service directly expect.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if no base URL is configured and the
/// `Host` header is missing or not valid UTF-8.
///
/// # Examples
///
/// ```ignore
/// let url = build_short_url(Some("https://s.example.com/"), &headers, "abc123")?;
/// assert_eq!(url, "https://s.example.com/abc123");
/// ```
pub fn build_short_url(
    base_url: Option<&str>,
    headers: &HeaderMap,
    short_code: &str,
) -> Result<String, AppError> {
    if let Some(base) = base_url {
        return Ok(format!("{}/{}", base.trim_end_matches('/'), short_code));
    }

    let host = request_host(headers)?;
    Ok(format!("http://{}/{}", host, short_code))
}

/// Extracts the `Host` header value, port included.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the header is missing, empty or
/// contains invalid UTF-8.
pub fn request_host(headers: &HeaderMap) -> Result<&str, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?
        .trim();

    if host.is_empty() {
        return Err(AppError::bad_request("Missing Host header", json!({})));
    }

    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_host(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    #[test]
    fn test_base_url_takes_priority() {
        let headers = headers_with_host("internal:3000");
        let url = build_short_url(Some("https://s.example.com"), &headers, "abc123").unwrap();
        assert_eq!(url, "https://s.example.com/abc123");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let url = build_short_url(Some("https://s.example.com/"), &HeaderMap::new(), "x").unwrap();
        assert_eq!(url, "https://s.example.com/x");
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let url = build_short_url(Some("https://example.com/go/"), &HeaderMap::new(), "x").unwrap();
        assert_eq!(url, "https://example.com/go/x");
    }

    #[test]
    fn test_host_header_fallback_keeps_port() {
        let headers = headers_with_host("localhost:8080");
        let url = build_short_url(None, &headers, "abc123").unwrap();
        assert_eq!(url, "http://localhost:8080/abc123");
    }

    #[test]
    fn test_host_header_ipv6() {
        let headers = headers_with_host("[::1]:3000");
        assert_eq!(request_host(&headers).unwrap(), "[::1]:3000");
    }

    #[test]
    fn test_missing_host_header() {
        let result = build_short_url(None, &HeaderMap::new(), "abc123");
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_invalid_utf8_host_header() {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_bytes(&[0xFF, 0xFE, 0xFD]) {
            headers.insert(header::HOST, value);
            assert!(request_host(&headers).is_err());
        }
    }
}

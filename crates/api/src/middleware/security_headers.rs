//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Middleware that adds security headers to all responses.
///
/// Headers added:
/// - `X-Content-Type-Options: nosniff` - Prevents MIME type sniffing
/// - `X-Frame-Options: DENY` - Disallows framing
/// - `Strict-Transport-Security` - Enforces HTTPS, only when
///   `ATELIER__SECURITY__HSTS_ENABLED=true` (requires TLS termination
///   upstream).
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );

    headers.insert(
        header::HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );

    if std::env::var("ATELIER__SECURITY__HSTS_ENABLED")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
    {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_header_values_are_valid() {
        assert!(HeaderValue::from_static("nosniff").to_str().is_ok());
        assert!(HeaderValue::from_static("DENY").to_str().is_ok());
        assert!(
            HeaderValue::from_static("max-age=31536000; includeSubDomains")
                .to_str()
                .is_ok()
        );
    }

    #[test]
    fn test_hsts_env_parsing_not_set() {
        let result = std::env::var("ATELIER__SECURITY__HSTS_ENABLED_NONEXISTENT")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        assert!(!result);
    }

    #[test]
    fn test_hsts_env_parsing_logic() {
        for (input, expected) in [("true", true), ("TRUE", true), ("false", false), ("1", false)] {
            assert_eq!(input.to_lowercase() == "true", expected);
        }
    }
}

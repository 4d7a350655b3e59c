//! Client IP resolution.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolve the client IP for a request.
///
/// Prefers the first entry of `X-Forwarded-For` when it parses as an IP
/// (the usual case behind a reverse proxy), otherwise falls back to the
/// peer address of the connection.
#[must_use]
pub fn client_ip(headers: &HeaderMap, remote_addr: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| remote_addr.ip())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn remote() -> SocketAddr {
        "198.51.100.7:40022".parse().unwrap()
    }

    #[test]
    fn test_uses_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(
            client_ip(&headers, remote()),
            "203.0.113.9".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        assert_eq!(
            client_ip(&HeaderMap::new(), remote()),
            "198.51.100.7".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_unparseable_header_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        assert_eq!(
            client_ip(&headers, remote()),
            "198.51.100.7".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_ipv6_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("2001:db8::1"));
        assert_eq!(
            client_ip(&headers, remote()),
            "2001:db8::1".parse::<IpAddr>().unwrap()
        );
    }
}

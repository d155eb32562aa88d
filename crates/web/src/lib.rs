use std::net::{IpAddr, SocketAddr};

use http::HeaderMap;

pub mod response;

/// Pick the client address for a request.
///
/// The first entry of `X-Forwarded-For` wins, the transport peer address is
/// the fallback. The forwarded entry is returned as-is: proxies occasionally
/// insert values that are not valid addresses, and it is up to the caller to
/// decide what to do with those.
#[must_use]
pub fn get_request_ip(headers: &HeaderMap, addr: &SocketAddr) -> String {
    let x_forwarded_for = headers
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|s| s.split(',').next().map(str::trim))
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    tracing::debug!(?x_forwarded_for, ip_address = ?addr.ip());

    x_forwarded_for.unwrap_or_else(|| addr.ip().to_string())
}

/// Strip the IPv4-mapped IPv6 prefix when present.
///
/// `::ffff:203.0.113.5` becomes `203.0.113.5`. Everything else is returned
/// untouched, including strings that do not parse as an address at all.
#[must_use]
pub fn strip_ipv4_mapped(ip: &str) -> String {
    if let Ok(IpAddr::V6(address)) = ip.parse::<IpAddr>() {
        if let Some(mapped) = address.to_ipv4_mapped() {
            return mapped.to_string();
        }
    }

    ip.to_string()
}

/// Whether `ip` refers to the local host itself.
///
/// Matches `::1` exactly plus the plain and IPv4-mapped loopback prefixes.
#[must_use]
pub fn is_loopback(ip: &str) -> bool {
    ip == "::1" || ip.starts_with("127.") || ip.starts_with("::ffff:127.")
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use http::{HeaderMap, HeaderValue};

    use crate::{get_request_ip, is_loopback, strip_ipv4_mapped};

    fn peer() -> SocketAddr { "203.0.113.20:443".parse().expect("valid socket address") }

    #[test]
    fn forwarded_header_first_entry_wins() {
        let mut headers = HeaderMap::new();
        let _unused = headers.insert("X-Forwarded-For", HeaderValue::from_static("a, b, c"));

        assert_eq!(get_request_ip(&headers, &peer()), "a");
    }

    #[test]
    fn forwarded_header_entry_is_trimmed() {
        let mut headers = HeaderMap::new();
        let _unused = headers.insert("X-Forwarded-For", HeaderValue::from_static("  8.8.8.8 , 1.1.1.1"));

        assert_eq!(get_request_ip(&headers, &peer()), "8.8.8.8");
    }

    #[test]
    fn missing_forwarded_header_falls_back_to_peer() {
        assert_eq!(get_request_ip(&HeaderMap::new(), &peer()), "203.0.113.20");
    }

    #[test]
    fn empty_forwarded_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        let _unused = headers.insert("X-Forwarded-For", HeaderValue::from_static(""));

        assert_eq!(get_request_ip(&headers, &peer()), "203.0.113.20");
    }

    #[test]
    fn mapped_prefix_is_stripped() {
        assert_eq!(strip_ipv4_mapped("::ffff:203.0.113.5"), "203.0.113.5");
    }

    #[test]
    fn plain_addresses_are_untouched() {
        assert_eq!(strip_ipv4_mapped("203.0.113.5"), "203.0.113.5");
        assert_eq!(strip_ipv4_mapped("::1"), "::1");
        assert_eq!(strip_ipv4_mapped("2001:db8::1"), "2001:db8::1");
    }

    #[test]
    fn unparseable_input_is_untouched() {
        assert_eq!(strip_ipv4_mapped("not-an-address"), "not-an-address");
    }

    #[test]
    fn loopback_forms_are_detected() {
        assert!(is_loopback("::1"));
        assert!(is_loopback("127.0.0.1"));
        assert!(is_loopback("127.1.2.3"));
        assert!(is_loopback("::ffff:127.0.0.1"));

        assert!(!is_loopback("203.0.113.5"));
        assert!(!is_loopback("::2"));
        assert!(!is_loopback("128.0.0.1"));
    }
}

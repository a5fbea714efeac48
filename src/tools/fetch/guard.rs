//! SSRF guard: refuse to fetch anything that resolves into private or
//! loopback address space, before any network call is made.

use crate::error::{ProdexError, Result};
use std::net::{Ipv4Addr, Ipv6Addr};
use url::Url;

/// True when a hostname should never be fetched: localhost aliases,
/// `.local`/`.localhost` suffixes, and IPv4/IPv6 literals in
/// loopback/private/link-local ranges.
pub fn is_likely_dangerous_host(host: &str) -> bool {
    let lowered = host.trim().trim_end_matches('.').to_ascii_lowercase();
    // Punycode unicode hosts so `locälhost`-style spoofs normalize.
    let ascii = idna::domain_to_ascii(&lowered).unwrap_or(lowered);

    if ascii == "localhost" || ascii.ends_with(".localhost") || ascii.ends_with(".local") {
        return true;
    }

    if let Ok(v4) = ascii.parse::<Ipv4Addr>() {
        return is_dangerous_v4(v4);
    }

    let bare = ascii.trim_start_matches('[').trim_end_matches(']');
    if let Ok(v6) = bare.parse::<Ipv6Addr>() {
        return is_dangerous_v6(v6);
    }

    false
}

fn is_dangerous_v4(addr: Ipv4Addr) -> bool {
    addr.is_loopback()
        || addr.is_private()
        || addr.is_link_local()
        || addr.is_unspecified()
        || addr.is_broadcast()
}

fn is_dangerous_v6(addr: Ipv6Addr) -> bool {
    if addr.is_loopback() || addr.is_unspecified() {
        return true;
    }
    let segments = addr.segments();
    // Unique-local fc00::/7 and link-local fe80::/10.
    if (segments[0] & 0xfe00) == 0xfc00 || (segments[0] & 0xffc0) == 0xfe80 {
        return true;
    }
    // IPv4-mapped (::ffff:a.b.c.d) falls back to the IPv4 rules.
    if segments[..5] == [0, 0, 0, 0, 0] && segments[5] == 0xffff {
        let v4 = Ipv4Addr::new(
            (segments[6] >> 8) as u8,
            (segments[6] & 0xff) as u8,
            (segments[7] >> 8) as u8,
            (segments[7] & 0xff) as u8,
        );
        return is_dangerous_v4(v4);
    }
    false
}

/// Parse and validate a target URL: http(s) scheme, a host present, and,
/// when the guard is enabled, a host outside the blocked ranges.
pub fn parse_target_url(raw: &str, guard_enabled: bool) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| ProdexError::InvalidUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProdexError::InvalidUrl(raw.to_string()));
    }
    let host = url
        .host_str()
        .ok_or_else(|| ProdexError::InvalidUrl(raw.to_string()))?;
    if guard_enabled && is_likely_dangerous_host(host) {
        return Err(ProdexError::BlockedHost(host.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_and_private_ranges_are_blocked() {
        assert!(is_likely_dangerous_host("127.0.0.1"));
        assert!(is_likely_dangerous_host("10.0.12.7"));
        assert!(is_likely_dangerous_host("172.16.0.1"));
        assert!(is_likely_dangerous_host("192.168.1.50"));
        assert!(is_likely_dangerous_host("169.254.0.9"));
        assert!(is_likely_dangerous_host("0.0.0.0"));
    }

    #[test]
    fn localhost_aliases_are_blocked() {
        assert!(is_likely_dangerous_host("localhost"));
        assert!(is_likely_dangerous_host("LOCALHOST"));
        assert!(is_likely_dangerous_host("api.localhost"));
        assert!(is_likely_dangerous_host("printer.local"));
    }

    #[test]
    fn ipv6_private_space_is_blocked() {
        assert!(is_likely_dangerous_host("::1"));
        assert!(is_likely_dangerous_host("[::1]"));
        assert!(is_likely_dangerous_host("fc00::1"));
        assert!(is_likely_dangerous_host("fe80::1"));
        assert!(is_likely_dangerous_host("::ffff:127.0.0.1"));
    }

    #[test]
    fn public_hosts_pass() {
        assert!(!is_likely_dangerous_host("example.com"));
        assert!(!is_likely_dangerous_host("shop.example.co.uk"));
        assert!(!is_likely_dangerous_host("8.8.8.8"));
        assert!(!is_likely_dangerous_host("2001:4860:4860::8888"));
    }

    #[test]
    fn parse_target_rejects_bad_input() {
        assert!(matches!(
            parse_target_url("not a url", true),
            Err(ProdexError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_target_url("ftp://example.com/x", true),
            Err(ProdexError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_target_url("http://127.0.0.1/admin", true),
            Err(ProdexError::BlockedHost(_))
        ));
    }

    #[test]
    fn guard_toggle_allows_private_hosts_when_off() {
        assert!(parse_target_url("http://127.0.0.1/dev", false).is_ok());
    }
}

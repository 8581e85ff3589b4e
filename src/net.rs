//! Locality detection (spec.md §4.4): resolves whether a configured
//! server address is this host, without blocking the connection attempt
//! on the answer.

use std::net::IpAddr;

/// True if `address` is an exact loopback literal, matches one of this
/// host's interface addresses, or equals the host's own hostname.
///
/// Interface enumeration and hostname lookup are both blocking syscalls,
/// so callers should run this off the async runtime (`spawn_blocking`).
pub fn is_local_address(address: &str) -> bool {
    if let Ok(ip) = address.parse::<IpAddr>() {
        if ip.is_loopback() {
            return true;
        }
        return local_ip_address::list_afinet_netifas()
            .map(|interfaces| interfaces.iter().any(|(_, addr)| *addr == ip))
            .unwrap_or(false);
    }

    gethostname::gethostname()
        .to_str()
        .map(|hostname| hostname.eq_ignore_ascii_case(address))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_loopback_is_local() {
        assert!(is_local_address("127.0.0.1"));
    }

    #[test]
    fn ipv6_loopback_is_local() {
        assert!(is_local_address("::1"));
    }

    #[test]
    fn unrelated_remote_ip_is_not_local() {
        assert!(!is_local_address("203.0.113.5"));
    }
}

//! Tracker site derivation: a pluggable pure function standing in for a
//! public-suffix-list lookup (spec.md §1 Non-goals, §3 "Tracker").
//!
//! Real registrable-domain lookups require an up-to-date public suffix
//! list; that data source is explicitly out of scope here, so this uses
//! the same last-two-labels heuristic as [`TrackerIdentifier`] in
//! `examples/Lynthar-Graft/src/site/tracker.rs`, generalized from a fixed
//! site table to "just return the computed domain".

use url::Url;

/// Derive the `site` for a tracker's `announce` URL (spec.md §8 invariant 8):
/// the host itself when it's an IP literal, otherwise the registrable
/// domain (last two dot-separated labels), falling back to the full host
/// when it has fewer than two labels.
pub fn derive_site(announce: &str) -> String {
    let Ok(url) = Url::parse(announce) else {
        return announce.to_string();
    };
    let Some(host) = url.host_str() else {
        return announce.to_string();
    };

    if url.host().is_some_and(|h| matches!(h, url::Host::Ipv4(_) | url::Host::Ipv6(_))) {
        return host.to_string();
    }

    registrable_domain(host)
}

fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        host.to_string()
    } else {
        labels[labels.len() - 2..].join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_literal_host_used_as_is() {
        assert_eq!(derive_site("http://192.168.1.5:8080/announce"), "192.168.1.5");
    }

    #[test]
    fn ipv6_literal_host_used_as_is() {
        assert_eq!(derive_site("http://[::1]:8080/announce"), "::1");
    }

    #[test]
    fn subdomain_collapses_to_registrable_domain() {
        assert_eq!(derive_site("https://tracker.example.com/announce"), "example.com");
    }

    #[test]
    fn bare_domain_unchanged() {
        assert_eq!(derive_site("https://example.com/announce"), "example.com");
    }

    #[test]
    fn unparsable_url_falls_back_to_raw_string() {
        assert_eq!(derive_site("not a url"), "not a url");
    }
}

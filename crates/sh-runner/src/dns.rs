//! Reverse DNS display names
//!
//! Targets whose host is an IP literal get a reverse-resolved name for
//! display and matching. Results are cached per reload, failures included.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

/// Reverse name lookup
pub trait ReverseResolver: Send + Sync {
    /// Name for `addr`, or `None` when the lookup fails
    fn reverse_lookup(&self, addr: IpAddr) -> Option<String>;
}

/// Resolver backed by the system `getnameinfo`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl ReverseResolver for SystemResolver {
    fn reverse_lookup(&self, addr: IpAddr) -> Option<String> {
        match dns_lookup::lookup_addr(&addr) {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!("Reverse lookup for {} failed: {}", addr, e);
                None
            }
        }
    }
}

/// Extract an IP literal from a host string.
///
/// Accepts `user@`, `[addr]`, `%zone` and trailing-dot decorations, and an
/// IPv4 `addr:port` form. Returns the normalized literal and its address.
pub fn ip_literal(host: &str) -> Option<(String, IpAddr)> {
    let mut candidate = host.trim();

    if let Some(at) = candidate.rfind('@') {
        candidate = &candidate[at + 1..];
    }
    if candidate.starts_with('[') {
        if let Some(end) = candidate.find(']') {
            if end > 1 {
                candidate = &candidate[1..end];
            }
        }
    }
    if let Some(percent) = candidate.find('%') {
        if percent > 0 {
            candidate = &candidate[..percent];
        }
    }
    if let Some(stripped) = candidate.strip_suffix('.') {
        candidate = stripped;
    }

    if let Ok(addr) = candidate.parse::<IpAddr>() {
        return Some((candidate.to_string(), addr));
    }

    if candidate.matches(':').count() == 1 && candidate.contains('.') {
        let (address, _port) = candidate.split_once(':')?;
        if let Ok(addr) = address.parse::<IpAddr>() {
            return Some((address.to_string(), addr));
        }
    }

    None
}

/// Positive and negative reverse lookup cache
#[derive(Debug, Default)]
pub struct DnsCache {
    names: HashMap<String, String>,
    failures: HashSet<String>,
}

impl DnsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cached answer and failure
    pub fn clear(&mut self) {
        self.names.clear();
        self.failures.clear();
    }

    /// Display name for `host`, or an empty string
    pub fn resolve(&mut self, host: &str, resolver: &dyn ReverseResolver) -> String {
        let Some((literal, addr)) = ip_literal(host) else {
            return String::new();
        };

        if let Some(name) = self.names.get(&literal) {
            return name.clone();
        }
        if self.failures.contains(&literal) {
            return String::new();
        }

        let name = resolver
            .reverse_lookup(addr)
            .map(|answer| {
                let answer = answer.trim();
                answer.strip_suffix('.').unwrap_or(answer).to_string()
            })
            .unwrap_or_default();

        // getnameinfo echoes the address back when no PTR record exists
        if name.is_empty() || name == literal || name.parse::<IpAddr>().is_ok() {
            self.failures.insert(literal);
            return String::new();
        }

        self.names.insert(literal, name.clone());
        name
    }

    /// Number of cached answers, positive and negative
    pub fn len(&self) -> usize {
        self.names.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedResolver {
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedResolver {
        fn new(answer: Option<&'static str>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ReverseResolver for FixedResolver {
        fn reverse_lookup(&self, _addr: IpAddr) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.map(str::to_string)
        }
    }

    #[test]
    fn test_ip_literal_forms() {
        assert_eq!(ip_literal("10.0.0.1").map(|l| l.0), Some("10.0.0.1".into()));
        assert_eq!(ip_literal(" root@10.0.0.1 ").map(|l| l.0), Some("10.0.0.1".into()));
        assert_eq!(ip_literal("[fe80::1%eth0]").map(|l| l.0), Some("fe80::1".into()));
        assert_eq!(ip_literal("fe80::1%eth0").map(|l| l.0), Some("fe80::1".into()));
        assert_eq!(ip_literal("10.0.0.1:2222").map(|l| l.0), Some("10.0.0.1".into()));
        assert_eq!(ip_literal("10.0.0.1.").map(|l| l.0), Some("10.0.0.1".into()));
        assert_eq!(ip_literal("::1").map(|l| l.0), Some("::1".into()));
    }

    #[test]
    fn test_hostnames_are_not_literals() {
        assert!(ip_literal("example.com").is_none());
        assert!(ip_literal("box:22").is_none());
        assert!(ip_literal("").is_none());
    }

    #[test]
    fn test_resolve_caches_answers() {
        let resolver = FixedResolver::new(Some("box.lan."));
        let mut cache = DnsCache::new();

        assert_eq!(cache.resolve("10.0.0.1", &resolver), "box.lan");
        assert_eq!(cache.resolve("admin@10.0.0.1", &resolver), "box.lan");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_echoed_address_is_a_failure() {
        let resolver = FixedResolver::new(Some("10.0.0.1"));
        let mut cache = DnsCache::new();

        assert_eq!(cache.resolve("10.0.0.1", &resolver), "");
        assert_eq!(cache.resolve("10.0.0.1", &resolver), "");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_numeric_answer_rejected() {
        let resolver = FixedResolver::new(Some("10.9.9.9"));
        let mut cache = DnsCache::new();
        assert_eq!(cache.resolve("10.0.0.1", &resolver), "");
    }

    #[test]
    fn test_clear_forgets_failures() {
        let resolver = FixedResolver::new(None);
        let mut cache = DnsCache::new();

        assert_eq!(cache.resolve("10.0.0.1", &resolver), "");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
        cache.resolve("10.0.0.1", &resolver);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_non_literal_skips_lookup() {
        let resolver = FixedResolver::new(Some("x"));
        let mut cache = DnsCache::new();
        assert_eq!(cache.resolve("example.com", &resolver), "");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }
}

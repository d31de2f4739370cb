//! known_hosts parser

use std::collections::HashSet;
use std::path::Path;

use super::{read_source, strip_comment};
use crate::identity::entry_id_for_arguments;
use crate::types::{DiscoveredHost, EntryOrigin};

/// Reduce `[host]:port` and `[host]` to `host`
fn strip_brackets(token: &str) -> &str {
    if let Some(inner) = token.strip_prefix('[') {
        if let Some(end) = inner.find(']') {
            if end > 0 {
                return &inner[..end];
            }
        }
    }
    token
}

/// Parse known_hosts text, skipping ids already in `seen`
pub fn parse_known_hosts(content: &str, seen: &mut HashSet<String>) -> Vec<DiscoveredHost> {
    let mut hosts = Vec::new();

    for line in content.lines() {
        let line = strip_comment(line).trim();
        // Hashed entries carry no recoverable host name
        if line.is_empty() || line.starts_with('|') {
            continue;
        }

        let Some(field) = line.split_whitespace().next() else {
            continue;
        };
        // @cert-authority and @revoked markers
        if field.starts_with('@') {
            continue;
        }

        for token in field.split(',') {
            let mut candidate = token.trim();
            if candidate.is_empty() {
                continue;
            }

            let mut user_name = "";
            if let Some(at) = candidate.rfind('@') {
                if at > 0 {
                    user_name = &candidate[..at];
                    candidate = &candidate[at + 1..];
                    if candidate.is_empty() {
                        continue;
                    }
                }
            }

            let host = strip_brackets(candidate).trim();
            if host.is_empty() || host.contains('*') || host.contains('?') || host.starts_with('!') {
                continue;
            }

            let arguments = vec![host.to_string()];
            let id = entry_id_for_arguments(&arguments);
            if !seen.insert(id.clone()) {
                continue;
            }

            hosts.push(DiscoveredHost {
                id,
                alias: host.to_string(),
                host_name: host.to_string(),
                user_name: user_name.to_string(),
                arguments,
                description: "known_hosts entry".to_string(),
                origin: EntryOrigin::KnownHosts,
            });
        }
    }

    hosts
}

/// Parse the known_hosts file at `path`; a missing file yields no hosts
pub fn load_known_hosts(path: &Path, seen: &mut HashSet<String>) -> Vec<DiscoveredHost> {
    read_source(path)
        .map(|content| parse_known_hosts(&content, seen))
        .unwrap_or_default()
}

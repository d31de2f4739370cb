//! Host discovery from the SSH client configuration and known_hosts
//!
//! Both parsers share one set of seen ids so a host listed in the config
//! is never emitted a second time from known_hosts.

mod known_hosts;
mod ssh_config;

pub use known_hosts::{load_known_hosts, parse_known_hosts};
pub use ssh_config::{load_ssh_config, parse_ssh_config};

use std::collections::HashSet;
use std::path::Path;

use crate::types::DiscoveredHost;

/// Discover hosts from the config file first, then known_hosts
pub fn discover_hosts(config_path: &Path, known_hosts_path: &Path) -> Vec<DiscoveredHost> {
    let mut seen = HashSet::new();
    let mut hosts = load_ssh_config(config_path, &mut seen);
    let from_config = hosts.len();
    hosts.extend(load_known_hosts(known_hosts_path, &mut seen));

    tracing::debug!(
        "Discovered {} hosts ({} from config, {} from known_hosts)",
        hosts.len(),
        from_config,
        hosts.len() - from_config
    );
    hosts
}

/// Read a source file; missing or unreadable files count as empty
fn read_source(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Skipping {:?}: {}", path, e);
            }
            None
        }
    }
}

/// Drop a trailing `#` comment that is not inside double quotes
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (index, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..index],
            _ => {}
        }
    }
    line
}

//! Host registry
//!
//! Merges discovered hosts, manual entries and user overrides into the
//! sorted list of launchable targets. The list is rebuilt wholesale on
//! every reload and shared as an immutable snapshot in between.

use std::sync::Arc;

use sh_core::args::{apply_user_to_arguments, host_from_arguments};
use sh_core::config::{Settings, SshPaths};
use sh_core::discovery::discover_hosts;
use sh_core::{DiscoveredHost, EntryOrigin, SshTarget, TerminalPreference};

use crate::dns::{DnsCache, ReverseResolver};

/// Current set of targets plus the DNS cache that feeds them
#[derive(Debug)]
pub struct HostRegistry {
    paths: SshPaths,
    targets: Arc<[SshTarget]>,
    terminal: TerminalPreference,
    dns: DnsCache,
}

impl HostRegistry {
    pub fn new(paths: SshPaths) -> Self {
        Self {
            paths,
            targets: Arc::from(Vec::new()),
            terminal: TerminalPreference::default(),
            dns: DnsCache::new(),
        }
    }

    /// Rebuild the target list from disk and `settings`.
    ///
    /// Returns the number of targets in the new snapshot.
    pub fn reload(&mut self, settings: &Settings, resolver: &dyn ReverseResolver) -> usize {
        self.dns.clear();

        let hosts = discover_hosts(&self.paths.config, &self.paths.known_hosts);
        let mut targets = build_targets(&hosts, settings);

        for target in &mut targets {
            target.dns_name = self.dns.resolve(&target.host_name, resolver);
        }
        sort_targets(&mut targets);

        self.terminal = settings.terminal.clone();
        self.targets = Arc::from(targets);

        tracing::debug!(
            "Registry reloaded: {} targets ({} discovered, {} manual)",
            self.targets.len(),
            hosts.len(),
            settings.manual_entries.len()
        );
        self.targets.len()
    }

    /// Snapshot of the current targets
    pub fn targets(&self) -> Arc<[SshTarget]> {
        Arc::clone(&self.targets)
    }

    pub fn target(&self, id: &str) -> Option<&SshTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Terminal preference captured at the last reload
    pub fn terminal(&self) -> &TerminalPreference {
        &self.terminal
    }

    pub fn paths(&self) -> &SshPaths {
        &self.paths
    }
}

/// Merge discovered hosts with overrides and manual entries.
///
/// DNS names are left empty and the result is unsorted.
pub fn build_targets(hosts: &[DiscoveredHost], settings: &Settings) -> Vec<SshTarget> {
    let mut targets: Vec<SshTarget> = hosts
        .iter()
        .map(|host| {
            let default_user_name = host.user_name.trim().to_string();
            let user_name = settings
                .usernames
                .get(&host.id)
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_user_name.clone());

            let ssh_arguments = if user_name.is_empty() {
                host.arguments.clone()
            } else {
                apply_user_to_arguments(&host.arguments, &user_name)
            };

            let label = settings
                .labels
                .get(&host.id)
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .unwrap_or(&host.alias)
                .to_string();

            SshTarget {
                id: host.id.clone(),
                default_label: host.alias.clone(),
                label,
                description: host.description.clone(),
                ssh_arguments,
                host_name: if host.host_name.is_empty() {
                    host.alias.clone()
                } else {
                    host.host_name.clone()
                },
                dns_name: String::new(),
                user_name,
                default_user_name,
                origin: host.origin,
                is_manual: false,
            }
        })
        .collect();

    for entry in &settings.manual_entries {
        if entry.id.is_empty() || entry.arguments.is_empty() {
            continue;
        }

        let default_label = if entry.name.is_empty() {
            entry.id.clone()
        } else {
            entry.name.clone()
        };
        let description = if entry.description.is_empty() {
            "Manual entry".to_string()
        } else {
            entry.description.clone()
        };
        let host_name = host_from_arguments(&entry.arguments);

        if let Some(existing) = targets.iter_mut().find(|t| t.id == entry.id) {
            existing.default_label = default_label.clone();
            existing.label = default_label;
            existing.description = description;
            existing.ssh_arguments = entry.arguments.clone();
            existing.host_name = host_name;
            existing.user_name.clear();
            existing.default_user_name.clear();
            existing.origin = EntryOrigin::Manual;
            existing.is_manual = true;
        } else {
            targets.push(SshTarget {
                id: entry.id.clone(),
                label: default_label.clone(),
                default_label,
                description,
                ssh_arguments: entry.arguments.clone(),
                host_name,
                dns_name: String::new(),
                user_name: String::new(),
                default_user_name: String::new(),
                origin: EntryOrigin::Manual,
                is_manual: true,
            });
        }
    }

    for target in &mut targets {
        if target.host_name.is_empty() {
            let from_arguments = host_from_arguments(&target.ssh_arguments);
            target.host_name = if from_arguments.is_empty() {
                target.default_label.clone()
            } else {
                from_arguments
            };
        }
    }

    targets
}

/// Case-insensitive label order with deterministic tie-breaks
pub fn sort_targets(targets: &mut [SshTarget]) {
    targets.sort_by_cached_key(|t| (t.label.to_lowercase(), t.label.clone(), t.id.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use sh_core::identity::entry_id_for_arguments;
    use sh_core::ManualEntry;
    use std::net::IpAddr;
    use tempfile::TempDir;

    struct NoDns;

    impl ReverseResolver for NoDns {
        fn reverse_lookup(&self, _addr: IpAddr) -> Option<String> {
            None
        }
    }

    struct LanDns;

    impl ReverseResolver for LanDns {
        fn reverse_lookup(&self, addr: IpAddr) -> Option<String> {
            Some(format!("host-{}.lan.", addr))
        }
    }

    fn host(alias: &str, user: &str) -> DiscoveredHost {
        let arguments = vec![alias.to_string()];
        DiscoveredHost {
            id: entry_id_for_arguments(&arguments),
            alias: alias.to_string(),
            host_name: alias.to_string(),
            user_name: user.to_string(),
            arguments,
            description: "SSH config entry".to_string(),
            origin: EntryOrigin::Config,
        }
    }

    fn manual(id: &str, name: &str, arguments: &[&str]) -> ManualEntry {
        ManualEntry {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_discovered_user_applied() {
        let targets = build_targets(&[host("box", "ops")], &Settings::default());
        assert_eq!(targets[0].ssh_arguments, vec!["ops@box"]);
        assert_eq!(targets[0].user_name, "ops");
        assert_eq!(targets[0].default_user_name, "ops");
        assert_eq!(targets[0].label, "box");
    }

    #[test]
    fn test_overrides_applied() {
        let h = host("box", "ops");
        let mut settings = Settings::default();
        settings.labels.insert(h.id.clone(), "Build box".into());
        settings.usernames.insert(h.id.clone(), "deploy".into());

        let targets = build_targets(&[h], &settings);
        assert_eq!(targets[0].label, "Build box");
        assert_eq!(targets[0].default_label, "box");
        assert_eq!(targets[0].user_name, "deploy");
        assert_eq!(targets[0].default_user_name, "ops");
        assert_eq!(targets[0].ssh_arguments, vec!["deploy@box"]);
    }

    #[test]
    fn test_manual_entry_appended() {
        let mut settings = Settings::default();
        settings
            .manual_entries
            .push(manual("manual:1", "", &["-p", "2222", "alice@gate"]));

        let targets = build_targets(&[], &settings);
        assert_eq!(targets.len(), 1);
        let t = &targets[0];
        assert!(t.is_manual);
        assert_eq!(t.origin, EntryOrigin::Manual);
        assert_eq!(t.label, "manual:1");
        assert_eq!(t.description, "Manual entry");
        assert_eq!(t.host_name, "gate");
        assert_eq!(t.user_name, "");
    }

    #[test]
    fn test_manual_entry_overrides_discovered_id() {
        let h = host("box", "ops");
        let mut settings = Settings::default();
        settings
            .manual_entries
            .push(manual(&h.id, "Pinned", &["-J", "gate", "box"]));

        let targets = build_targets(&[h], &settings);
        assert_eq!(targets.len(), 1);
        assert!(targets[0].is_manual);
        assert_eq!(targets[0].label, "Pinned");
        assert_eq!(targets[0].ssh_arguments, vec!["-J", "gate", "box"]);
        assert_eq!(targets[0].user_name, "");
    }

    #[test]
    fn test_invalid_manual_entries_skipped() {
        let mut settings = Settings::default();
        settings.manual_entries.push(manual("", "x", &["box"]));
        settings.manual_entries.push(manual("manual:2", "y", &[]));
        assert!(build_targets(&[], &settings).is_empty());
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut targets = build_targets(
            &[host("beta", ""), host("Alpha", ""), host("alpha", ""), host("Gamma", "")],
            &Settings::default(),
        );
        sort_targets(&mut targets);
        let labels: Vec<_> = targets.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "alpha", "beta", "Gamma"]);
    }

    #[test]
    fn test_reload_from_disk() {
        let dir = TempDir::new().unwrap();
        let paths = SshPaths::in_dir(dir.path());
        std::fs::write(&paths.config, "Host web\n  HostName 10.0.0.7\n").unwrap();
        std::fs::write(&paths.known_hosts, "db ssh-rsa AAAA\n").unwrap();

        let mut registry = HostRegistry::new(paths);
        assert_eq!(registry.reload(&Settings::default(), &LanDns), 2);

        let web = registry.target(&entry_id_for_arguments(&["web"])).unwrap();
        assert_eq!(web.dns_name, "host-10.0.0.7.lan");
        let db = registry.target(&entry_id_for_arguments(&["db"])).unwrap();
        assert_eq!(db.dns_name, "");
        assert_eq!(db.origin, EntryOrigin::KnownHosts);
    }

    #[test]
    fn test_reload_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = SshPaths::in_dir(dir.path());
        std::fs::write(&paths.config, "Host a b c\n").unwrap();

        let mut registry = HostRegistry::new(paths);
        registry.reload(&Settings::default(), &NoDns);
        let first = registry.targets();
        registry.reload(&Settings::default(), &NoDns);
        assert_eq!(&*first, &*registry.targets());
    }

    #[test]
    fn test_removed_manual_entry_disappears() {
        let dir = TempDir::new().unwrap();
        let mut registry = HostRegistry::new(SshPaths::in_dir(dir.path()));

        let mut settings = Settings::default();
        settings.manual_entries.push(manual("manual:9", "Nine", &["nine"]));
        assert_eq!(registry.reload(&settings, &NoDns), 1);

        settings.manual_entries.clear();
        assert_eq!(registry.reload(&settings, &NoDns), 0);
        assert!(registry.target("manual:9").is_none());
    }

    #[test]
    fn test_terminal_captured() {
        let dir = TempDir::new().unwrap();
        let mut registry = HostRegistry::new(SshPaths::in_dir(dir.path()));
        let settings = Settings {
            terminal: TerminalPreference::new("kitty"),
            ..Default::default()
        };
        registry.reload(&settings, &NoDns);
        assert_eq!(registry.terminal().id, "kitty");
    }
}

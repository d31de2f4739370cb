//! SSH client config parser
//!
//! Only `Host`, `HostName` and `User` are interpreted. Wildcard aliases are
//! never emitted since they cannot be connected to directly.

use std::collections::HashSet;
use std::path::Path;

use super::{read_source, strip_comment};
use crate::identity::entry_id_for_arguments;
use crate::types::{DiscoveredHost, EntryOrigin};

/// The `Host` block being accumulated
#[derive(Default)]
struct Stanza {
    aliases: Vec<String>,
    host_name: String,
    user: String,
}

impl Stanza {
    fn description(&self) -> String {
        match (self.user.is_empty(), self.host_name.is_empty()) {
            (false, false) => format!("{}@{} in SSH config", self.user, self.host_name),
            (true, false) => format!("{} in SSH config", self.host_name),
            _ => "SSH config entry".to_string(),
        }
    }

    fn commit(&self, seen: &mut HashSet<String>, hosts: &mut Vec<DiscoveredHost>) {
        for alias in &self.aliases {
            let alias = alias.trim();
            if alias.is_empty() || alias.contains('*') || alias.contains('?') {
                continue;
            }

            let arguments = vec![alias.to_string()];
            let id = entry_id_for_arguments(&arguments);
            if !seen.insert(id.clone()) {
                continue;
            }

            let host_name = if self.host_name.is_empty() {
                alias.to_string()
            } else {
                self.host_name.clone()
            };

            hosts.push(DiscoveredHost {
                id,
                alias: alias.to_string(),
                host_name,
                user_name: self.user.clone(),
                arguments,
                description: self.description(),
                origin: EntryOrigin::Config,
            });
        }
    }
}

/// Parse config text, skipping ids already in `seen`
pub fn parse_ssh_config(content: &str, seen: &mut HashSet<String>) -> Vec<DiscoveredHost> {
    let mut hosts = Vec::new();
    let mut stanza: Option<Stanza> = None;

    for line in content.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_lowercase().as_str() {
            "host" => {
                if let Some(previous) = stanza.take() {
                    previous.commit(seen, &mut hosts);
                }
                stanza = Some(Stanza {
                    aliases: parts.map(str::to_string).collect(),
                    ..Default::default()
                });
            }
            "hostname" => {
                if let (Some(current), Some(value)) = (stanza.as_mut(), parts.next()) {
                    current.host_name = value.to_string();
                }
            }
            "user" => {
                if let (Some(current), Some(value)) = (stanza.as_mut(), parts.next()) {
                    current.user = value.to_string();
                }
            }
            _ => {}
        }
    }

    if let Some(last) = stanza {
        last.commit(seen, &mut hosts);
    }

    hosts
}

/// Parse the config file at `path`; a missing file yields no hosts
pub fn load_ssh_config(path: &Path, seen: &mut HashSet<String>) -> Vec<DiscoveredHost> {
    read_source(path)
        .map(|content| parse_ssh_config(&content, seen))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<DiscoveredHost> {
        parse_ssh_config(content, &mut HashSet::new())
    }

    #[test]
    fn test_parse_basic_stanza() {
        let hosts = parse("Host a b *.x\n  HostName h.example\n  User u\n");
        assert_eq!(hosts.len(), 2);

        assert_eq!(hosts[0].alias, "a");
        assert_eq!(hosts[0].arguments, vec!["a"]);
        assert_eq!(hosts[0].host_name, "h.example");
        assert_eq!(hosts[0].user_name, "u");
        assert_eq!(hosts[0].description, "u@h.example in SSH config");
        assert_eq!(hosts[0].origin, EntryOrigin::Config);
        assert_eq!(hosts[0].id, entry_id_for_arguments(&["a"]));

        assert_eq!(hosts[1].alias, "b");
        assert_eq!(hosts[1].host_name, "h.example");
    }

    #[test]
    fn test_wildcards_never_emitted() {
        let hosts = parse("Host *\n  User root\nHost web-? db*\n");
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_descriptions() {
        let hosts = parse("Host one\n  HostName one.lan\nHost two\n");
        assert_eq!(hosts[0].description, "one.lan in SSH config");
        assert_eq!(hosts[1].description, "SSH config entry");
        assert_eq!(hosts[1].host_name, "two");
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let hosts = parse("HOST box\nhostname 10.0.0.5\nUSER admin\n");
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].host_name, "10.0.0.5");
        assert_eq!(hosts[0].user_name, "admin");
    }

    #[test]
    fn test_stanza_fields_reset_between_hosts() {
        let hosts = parse("Host a\n  User alice\nHost b\n");
        assert_eq!(hosts[0].user_name, "alice");
        assert_eq!(hosts[1].user_name, "");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let hosts = parse("# header\n\nHost a # primary\n  User bob # note\n");
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].alias, "a");
        assert_eq!(hosts[0].user_name, "bob");
    }

    #[test]
    fn test_duplicate_aliases_emitted_once() {
        let hosts = parse("Host a\nHost a\n  User later\n");
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].user_name, "");
    }

    #[test]
    fn test_directives_before_host_ignored() {
        let hosts = parse("User nobody\nHostName x\n");
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_keyword_without_value_ignored() {
        let hosts = parse("Host a\n  User\n");
        assert_eq!(hosts[0].user_name, "");
    }
}

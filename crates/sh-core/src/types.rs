//! Common types used throughout ssh-helper

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a target came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// A `Host` stanza in the SSH client config
    Config,
    /// A line in known_hosts
    KnownHosts,
    /// Added by the user
    Manual,
}

impl EntryOrigin {
    /// Human-readable label for editors and listings
    pub fn display_label(&self) -> &'static str {
        match self {
            EntryOrigin::Config => "SSH config",
            EntryOrigin::KnownHosts => "Known hosts",
            EntryOrigin::Manual => "Manual entry",
        }
    }
}

impl fmt::Display for EntryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

/// A host produced by one of the discovery parsers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredHost {
    pub id: String,
    pub alias: String,
    pub host_name: String,
    pub user_name: String,
    pub arguments: Vec<String>,
    pub description: String,
    pub origin: EntryOrigin,
}

/// A user-defined target as persisted in the settings store
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManualEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub arguments: Vec<String>,
}

/// A launchable target after merging discovery, manual entries and overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SshTarget {
    /// Stable identity (`auto:<sha1>` or `manual:<uuid>`)
    pub id: String,
    /// Label before any user override
    pub default_label: String,
    pub label: String,
    pub description: String,
    /// Arguments passed to `ssh`, user already substituted
    pub ssh_arguments: Vec<String>,
    pub host_name: String,
    /// Reverse DNS name when `host_name` is an IP literal
    pub dns_name: String,
    pub user_name: String,
    /// Username before any user override
    pub default_user_name: String,
    pub origin: EntryOrigin,
    pub is_manual: bool,
}

/// Which terminal emulator to launch ssh in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalPreference {
    /// `auto`, `custom`, or a known terminal id
    pub id: String,
    /// Descriptor used when `id == "custom"`
    pub custom_command: String,
}

impl TerminalPreference {
    pub const AUTO: &'static str = "auto";
    pub const CUSTOM: &'static str = "custom";

    /// Preference with a specific terminal id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            custom_command: String::new(),
        }
    }

    /// Preference with a custom command descriptor
    pub fn custom(command: impl Into<String>) -> Self {
        Self {
            id: Self::CUSTOM.to_string(),
            custom_command: command.into(),
        }
    }

    /// True when no specific terminal is configured
    pub fn is_auto(&self) -> bool {
        let id = self.id.trim();
        id.is_empty() || id == Self::AUTO
    }
}

impl Default for TerminalPreference {
    fn default() -> Self {
        Self::new(Self::AUTO)
    }
}

/// Ranking category for a query match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    /// Listing everything for an empty pattern
    Moderate,
    /// Scored against a pattern
    Normal,
}

/// One ranked result of a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMatch {
    pub id: String,
    pub label: String,
    pub subtext: String,
    pub relevance: f64,
    /// Arguments to hand to the launcher
    pub arguments: Vec<String>,
    pub category: MatchCategory,
}

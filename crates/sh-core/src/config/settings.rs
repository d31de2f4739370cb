//! Persisted user settings
//!
//! The file is split into named groups:
//!
//! ```toml
//! [Aliases]
//! "auto:3f2a..." = "Build box"
//!
//! [Usernames]
//! "auto:3f2a..." = "deploy"
//!
//! [ManualEntries]
//! Ids = ["manual:6a1c..."]
//!
//! [ManualEntries.Entries."manual:6a1c..."]
//! Name = "Jump via gate"
//! Arguments = ["-J", "gate", "inner"]
//! Description = ""
//!
//! [Terminal]
//! Id = "custom"
//! CustomCommand = "foot -e"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{load_config, save_config};
use crate::args::normalize_arguments;
use crate::error::ConfigError;
use crate::types::{ManualEntry, TerminalPreference};

/// User settings after load normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Custom label per target id
    pub labels: BTreeMap<String, String>,
    /// Custom username per target id
    pub usernames: BTreeMap<String, String>,
    pub manual_entries: Vec<ManualEntry>,
    pub terminal: TerminalPreference,
}

/// Backend that persists [`Settings`]
pub trait SettingsStore: Send + Sync {
    /// Load settings; a store that has never been saved yields defaults
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Replace the persisted settings
    fn save(&self, settings: &Settings) -> Result<(), ConfigError>;

    /// Backing file, if any, so it can be watched
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Settings stored as a TOML file
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for TomlSettingsStore {
    fn default() -> Self {
        Self::new(super::default_settings_path())
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        match load_config::<SettingsFile>(&self.path) {
            Ok(file) => Ok(Settings::from(file)),
            Err(ConfigError::NotFound(_)) => Ok(Settings::default()),
            Err(e) => Err(e),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        save_config(&self.path, &SettingsFile::from(settings))
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(rename = "Aliases", default, skip_serializing_if = "BTreeMap::is_empty")]
    aliases: BTreeMap<String, String>,

    #[serde(rename = "Usernames", default, skip_serializing_if = "BTreeMap::is_empty")]
    usernames: BTreeMap<String, String>,

    #[serde(rename = "ManualEntries", default, skip_serializing_if = "Option::is_none")]
    manual_entries: Option<ManualEntriesGroup>,

    #[serde(rename = "Terminal", default, skip_serializing_if = "Option::is_none")]
    terminal: Option<TerminalGroup>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ManualEntriesGroup {
    #[serde(rename = "Ids", default)]
    ids: Vec<String>,

    #[serde(rename = "Entries", default)]
    entries: BTreeMap<String, ManualEntryRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ManualEntryRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Arguments")]
    arguments: Vec<String>,
    #[serde(rename = "Description")]
    description: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TerminalGroup {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "CustomCommand", skip_serializing_if = "String::is_empty")]
    custom_command: String,
}

/// Keep trimmed, non-empty values only
fn trimmed_values(map: BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.into_iter()
        .filter_map(|(id, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| (id, value.to_string()))
        })
        .collect()
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let mut manual_entries = Vec::new();
        if let Some(mut group) = file.manual_entries {
            for id in group.ids {
                let Some(record) = group.entries.remove(&id) else {
                    continue;
                };
                let name = record.name.trim().to_string();
                let arguments = normalize_arguments(&record.arguments);
                if name.is_empty() || arguments.is_empty() {
                    continue;
                }
                manual_entries.push(ManualEntry {
                    id,
                    name,
                    description: record.description.trim().to_string(),
                    arguments,
                });
            }
        }

        let terminal = match file.terminal {
            Some(group) if !group.id.trim().is_empty() => TerminalPreference {
                id: group.id.trim().to_string(),
                custom_command: group.custom_command.trim().to_string(),
            },
            _ => TerminalPreference::default(),
        };

        Self {
            labels: trimmed_values(file.aliases),
            usernames: trimmed_values(file.usernames),
            manual_entries,
            terminal,
        }
    }
}

impl From<&Settings> for SettingsFile {
    fn from(settings: &Settings) -> Self {
        let mut group = ManualEntriesGroup::default();
        for entry in &settings.manual_entries {
            if entry.id.trim().is_empty() || group.entries.contains_key(&entry.id) {
                continue;
            }
            group.ids.push(entry.id.clone());
            group.entries.insert(
                entry.id.clone(),
                ManualEntryRecord {
                    name: entry.name.trim().to_string(),
                    arguments: normalize_arguments(&entry.arguments),
                    description: entry.description.trim().to_string(),
                },
            );
        }

        let terminal = if settings.terminal.is_auto() {
            None
        } else {
            let id = settings.terminal.id.trim().to_string();
            let custom_command = if id == TerminalPreference::CUSTOM {
                settings.terminal.custom_command.trim().to_string()
            } else {
                String::new()
            };
            Some(TerminalGroup { id, custom_command })
        };

        Self {
            aliases: trimmed_values(settings.labels.clone()),
            usernames: trimmed_values(settings.usernames.clone()),
            manual_entries: (!group.ids.is_empty()).then_some(group),
            terminal,
        }
    }
}

//! Configuration management for ssh-helper

mod settings;

pub use settings::{Settings, SettingsStore, TomlSettingsStore};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ssh-helper")
}

/// Get the default settings file path
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.toml")
}

/// Locations of the SSH client files that hosts are discovered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshPaths {
    /// The `.ssh` directory itself
    pub dir: PathBuf,
    pub config: PathBuf,
    pub known_hosts: PathBuf,
}

impl SshPaths {
    /// Standard file names inside an arbitrary directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config: dir.join("config"),
            known_hosts: dir.join("known_hosts"),
            dir,
        }
    }

    /// `~/.ssh` of the current user
    pub fn from_home() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::in_dir(home.join(".ssh"))
    }

    /// Every path worth watching for changes
    pub fn watch_candidates(&self) -> [&Path; 3] {
        [&self.dir, &self.config, &self.known_hosts]
    }
}

impl Default for SshPaths {
    fn default() -> Self {
        Self::from_home()
    }
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read settings: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a file, replacing it atomically
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Invalid(format!("Failed to create settings dir: {}", e))
            })?;
        }
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write settings: {}", e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to replace settings: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_default_paths() {
        assert!(default_config_dir().ends_with("ssh-helper"));
        assert!(default_settings_path().ends_with("ssh-helper/settings.toml"));
    }

    #[test]
    fn test_ssh_paths_in_dir() {
        let paths = SshPaths::in_dir("/tmp/x/.ssh");
        assert_eq!(paths.config, PathBuf::from("/tmp/x/.ssh/config"));
        assert_eq!(paths.known_hosts, PathBuf::from("/tmp/x/.ssh/known_hosts"));
        assert_eq!(paths.watch_candidates().len(), 3);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let sample = Sample {
            name: "box".to_string(),
        };

        save_config(&path, &sample).unwrap();
        let loaded: Sample = load_config(&path).unwrap();
        assert_eq!(loaded, sample);
        assert!(!dir.path().join("nested").join("settings.toml.tmp").exists());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let result: Result<Sample, _> = load_config(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "name = [").unwrap();
        let result: Result<Sample, _> = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

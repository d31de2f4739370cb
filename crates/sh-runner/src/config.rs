//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

use sh_core::config::{default_settings_path, SshPaths};

use crate::launcher::DEFAULT_TERMINAL_ENV_VARS;
use crate::reload::DEFAULT_DEBOUNCE;

/// Where to read hosts and settings from, and how to react to changes
#[derive(Debug, Clone)]
pub struct HelperConfig {
    pub ssh_paths: SshPaths,
    pub settings_path: PathBuf,
    /// Quiet period before a change triggers a reload
    pub debounce: Duration,
    /// Environment variables holding a terminal command, in priority order
    pub terminal_env_vars: Vec<String>,
}

impl HelperConfig {
    pub fn with_ssh_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ssh_paths = SshPaths::in_dir(dir);
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            ssh_paths: SshPaths::from_home(),
            settings_path: default_settings_path(),
            debounce: DEFAULT_DEBOUNCE,
            terminal_env_vars: DEFAULT_TERMINAL_ENV_VARS
                .iter()
                .map(|v| v.to_string())
                .collect(),
        }
    }
}

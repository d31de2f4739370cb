//! The ssh-helper facade
//!
//! [`SshHelper`] owns the registry, the reload scheduler and the launcher,
//! and exposes the operations a launcher front end or a settings editor
//! needs. Registry state sits behind one lock: reloads and queries never
//! interleave, while launching happens outside it.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;

use sh_core::args::{arguments_to_string, string_to_arguments};
use sh_core::config::{Settings, SettingsStore, TomlSettingsStore};
use sh_core::identity::new_manual_id;
use sh_core::{EditError, ManualEntry, QueryMatch, SshTarget, TerminalPreference};

use crate::config::HelperConfig;
use crate::dns::{ReverseResolver, SystemResolver};
use crate::launcher::{LaunchEnvironment, SystemEnvironment, TerminalCandidate, TerminalLauncher};
use crate::query::{parse_query, rank};
use crate::registry::HostRegistry;
use crate::reload::ReloadScheduler;

/// Changes to apply to a manual entry; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct ManualEntryUpdate {
    pub name: Option<String>,
    /// Shell-style command line of ssh arguments
    pub command: Option<String>,
    pub description: Option<String>,
}

struct HelperState {
    registry: HostRegistry,
    scheduler: ReloadScheduler,
}

pub struct SshHelper {
    store: Arc<dyn SettingsStore>,
    resolver: Arc<dyn ReverseResolver>,
    launcher: TerminalLauncher,
    state: Mutex<HelperState>,
}

impl SshHelper {
    pub fn new(
        config: HelperConfig,
        store: Arc<dyn SettingsStore>,
        resolver: Arc<dyn ReverseResolver>,
        env: Arc<dyn LaunchEnvironment>,
    ) -> Self {
        Self {
            store,
            resolver,
            launcher: TerminalLauncher::new(env, config.terminal_env_vars),
            state: Mutex::new(HelperState {
                registry: HostRegistry::new(config.ssh_paths),
                scheduler: ReloadScheduler::new(config.debounce),
            }),
        }
    }

    /// Helper backed by the TOML settings file, system DNS and real processes
    pub fn from_config(config: HelperConfig) -> Self {
        let store = Arc::new(TomlSettingsStore::new(config.settings_path.clone()));
        Self::new(
            config,
            store,
            Arc::new(SystemResolver),
            Arc::new(SystemEnvironment),
        )
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Rebuild the registry now, returning the target count
    pub fn reload(&self) -> usize {
        let mut state = self.state.lock();
        self.reload_locked(&mut state)
    }

    fn reload_locked(&self, state: &mut HelperState) -> usize {
        let settings = self.load_settings();
        let count = state.registry.reload(&settings, self.resolver.as_ref());
        state.scheduler.mark_fresh();
        count
    }

    fn ensure_loaded(&self, state: &mut HelperState) {
        if state.scheduler.is_stale() {
            self.reload_locked(state);
        }
    }

    fn load_settings(&self) -> Settings {
        match self.store.load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// Record a filesystem change; the reload happens after the debounce
    pub fn notify_changed(&self) {
        self.state.lock().scheduler.notify(Instant::now());
    }

    pub fn reload_deadline(&self) -> Option<Instant> {
        self.state.lock().scheduler.deadline()
    }

    /// Reload if the debounce deadline has passed
    pub fn reload_if_due(&self, now: Instant) -> Option<usize> {
        let mut state = self.state.lock();
        if !state.scheduler.take_due(now) {
            return None;
        }
        tracing::info!("Reloading hosts after change");
        Some(self.reload_locked(&mut state))
    }

    pub fn is_stale(&self) -> bool {
        self.state.lock().scheduler.is_stale()
    }

    /// Existing files and directories whose changes affect the registry
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let state = self.state.lock();
        let ssh = state.registry.paths();
        ssh.watch_candidates()
            .into_iter()
            .chain(self.store.path())
            .filter(|p| p.exists())
            .map(|p| p.to_path_buf())
            .collect()
    }

    // ------------------------------------------------------------------
    // Querying and launching
    // ------------------------------------------------------------------

    /// Snapshot of all targets, reloading first if stale
    pub fn targets(&self) -> Arc<[SshTarget]> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state);
        state.registry.targets()
    }

    pub fn target(&self, id: &str) -> Option<SshTarget> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state);
        state.registry.target(id).cloned()
    }

    /// Ranked matches for an `ssh ...` query
    pub fn query(&self, text: &str) -> Vec<QueryMatch> {
        let Some(query) = parse_query(text) else {
            return Vec::new();
        };
        let targets = self.targets();
        rank(&targets, &query)
    }

    /// Open `ssh arguments` in a terminal
    pub fn launch(&self, arguments: &[String]) -> bool {
        let preference = {
            let mut state = self.state.lock();
            self.ensure_loaded(&mut state);
            state.registry.terminal().clone()
        };
        self.launcher.launch(arguments, &preference)
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    fn edit<T>(
        &self,
        apply: impl FnOnce(&HostRegistry, &mut Settings) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        let mut state = self.state.lock();
        self.ensure_loaded(&mut state);

        let mut settings = self.store.load()?;
        let result = apply(&state.registry, &mut settings)?;
        self.store.save(&settings)?;

        state.scheduler.invalidate();
        Ok(result)
    }

    /// Set the label of a target.
    ///
    /// For manual entries this renames the entry. For discovered targets an
    /// empty label or the default label removes the override.
    pub fn set_label(&self, id: &str, label: &str) -> Result<(), EditError> {
        self.edit(|registry, settings| {
            let target = registry
                .target(id)
                .ok_or_else(|| EditError::UnknownTarget(id.to_string()))?;
            let label = label.trim();

            if target.is_manual {
                let entry = settings
                    .manual_entries
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or_else(|| EditError::UnknownTarget(id.to_string()))?;
                entry.name = if label.is_empty() {
                    arguments_to_string(&entry.arguments)
                } else {
                    label.to_string()
                };
                settings.labels.remove(id);
            } else if label.is_empty() || label == target.default_label {
                settings.labels.remove(id);
            } else {
                settings.labels.insert(id.to_string(), label.to_string());
            }
            Ok(())
        })
    }

    /// Drop a custom label
    pub fn reset_label(&self, id: &str) -> Result<(), EditError> {
        self.edit(|registry, settings| {
            if settings.labels.remove(id).is_none() && registry.target(id).is_none() {
                return Err(EditError::UnknownTarget(id.to_string()));
            }
            Ok(())
        })
    }

    /// Override the username of a discovered target.
    ///
    /// An empty user, or the discovered one, removes the override.
    pub fn set_username(&self, id: &str, user: &str) -> Result<(), EditError> {
        self.edit(|registry, settings| {
            let target = registry
                .target(id)
                .ok_or_else(|| EditError::UnknownTarget(id.to_string()))?;
            if target.is_manual {
                return Err(EditError::Unsupported {
                    id: id.to_string(),
                    reason: "manual entries take the user from their arguments".to_string(),
                });
            }

            let user = user.trim();
            if user.is_empty() || user == target.default_user_name {
                settings.usernames.remove(id);
            } else {
                settings.usernames.insert(id.to_string(), user.to_string());
            }
            Ok(())
        })
    }

    /// Add a manual entry from a command line, returning its new id
    pub fn add_manual_entry(
        &self,
        name: &str,
        command: &str,
        description: &str,
    ) -> Result<String, EditError> {
        let arguments = string_to_arguments(command)?;
        if arguments.is_empty() {
            return Err(EditError::EmptyArguments);
        }
        let name = match name.trim() {
            "" => arguments_to_string(&arguments),
            name => name.to_string(),
        };

        self.edit(|_, settings| {
            let id = new_manual_id();
            settings.manual_entries.push(ManualEntry {
                id: id.clone(),
                name,
                description: description.trim().to_string(),
                arguments,
            });
            Ok(id)
        })
    }

    pub fn update_manual_entry(&self, id: &str, update: ManualEntryUpdate) -> Result<(), EditError> {
        let arguments = match update.command.as_deref() {
            Some(command) => {
                let arguments = string_to_arguments(command)?;
                if arguments.is_empty() {
                    return Err(EditError::EmptyArguments);
                }
                Some(arguments)
            }
            None => None,
        };

        self.edit(|_, settings| {
            let entry = settings
                .manual_entries
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| EditError::UnknownTarget(id.to_string()))?;

            if let Some(arguments) = arguments {
                entry.arguments = arguments;
            }
            if let Some(description) = update.description {
                entry.description = description.trim().to_string();
            }
            if let Some(name) = update.name {
                entry.name = name.trim().to_string();
            }
            if entry.name.is_empty() {
                entry.name = arguments_to_string(&entry.arguments);
            }
            Ok(())
        })
    }

    /// Delete a manual entry together with any overrides for its id
    pub fn remove_manual_entry(&self, id: &str) -> Result<(), EditError> {
        self.edit(|_, settings| {
            let before = settings.manual_entries.len();
            settings.manual_entries.retain(|e| e.id != id);
            if settings.manual_entries.len() == before {
                return Err(EditError::UnknownTarget(id.to_string()));
            }
            settings.labels.remove(id);
            settings.usernames.remove(id);
            Ok(())
        })
    }

    /// Forget every override, manual entry and the terminal preference
    pub fn reset_to_defaults(&self) -> Result<(), EditError> {
        self.edit(|_, settings| {
            *settings = Settings::default();
            Ok(())
        })
    }

    pub fn terminal_preference(&self) -> TerminalPreference {
        self.load_settings().terminal
    }

    pub fn set_terminal_preference(&self, preference: TerminalPreference) -> Result<(), EditError> {
        if preference.id.trim() == TerminalPreference::CUSTOM
            && preference.custom_command.trim().is_empty()
        {
            return Err(EditError::InvalidCommand(
                "a custom terminal needs a command".to_string(),
            ));
        }
        self.edit(|_, settings| {
            settings.terminal = preference;
            Ok(())
        })
    }

    /// Known terminals that are installed
    pub fn available_terminals(&self) -> Vec<&'static TerminalCandidate> {
        self.launcher.available_terminals()
    }
}

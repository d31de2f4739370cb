//! sh-runner: Registry, launching and reload scheduling for ssh-helper
//!
//! This crate turns the discovery results from `sh-core` into a queryable
//! registry of targets and opens selected targets in a terminal.
//!
//! # Architecture
//!
//! - [`registry::HostRegistry`]: merges hosts, manual entries and overrides
//! - [`dns`]: cached reverse lookups for IP-literal hosts
//! - [`query`]: `ssh <pattern>` parsing and fuzzy ranking
//! - [`launcher::TerminalLauncher`]: terminal fallback chain
//! - [`reload::ReloadScheduler`] and [`watcher`]: debounced reload on file changes
//! - [`SshHelper`]: the facade tying them together

pub mod config;
pub mod dns;
pub mod launcher;
pub mod query;
pub mod registry;
pub mod reload;
pub mod runner;
pub mod watcher;

pub use config::HelperConfig;
pub use runner::{ManualEntryUpdate, SshHelper};
pub use watcher::{run_reload_loop, NotifyWatcher, PathWatcher};

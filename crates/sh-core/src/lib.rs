//! sh-core: Host discovery and shared types for ssh-helper
//!
//! This crate parses the SSH client files into launchable hosts, derives
//! their stable ids, persists user settings and scores fuzzy matches.
//! It has no runtime dependencies on terminals, DNS or the filesystem
//! watcher; those live in `sh-runner`.

pub mod args;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fuzzy;
pub mod identity;
pub mod types;

pub use error::{ConfigError, EditError};
pub use types::{
    DiscoveredHost, EntryOrigin, ManualEntry, MatchCategory, QueryMatch, SshTarget,
    TerminalPreference,
};

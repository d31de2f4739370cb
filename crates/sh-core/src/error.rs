//! Core error types for ssh-helper

use std::path::PathBuf;
use thiserror::Error;

/// Settings store errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file not found
    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid settings
    #[error("Invalid settings: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors from editing targets and manual entries
#[derive(Error, Debug)]
pub enum EditError {
    /// No target with this id
    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    /// The edit does not apply to this target
    #[error("Not supported for {id}: {reason}")]
    Unsupported { id: String, reason: String },

    /// A manual entry needs at least one argument
    #[error("Manual entry has no ssh arguments")]
    EmptyArguments,

    /// Command string could not be split
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Persisting the change failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

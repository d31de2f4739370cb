//! ssh-helper: Command-line front end
//!
//! Provides the `ssh-helper` CLI for querying discovered SSH hosts,
//! launching them in a terminal and editing the saved settings.

pub mod commands;
pub mod output;

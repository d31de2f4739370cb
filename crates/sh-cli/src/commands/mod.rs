//! CLI command implementations

mod entries;
mod query;
mod terminal;
mod watch;

pub use entries::{
    label_reset, label_set, list_command, manual_add, manual_remove, manual_update,
    reset_command, user_set,
};
pub use query::{launch_command, query_command};
pub use terminal::{terminal_list, terminal_set, terminal_show};
pub use watch::watch_command;

use anyhow::{bail, Result};

use sh_core::SshTarget;
use sh_runner::SshHelper;

/// Find a target by full id, unique id prefix, or unique label
pub fn resolve_target(helper: &SshHelper, key: &str) -> Result<SshTarget> {
    let key = key.trim();
    if key.is_empty() {
        bail!("No target given");
    }

    let targets = helper.targets();
    if let Some(target) = targets.iter().find(|t| t.id == key) {
        return Ok(target.clone());
    }

    let by_prefix: Vec<&SshTarget> = targets.iter().filter(|t| t.id.starts_with(key)).collect();
    match by_prefix.len() {
        1 => return Ok(by_prefix[0].clone()),
        0 => {}
        n => bail!("'{}' matches {} target ids, use a longer prefix", key, n),
    }

    let by_label: Vec<&SshTarget> = targets
        .iter()
        .filter(|t| t.label.eq_ignore_ascii_case(key))
        .collect();
    match by_label.len() {
        1 => Ok(by_label[0].clone()),
        0 => bail!("No target matches '{}'", key),
        n => bail!("'{}' is the label of {} targets, use the id instead", key, n),
    }
}

//! Listing targets and editing labels, usernames and manual entries

use anyhow::{bail, Result};

use sh_core::SshTarget;
use sh_runner::{ManualEntryUpdate, SshHelper};

use super::resolve_target;
use crate::output::{format_targets, print_info, print_success};

/// Execute the list command
pub fn list_command(helper: &SshHelper, filter: Option<&str>, long: bool, json: bool) -> Result<()> {
    let targets = helper.targets();

    let targets: Vec<_> = match filter {
        Some(filter) => {
            let filter = filter.to_lowercase();
            targets
                .iter()
                .filter(|t| {
                    t.label.to_lowercase().contains(&filter)
                        || t.host_name.to_lowercase().contains(&filter)
                        || t.dns_name.to_lowercase().contains(&filter)
                })
                .cloned()
                .collect()
        }
        None => targets.to_vec(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        println!("{}", format_targets(&targets, long));
    }
    Ok(())
}

pub fn label_set(helper: &SshHelper, key: &str, label: &str) -> Result<()> {
    let target = resolve_target(helper, key)?;
    helper.set_label(&target.id, label)?;
    print_success(&format!("Label of {} updated", target.default_label));
    Ok(())
}

pub fn label_reset(helper: &SshHelper, key: &str) -> Result<()> {
    let target = resolve_target(helper, key)?;
    helper.reset_label(&target.id)?;
    print_success(&format!("Label of {} reset", target.default_label));
    Ok(())
}

/// Empty `user` removes the override
pub fn user_set(helper: &SshHelper, key: &str, user: &str) -> Result<()> {
    let target = resolve_target(helper, key)?;
    helper.set_username(&target.id, user)?;
    if user.trim().is_empty() {
        print_success(&format!("Username override of {} removed", target.label));
    } else {
        print_success(&format!("{} now connects as {}", target.label, user.trim()));
    }
    Ok(())
}

pub fn manual_add(helper: &SshHelper, name: &str, command: &str, description: &str) -> Result<()> {
    let id = helper.add_manual_entry(name, command, description)?;
    print_success(&format!("Added manual entry {}", id));
    Ok(())
}

fn resolve_manual(helper: &SshHelper, key: &str) -> Result<SshTarget> {
    let target = resolve_target(helper, key)?;
    if !target.is_manual {
        bail!("{} was discovered from {}, not added manually", target.label, target.origin);
    }
    Ok(target)
}

pub fn manual_update(helper: &SshHelper, key: &str, update: ManualEntryUpdate) -> Result<()> {
    let target = resolve_manual(helper, key)?;
    helper.update_manual_entry(&target.id, update)?;
    print_success(&format!("Updated manual entry {}", target.id));
    Ok(())
}

pub fn manual_remove(helper: &SshHelper, key: &str) -> Result<()> {
    let target = resolve_manual(helper, key)?;
    helper.remove_manual_entry(&target.id)?;
    print_success(&format!("Removed manual entry {}", target.label));
    Ok(())
}

/// Execute the reset command
pub fn reset_command(helper: &SshHelper) -> Result<()> {
    helper.reset_to_defaults()?;
    print_success("Settings reset to defaults");
    print_info(&format!("{} targets discovered", helper.targets().len()));
    Ok(())
}

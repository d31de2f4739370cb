//! Terminal preference commands

use anyhow::{bail, Result};

use sh_core::TerminalPreference;
use sh_runner::launcher::{find_candidate, terminal_display_name};
use sh_runner::SshHelper;

use crate::output::{format_terminals, print_info, print_success, print_warning};

pub fn terminal_show(helper: &SshHelper) -> Result<()> {
    let preference = helper.terminal_preference();
    if preference.is_auto() {
        print_info("Terminal: automatic");
    } else if preference.id == TerminalPreference::CUSTOM {
        print_info(&format!("Terminal: custom ({})", preference.custom_command));
    } else {
        print_info(&format!(
            "Terminal: {} ({})",
            terminal_display_name(&preference.id),
            preference.id
        ));
    }
    Ok(())
}

/// Set the terminal by id; `command` is required for `custom`
pub fn terminal_set(helper: &SshHelper, id: &str, command: Option<&str>) -> Result<()> {
    let id = id.trim();
    let preference = match (id, command) {
        (TerminalPreference::CUSTOM, command) => {
            TerminalPreference::custom(command.unwrap_or_default().trim())
        }
        (_, Some(_)) => bail!("--command only applies to the custom terminal"),
        (id, None) => {
            if id != TerminalPreference::AUTO && find_candidate(id).is_none() {
                print_warning(&format!(
                    "'{}' is not a known terminal, it will be run as a command",
                    id
                ));
            }
            TerminalPreference::new(id)
        }
    };

    helper.set_terminal_preference(preference)?;
    print_success(&format!("Terminal set to {}", id));
    Ok(())
}

pub fn terminal_list(helper: &SshHelper) -> Result<()> {
    let current = helper.terminal_preference();
    println!(
        "{}",
        format_terminals(&helper.available_terminals(), current.id.trim())
    );
    Ok(())
}

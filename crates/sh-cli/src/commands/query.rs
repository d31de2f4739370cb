//! Query and launch commands

use anyhow::{bail, Result};

use sh_runner::SshHelper;

use super::resolve_target;
use crate::output::{format_matches, print_error, print_success};

/// Queries are typed without the leading `ssh` on the command line
fn query_text(words: &[String]) -> String {
    let text = words.join(" ");
    if text.trim().is_empty() {
        "ssh".to_string()
    } else {
        format!("ssh {}", text.trim())
    }
}

/// Execute the query command
pub fn query_command(helper: &SshHelper, words: &[String], limit: usize, json: bool) -> Result<()> {
    let mut matches = helper.query(&query_text(words));
    if limit > 0 {
        matches.truncate(limit);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        println!("{}", format_matches(&matches));
    }
    Ok(())
}

/// Launch the best match for a query, or a target picked by id
pub fn launch_command(helper: &SshHelper, words: &[String], id: Option<&str>) -> Result<()> {
    let (label, arguments) = match id {
        Some(key) => {
            let target = resolve_target(helper, key)?;
            (target.label, target.ssh_arguments)
        }
        None => {
            let text = query_text(words);
            let Some(best) = helper.query(&text).into_iter().next() else {
                print_error(&format!("No host matches '{}'", words.join(" ")));
                bail!("nothing to launch");
            };
            (best.label, best.arguments)
        }
    };

    tracing::info!("Launching {} with {:?}", label, arguments);
    if helper.launch(&arguments) {
        print_success(&format!("Opened ssh {}", arguments.join(" ")));
        Ok(())
    } else {
        print_error("Could not start a terminal or ssh");
        bail!("launch failed for {}", label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text() {
        assert_eq!(query_text(&[]), "ssh");
        assert_eq!(query_text(&["  ".to_string()]), "ssh");
        assert_eq!(
            query_text(&["root@web".to_string(), "prod".to_string()]),
            "ssh root@web prod"
        );
    }
}

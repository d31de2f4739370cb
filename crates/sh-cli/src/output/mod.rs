//! Output formatting utilities for the CLI
//!
//! Tables for targets, query matches and terminals, plus colored status
//! lines.

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use tabled::{
    settings::{Style, Width},
    Table, Tabled,
};

use sh_core::{QueryMatch, SshTarget};
use sh_runner::launcher::{terminal_display_name, TerminalCandidate};

/// Format targets as a table.
///
/// The detailed view adds the full id, DNS name and description.
pub fn format_targets(targets: &[SshTarget], detailed: bool) -> String {
    if targets.is_empty() {
        return "No SSH targets found".to_string();
    }

    #[derive(Tabled)]
    struct TargetRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "LABEL")]
        label: String,
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "SOURCE")]
        source: String,
    }

    #[derive(Tabled)]
    struct TargetRowDetailed {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "LABEL")]
        label: String,
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "HOST")]
        host: String,
        #[tabled(rename = "DNS")]
        dns: String,
        #[tabled(rename = "SOURCE")]
        source: String,
        #[tabled(rename = "DESCRIPTION")]
        description: String,
    }

    if detailed {
        let rows: Vec<TargetRowDetailed> = targets
            .iter()
            .map(|t| TargetRowDetailed {
                id: t.id.clone(),
                label: t.label.clone(),
                command: ssh_command(&t.ssh_arguments),
                host: t.host_name.clone(),
                dns: or_dash(&t.dns_name),
                source: t.origin.to_string(),
                description: t.description.clone(),
            })
            .collect();

        Table::new(rows)
            .with(Style::rounded())
            .with(Width::wrap(140))
            .to_string()
    } else {
        let rows: Vec<TargetRow> = targets
            .iter()
            .map(|t| TargetRow {
                id: short_id(&t.id),
                label: t.label.clone(),
                command: ssh_command(&t.ssh_arguments),
                source: t.origin.to_string(),
            })
            .collect();

        Table::new(rows).with(Style::rounded()).to_string()
    }
}

/// Format ranked query matches as a table
pub fn format_matches(matches: &[QueryMatch]) -> String {
    if matches.is_empty() {
        return "No matching hosts".to_string();
    }

    #[derive(Tabled)]
    struct MatchRow {
        #[tabled(rename = "SCORE")]
        score: String,
        #[tabled(rename = "LABEL")]
        label: String,
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "DETAILS")]
        details: String,
    }

    let rows: Vec<MatchRow> = matches
        .iter()
        .map(|m| MatchRow {
            score: format!("{:.2}", m.relevance),
            label: m.label.clone(),
            command: ssh_command(&m.arguments),
            details: or_dash(&m.subtext),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format installed terminals, marking the configured one
pub fn format_terminals(terminals: &[&TerminalCandidate], current: &str) -> String {
    if terminals.is_empty() {
        return "No known terminal emulators installed".to_string();
    }

    #[derive(Tabled)]
    struct TerminalRow {
        #[tabled(rename = "")]
        marker: String,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
    }

    let rows: Vec<TerminalRow> = terminals
        .iter()
        .map(|t| TerminalRow {
            marker: if t.id == current { "*".to_string() } else { String::new() },
            id: t.id.to_string(),
            name: terminal_display_name(t.id),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn ssh_command(arguments: &[String]) -> String {
    format!("ssh {}", arguments.join(" "))
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Shorten `auto:<sha1>` ids for table display; prefixes are accepted as input
fn short_id(id: &str) -> String {
    truncate(id, 17)
}

/// Truncate a string with ellipsis if too long
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write `symbol msg` with the symbol in `color`
fn print_status(out: &mut impl std::io::Write, color: Color, symbol: &str, msg: &str) {
    let _ = crossterm::execute!(
        out,
        SetForegroundColor(color),
        Print(symbol),
        Print(" "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    print_status(&mut std::io::stdout(), Color::Green, "✓", msg);
}

/// Print an error message in red to stderr
pub fn print_error(msg: &str) {
    print_status(&mut std::io::stderr(), Color::Red, "✗", msg);
}

pub fn print_warning(msg: &str) {
    print_status(&mut std::io::stderr(), Color::Yellow, "⚠", msg);
}

pub fn print_info(msg: &str) {
    print_status(&mut std::io::stdout(), Color::Cyan, "ℹ", msg);
}

//! ssh-helper CLI
//!
//! Query the hosts found in `~/.ssh/config` and `~/.ssh/known_hosts`,
//! open them in a terminal, and manage labels, usernames, manual entries
//! and the terminal preference.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sh_runner::{HelperConfig, ManualEntryUpdate, SshHelper};
use ssh_helper::commands;

#[derive(Parser)]
#[command(name = "ssh-helper")]
#[command(author, version, about = "Fuzzy SSH host launcher")]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding the ssh config and known_hosts files
    #[arg(long, global = true, env = "SSH_HELPER_SSH_DIR")]
    ssh_dir: Option<PathBuf>,

    /// Path to the settings file
    #[arg(long, global = true, env = "SSH_HELPER_SETTINGS")]
    settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank hosts against a query such as "root@web"
    #[command(alias = "q")]
    Query {
        /// Query words, without the leading "ssh"
        words: Vec<String>,
        /// Show at most this many matches (0 for all)
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the best match for a query in a terminal
    Launch {
        /// Query words, without the leading "ssh"
        words: Vec<String>,
        /// Launch a target by id, id prefix or label instead
        #[arg(long, conflicts_with = "words")]
        id: Option<String>,
    },

    /// List all discovered and manual targets
    List {
        /// Only show targets whose label or host contains this text
        filter: Option<String>,
        /// Show detailed information
        #[arg(short, long)]
        long: bool,
        /// Print targets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage custom labels
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },

    /// Manage username overrides
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage manual entries
    Manual {
        #[command(subcommand)]
        action: ManualAction,
    },

    /// Manage the terminal used for launching
    Terminal {
        #[command(subcommand)]
        action: TerminalAction,
    },

    /// Drop all labels, overrides, manual entries and the terminal preference
    Reset,

    /// Reload whenever the ssh files or settings change
    Watch,
}

#[derive(Subcommand)]
enum LabelAction {
    /// Set the label of a target (empty restores the default)
    Set { target: String, label: String },
    /// Restore the default label
    Reset { target: String },
}

#[derive(Subcommand)]
enum UserAction {
    /// Connect to a target as a different user
    Set { target: String, user: String },
    /// Remove the username override
    Reset { target: String },
}

#[derive(Subcommand)]
enum ManualAction {
    /// Add an entry from ssh arguments, e.g. "-p 2222 admin@box"
    Add {
        /// ssh arguments as one shell-quoted string
        #[arg(allow_hyphen_values = true)]
        command: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Change an existing entry
    Update {
        target: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        command: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete an entry
    Remove { target: String },
}

#[derive(Subcommand)]
enum TerminalAction {
    /// Show the configured terminal
    Show,
    /// Choose a terminal by id, "auto" or "custom"
    Set {
        id: String,
        /// Command descriptor for the custom terminal, e.g. "foot -e"
        #[arg(long)]
        command: Option<String>,
    },
    /// List installed terminals
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = HelperConfig::default();
    if let Some(dir) = cli.ssh_dir {
        config = config.with_ssh_dir(dir);
    }
    if let Some(path) = cli.settings {
        config = config.with_settings_path(path);
    }
    tracing::debug!("Using {:?}", config);

    let helper = Arc::new(SshHelper::from_config(config));

    match cli.command {
        Commands::Query { words, limit, json } => {
            commands::query_command(&helper, &words, limit, json)?;
        }

        Commands::Launch { words, id } => {
            commands::launch_command(&helper, &words, id.as_deref())?;
        }

        Commands::List { filter, long, json } => {
            commands::list_command(&helper, filter.as_deref(), long, json)?;
        }

        Commands::Label { action } => match action {
            LabelAction::Set { target, label } => commands::label_set(&helper, &target, &label)?,
            LabelAction::Reset { target } => commands::label_reset(&helper, &target)?,
        },

        Commands::User { action } => match action {
            UserAction::Set { target, user } => commands::user_set(&helper, &target, &user)?,
            UserAction::Reset { target } => commands::user_set(&helper, &target, "")?,
        },

        Commands::Manual { action } => match action {
            ManualAction::Add {
                command,
                name,
                description,
            } => commands::manual_add(&helper, &name, &command, &description)?,
            ManualAction::Update {
                target,
                name,
                command,
                description,
            } => commands::manual_update(
                &helper,
                &target,
                ManualEntryUpdate {
                    name,
                    command,
                    description,
                },
            )?,
            ManualAction::Remove { target } => commands::manual_remove(&helper, &target)?,
        },

        Commands::Terminal { action } => match action {
            TerminalAction::Show => commands::terminal_show(&helper)?,
            TerminalAction::Set { id, command } => {
                commands::terminal_set(&helper, &id, command.as_deref())?
            }
            TerminalAction::List => commands::terminal_list(&helper)?,
        },

        Commands::Reset => commands::reset_command(&helper)?,

        Commands::Watch => commands::watch_command(helper).await?,
    }

    Ok(())
}

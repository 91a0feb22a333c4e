//! vtmark CLI entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use vtmark::commands;
use vtmark::Config;

/// Version string with git SHA and build date for dev builds.
fn long_version() -> String {
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) if sha != "unknown" => format!(
            "{} ({} {})",
            env!("CARGO_PKG_VERSION"),
            &sha[..sha.len().min(7)],
            env!("VTMARK_BUILD_DATE")
        ),
        _ => format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("VTMARK_BUILD_DATE")),
    }
}

#[derive(Parser)]
#[command(
    name = "vtmark",
    version,
    long_version = long_version(),
    about = "Save, list and jump back to timestamps in streaming videos"
)]
struct Cli {
    /// Override the timestamp store path
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a timestamp for a video URL
    Save {
        /// Watch-page URL (must carry a v= parameter)
        #[arg(long)]
        url: String,
        /// Video title to record
        #[arg(long, default_value = "Unknown Video")]
        title: String,
        /// Position: MM:SS, HH:MM:SS, or seconds
        #[arg(long)]
        at: String,
    },
    /// List saved timestamps
    List {
        /// Only show records for this video id
        #[arg(long)]
        video: Option<String>,
    },
    /// Delete a saved timestamp by id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Open a saved timestamp's deep link in the browser
    Open { id: String },
    /// Render the marker track for a video
    Markers {
        /// Video id to render markers for
        #[arg(long)]
        video: String,
        /// Video duration: MM:SS, HH:MM:SS, or seconds
        #[arg(long)]
        duration: String,
        /// Track width in characters
        #[arg(long, default_value_t = 60)]
        width: usize,
    },
    /// Interactive popup over the saved timestamps
    Popup {
        /// Scope the popup to one video id
        #[arg(long)]
        video: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Open the configuration in $EDITOR
    Edit,
    /// Print the configuration file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Command::Save { url, title, at } => {
            let store = commands::open_store(&config, cli.store.as_ref())?;
            commands::records::handle_save(store, &config, &url, &title, &at)
        }
        Command::List { video } => {
            let store = commands::open_store(&config, cli.store.as_ref())?;
            commands::records::handle_list(store, video.as_deref())
        }
        Command::Delete { id, yes } => {
            let store = commands::open_store(&config, cli.store.as_ref())?;
            commands::records::handle_delete(store, &id, yes)
        }
        Command::Open { id } => {
            let store = commands::open_store(&config, cli.store.as_ref())?;
            commands::records::handle_open(store, &config, &id)
        }
        Command::Markers {
            video,
            duration,
            width,
        } => {
            let store = commands::open_store(&config, cli.store.as_ref())?;
            commands::markers::handle_markers(store, &video, &duration, width)
        }
        Command::Popup { video } => {
            let store = commands::open_store(&config, cli.store.as_ref())?;
            commands::popup::handle_popup(store, &config, video.as_deref())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => commands::config::handle_show(),
            ConfigAction::Edit => commands::config::handle_edit(),
            ConfigAction::Path => commands::config::handle_path(),
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

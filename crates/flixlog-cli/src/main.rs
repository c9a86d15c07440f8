//! # flixlog
//!
//! Command-line front end for the FlixLog annotation journal: inspect and
//! edit shows, annotations and friends, and move journals in and out as
//! JSON.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flixlog_store::{Journal, KeyValueStore, MemoryStore, SqliteStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{BackendKind, CliConfig};

#[derive(Parser)]
#[command(name = "flixlog")]
#[command(about = "Personal show journal with timestamped annotations", long_about = None)]
struct Cli {
    /// SQLite database path (overrides FLIXLOG_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every show in the journal
    List,
    /// Print one show with its annotations (no creation)
    Show { title: String },
    /// Find a show by title, creating it on first use
    Open { title: String },
    /// Set the review text and rating of a show
    Review {
        show_id: String,
        text: String,
        /// Rating 0-5; anything else is clamped, non-numbers count as 0
        #[arg(short, long, default_value = "0")]
        rating: String,
    },
    /// Add an annotation at a playback position (seconds or mm:ss)
    Annotate {
        show_id: String,
        position: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Remove an annotation
    Unannotate { show_id: String, annotation_id: String },
    /// Delete a show and everything attached to it
    Delete { show_id: String },
    /// Manage the friends a show is shared with
    Friend {
        #[command(subcommand)]
        action: FriendAction,
    },
    /// Manage the global friend registry
    GlobalFriend {
        #[command(subcommand)]
        action: GlobalFriendAction,
    },
    /// Manage friend nicknames
    Nickname {
        #[command(subcommand)]
        action: NicknameAction,
    },
    /// Export one show's annotations for sharing
    ExportShow {
        show_id: String,
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        out: String,
    },
    /// Merge a shared annotation file into a show
    ImportShow {
        show_id: String,
        /// Input file ("-" for stdin)
        input: String,
    },
    /// Export the whole journal
    Export {
        /// Output file ("-" for stdout)
        #[arg(short, long, default_value = "-")]
        out: String,
    },
    /// Replace the whole journal with a backup
    Import {
        /// Input file ("-" for stdin)
        input: String,
    },
    /// Delete every show
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Print this device's identity
    DeviceId,
}

#[derive(Subcommand)]
enum FriendAction {
    Add { show_id: String, friend_id: String },
    Remove { show_id: String, friend_id: String },
    List { show_id: String },
}

#[derive(Subcommand)]
enum GlobalFriendAction {
    Add { friend_id: String },
    /// Remove a friend from the registry and from every show
    Remove { friend_id: String },
    List,
}

#[derive(Subcommand)]
enum NicknameAction {
    /// Set a nickname; an empty nickname clears it
    Set { friend_id: String, nickname: String },
    Get { friend_id: String },
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("flixlog=info,flixlog_store=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().with_db_path(cli.db.clone());
    info!(?config, "Loaded configuration");
    if !config.backend.is_persistent() {
        warn!("In-memory backend selected, changes are discarded on exit");
    }

    let journal = open_journal(&config)?;
    commands::run(&journal, cli.command).await
}

fn open_journal(config: &CliConfig) -> anyhow::Result<Journal> {
    let backend: Arc<dyn KeyValueStore> = match config.backend {
        BackendKind::Memory => Arc::new(MemoryStore::new()),
        BackendKind::Sqlite => {
            let store = match &config.db_path {
                Some(path) => SqliteStore::open_at(path),
                None => SqliteStore::open_default(),
            }
            .context("Failed to open journal database")?;
            Arc::new(store)
        }
    };
    Ok(Journal::new(backend))
}

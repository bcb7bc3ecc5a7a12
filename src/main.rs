//! tgarchive-admin - Terminal admin client for a Telegram channel archive
//!
//! Talks to the archive REST backend to list, create, update, and delete
//! stored channel posts, either one-shot from the command line or through
//! the interactive admin panel (`tui`).

mod api;
mod config;
mod models;
mod tui;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::client::ArchiveClient;
use config::Config;
use models::DraftInput;

#[derive(Parser)]
#[command(name = "tgarchive-admin")]
#[command(about = "Admin client for a Telegram channel archive REST API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the configured API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List archived messages
    List {
        /// Number of records to skip
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Maximum number of records to show (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a single message by id
    Show {
        /// Record id (from `list` output)
        id: i64,
    },

    /// Create a new message record
    Create {
        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Replace an existing message record
    Update {
        /// Record id (from `list` output)
        id: i64,

        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Delete a message record
    Delete {
        /// Record id (from `list` output)
        id: i64,
    },

    /// Launch the interactive admin panel
    Tui,
}

/// The eight client-supplied record fields.
///
/// `message_id` and `message_date` are taken as text and validated before
/// any request is sent.
#[derive(Args)]
struct DraftArgs {
    /// Display name of the source channel
    #[arg(long)]
    channel_title: String,

    /// Handle of the source channel
    #[arg(long)]
    channel_username: String,

    /// Telegram message identifier (integer)
    #[arg(long)]
    message_id: String,

    /// Message body text
    #[arg(long)]
    message: String,

    /// Message timestamp, e.g. 2024-01-15T10:30:00 (UTC) or RFC 3339
    #[arg(long)]
    message_date: String,

    /// Path or URL of attached media
    #[arg(long, default_value = "")]
    media_path: String,

    /// Emoji content description
    #[arg(long, default_value = "")]
    emoji_used: String,

    /// Extracted YouTube links
    #[arg(long, default_value = "")]
    youtube_links: String,
}

impl DraftArgs {
    fn into_input(self) -> DraftInput {
        DraftInput {
            channel_title: self.channel_title,
            channel_username: self.channel_username,
            message_id: self.message_id,
            message: self.message,
            message_date: self.message_date,
            media_path: self.media_path,
            emoji_used: self.emoji_used,
            youtube_links: self.youtube_links,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    // In TUI mode, log output goes to the in-app console ring instead of
    // stderr, which the alternate screen would garble.
    let log_ring = tui::LogRing::new();
    if matches!(cli.command, Commands::Tui) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(log_ring.clone()),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }

    let mut config = Config::load()?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    let client = ArchiveClient::from_config(&config);

    match cli.command {
        Commands::List { skip, limit } => {
            let limit = limit.unwrap_or(config.page_size);
            api::list_messages(&client, skip, limit).await?;
        }
        Commands::Show { id } => {
            api::show_message(&client, id).await?;
        }
        Commands::Create { fields } => {
            let draft = fields.into_input().validate()?;
            api::create_message(&client, &draft).await?;
        }
        Commands::Update { id, fields } => {
            let draft = fields.into_input().validate()?;
            api::update_message(&client, id, &draft).await?;
        }
        Commands::Delete { id } => {
            api::delete_message(&client, id).await?;
        }
        Commands::Tui => {
            tui::run(client, log_ring, config.page_size).await?;
        }
    }

    Ok(())
}

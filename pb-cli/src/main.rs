//! Pushbullet CLI - command-line front end for the Pushbullet client.
//!
//! Reads `~/.pushbulletrc` (optionally layered with another settings file),
//! builds a `PushClient` and runs one command against the service.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use pb_api::PushClient;
use pb_core::config::{SettingsInput, SettingsLoader};
use pb_core::error::PbResult;
use pb_core::logging;

/// Pushbullet - send pushes and manage devices from the terminal.
#[derive(Parser)]
#[command(
    name = "pushbullet",
    version,
    about = "Pushbullet client CLI",
    long_about = "A command-line interface for the Pushbullet API.\n\
                   Settings are read from ~/.pushbulletrc and may be overridden with --settings."
)]
struct Cli {
    /// JSON settings file layered over ~/.pushbulletrc.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Show debug logging on the terminal.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List and manage devices.
    Devices {
        #[command(subcommand)]
        action: commands::devices::DevicesAction,
    },
    /// Send a push.
    Push {
        #[command(subcommand)]
        action: commands::pushes::PushAction,
    },
    /// Show pushes modified after a point in time.
    History {
        /// UNIX timestamp; 0 lists everything.
        #[arg(long, default_value = "0")]
        since: f64,
        /// Maximum number of pushes to display.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Mark a push as dismissed.
    Dismiss {
        /// Push iden.
        iden: String,
    },
    /// Delete a push.
    #[command(name = "delete-push")]
    DeletePush {
        /// Push iden.
        iden: String,
    },
    /// List and manage contacts.
    Contacts {
        #[command(subcommand)]
        action: commands::contacts::ContactsAction,
    },
    /// Show the current user.
    Me,
    /// Upload a file and print its download URL.
    Upload {
        /// File to upload.
        path: PathBuf,
        /// Name to upload under (defaults to the file name).
        #[arg(long)]
        name: Option<String>,
        /// MIME type (guessed from the name when omitted).
        #[arg(long = "type")]
        file_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> PbResult<()> {
    let cli = Cli::parse();

    // Load settings
    let loader = SettingsLoader::from_default_location()?;
    let input = cli.settings.map(SettingsInput::Path);
    let settings = loader.load(input)?;

    // Initialize logging
    let log_dir = settings.effective_log_dir()?;
    let _guard = logging::init_logging(&settings.logging, &log_dir, cli.verbose)?;

    info!("Pushbullet CLI v{}", pb_core::constants::APP_VERSION);

    let client = PushClient::new(settings)?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Devices { action } => commands::devices::run(&client, action, cli.format).await,
        Commands::Push { action } => commands::pushes::run(&client, action, cli.format).await,
        Commands::History { since, limit } => {
            commands::pushes::history(&client, since, limit, cli.format).await
        }
        Commands::Dismiss { iden } => commands::pushes::dismiss(&client, &iden, cli.format).await,
        Commands::DeletePush { iden } => commands::pushes::delete(&client, &iden).await,
        Commands::Contacts { action } => commands::contacts::run(&client, action, cli.format).await,
        Commands::Me => commands::user::me(&client, cli.format).await,
        Commands::Upload { path, name, file_type } => {
            commands::upload::run(&client, &path, name.as_deref(), file_type.as_deref(), cli.format)
                .await
        }
    }
}

//! Push commands: sending, history, dismiss and delete.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use pb_api::{Push, PushClient, PushTarget};
use pb_core::error::{PbError, PbResult};

use super::{field, format_timestamp, new_table, print_json, truncate};
use crate::OutputFormat;

/// Where a push is delivered. Defaults to all of your devices.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Send to one device.
    #[arg(short, long, conflicts_with = "email")]
    device: Option<String>,
    /// Send to a user or contact by email.
    #[arg(short, long)]
    email: Option<String>,
}

impl TargetArgs {
    fn into_target(self) -> PushTarget {
        match (self.device, self.email) {
            (Some(iden), _) => PushTarget::device(iden),
            (None, Some(email)) => PushTarget::email(email),
            (None, None) => PushTarget::all_devices(),
        }
    }
}

#[derive(Subcommand)]
pub enum PushAction {
    /// Send a note.
    Note {
        title: String,
        body: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Send a link.
    Link {
        title: String,
        url: String,
        /// Optional message shown with the link.
        #[arg(short, long)]
        body: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Send an address.
    Address {
        /// Place name.
        name: String,
        address: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Send a checklist.
    List {
        title: String,
        /// List items, in order.
        #[arg(required = true)]
        items: Vec<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Upload a file and push it.
    File {
        path: PathBuf,
        /// Optional message shown with the file.
        #[arg(short, long)]
        body: Option<String>,
        /// Name to upload under (defaults to the file name).
        #[arg(long)]
        name: Option<String>,
        /// MIME type (guessed from the name when omitted).
        #[arg(long = "type")]
        file_type: Option<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
}

pub async fn run(client: &PushClient, action: PushAction, format: OutputFormat) -> PbResult<()> {
    let (push, target) = match action {
        PushAction::Note { title, body, target } => (Push::Note { title, body }, target),
        PushAction::Link { title, url, body, target } => (Push::Link { title, url, body }, target),
        PushAction::Address { name, address, target } => (Push::Address { name, address }, target),
        PushAction::List { title, items, target } => (Push::List { title, items }, target),
        PushAction::File { path, body, name, file_type, target } => {
            let ticket = client
                .upload_file(&path, name.as_deref(), file_type.as_deref())
                .await?;
            (Push::from_ticket(&ticket, body)?, target)
        }
    };

    let kind = push.kind();
    let sent = client.push(&push, &target.into_target()).await?;
    match format {
        OutputFormat::Json => print_json(&sent),
        OutputFormat::Text => println!(
            "  {} Pushed {} ({})",
            style("OK").green().bold(),
            kind,
            field(&sent, "iden")
        ),
    }
    Ok(())
}

pub async fn history(
    client: &PushClient,
    since: f64,
    limit: Option<usize>,
    format: OutputFormat,
) -> PbResult<()> {
    if !since.is_finite() || since < 0.0 {
        return Err(PbError::Usage(format!("--since must be a UNIX timestamp, got {since}")));
    }
    let mut pushes = client.push_history(since).await?;
    if let Some(lim) = limit {
        pushes.truncate(lim);
    }

    match format {
        OutputFormat::Json => print_json(&pushes),
        OutputFormat::Text => {
            if pushes.is_empty() {
                println!("No pushes.");
                return Ok(());
            }
            let mut table = new_table(vec!["Iden", "Type", "Title", "Body", "Modified", "Dismissed"]);
            for p in &pushes {
                table.add_row(vec![
                    field(p, "iden"),
                    field(p, "type"),
                    truncate(&field(p, "title"), 30),
                    truncate(&field(p, "body"), 40),
                    format_timestamp(p.get("modified").unwrap_or(&Value::Null)),
                    field(p, "dismissed"),
                ]);
            }
            println!("{table}");
            println!("\n{} push(es)", pushes.len());
        }
    }
    Ok(())
}

pub async fn dismiss(client: &PushClient, iden: &str, format: OutputFormat) -> PbResult<()> {
    let push = client.dismiss_push(iden).await?;
    match format {
        OutputFormat::Json => print_json(&push),
        OutputFormat::Text => println!("  {} Dismissed push {}", style("OK").green().bold(), iden),
    }
    Ok(())
}

pub async fn delete(client: &PushClient, iden: &str) -> PbResult<()> {
    client.delete_push(iden).await?;
    println!("  {} Deleted push {}", style("OK").green().bold(), iden);
    Ok(())
}

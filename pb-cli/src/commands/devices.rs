//! Device commands.

use clap::Subcommand;
use console::style;

use pb_api::PushClient;
use pb_core::error::PbResult;

use super::{field, new_table, print_json};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum DevicesAction {
    /// List devices.
    List {
        /// Include inactive (deleted) devices.
        #[arg(long)]
        all: bool,
    },
    /// Register a new device.
    Create {
        /// Display name for the device.
        nickname: String,
        /// Device type as reported to the service.
        #[arg(long = "type", default_value = "stream")]
        device_type: String,
    },
    /// Delete a device.
    Delete {
        /// Device iden.
        iden: String,
    },
}

pub async fn run(client: &PushClient, action: DevicesAction, format: OutputFormat) -> PbResult<()> {
    match action {
        DevicesAction::List { all } => {
            let devices: Vec<_> = client
                .devices()
                .await?
                .into_iter()
                .filter(|d| all || d.get("active").and_then(|v| v.as_bool()).unwrap_or(true))
                .collect();

            match format {
                OutputFormat::Json => print_json(&devices),
                OutputFormat::Text => {
                    if devices.is_empty() {
                        println!("No devices.");
                    } else {
                        let mut table = new_table(vec!["Iden", "Nickname", "Type", "Model"]);
                        for d in &devices {
                            table.add_row(vec![
                                field(d, "iden"),
                                field(d, "nickname"),
                                field(d, "type"),
                                field(d, "model"),
                            ]);
                        }
                        println!("{table}");
                        println!("\n{} device(s)", devices.len());
                    }
                }
            }
        }
        DevicesAction::Create { nickname, device_type } => {
            let device = client.create_device(&nickname, &device_type).await?;
            match format {
                OutputFormat::Json => print_json(&device),
                OutputFormat::Text => println!(
                    "  {} Created device {} ({})",
                    style("OK").green().bold(),
                    nickname,
                    field(&device, "iden")
                ),
            }
        }
        DevicesAction::Delete { iden } => {
            client.delete_device(&iden).await?;
            println!("  {} Deleted device {}", style("OK").green().bold(), iden);
        }
    }

    Ok(())
}

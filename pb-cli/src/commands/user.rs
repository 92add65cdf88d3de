//! Current-user command.

use console::style;

use pb_api::PushClient;
use pb_core::error::PbResult;

use super::{field, print_json};
use crate::OutputFormat;

pub async fn me(client: &PushClient, format: OutputFormat) -> PbResult<()> {
    let user = client.me().await?;
    match format {
        OutputFormat::Json => print_json(&user),
        OutputFormat::Text => {
            println!("{}", style("Current User").bold().underlined());
            println!("  Name:      {}", field(&user, "name"));
            println!("  Email:     {}", field(&user, "email"));
            println!("  Iden:      {}", field(&user, "iden"));
            if let Some(limit) = user.get("max_upload_size").and_then(|v| v.as_u64()) {
                println!("  Upload:    up to {}", super::format_bytes(limit));
            }
        }
    }
    Ok(())
}

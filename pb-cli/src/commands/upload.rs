//! Upload command.

use std::path::Path;

use console::style;

use pb_api::PushClient;
use pb_core::error::PbResult;

use super::print_json;
use crate::OutputFormat;

pub async fn run(
    client: &PushClient,
    path: &Path,
    name: Option<&str>,
    file_type: Option<&str>,
    format: OutputFormat,
) -> PbResult<()> {
    let size = std::fs::metadata(path)?.len();

    if matches!(format, OutputFormat::Text) {
        println!("  {} Uploading {}...", style("...").dim(), path.display());
    }
    let ticket = client.upload_file(path, name, file_type).await?;

    match format {
        OutputFormat::Json => print_json(&ticket),
        OutputFormat::Text => {
            println!(
                "  {} Uploaded {} ({}, {})",
                style("OK").green().bold(),
                ticket.file_name,
                ticket.file_type,
                super::format_bytes(size)
            );
            if let Some(url) = &ticket.file_url {
                println!("  URL:       {url}");
            }
        }
    }
    Ok(())
}

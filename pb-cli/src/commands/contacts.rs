//! Contact commands.

use clap::Subcommand;
use console::style;

use pb_api::PushClient;
use pb_core::error::PbResult;

use super::{field, new_table, print_json};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ContactsAction {
    /// List contacts.
    List {
        /// Maximum number of contacts to display.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Create a contact.
    Create {
        /// Contact name.
        name: String,
        /// Contact email address.
        email: String,
    },
    /// Delete a contact.
    Delete {
        /// Contact iden.
        iden: String,
    },
}

pub async fn run(client: &PushClient, action: ContactsAction, format: OutputFormat) -> PbResult<()> {
    match action {
        ContactsAction::List { limit } => {
            let mut contacts = client.contacts().await?;
            if let Some(lim) = limit {
                contacts.truncate(lim);
            }

            match format {
                OutputFormat::Json => print_json(&contacts),
                OutputFormat::Text => {
                    if contacts.is_empty() {
                        println!("No contacts.");
                    } else {
                        let mut table = new_table(vec!["Iden", "Name", "Email"]);
                        for c in &contacts {
                            table.add_row(vec![field(c, "iden"), field(c, "name"), field(c, "email")]);
                        }
                        println!("{table}");
                        println!("\n{} contact(s) shown", contacts.len());
                    }
                }
            }
        }
        ContactsAction::Create { name, email } => {
            let contact = client.create_contact(&name, &email).await?;
            match format {
                OutputFormat::Json => print_json(&contact),
                OutputFormat::Text => println!(
                    "  {} Created contact {} <{}>",
                    style("OK").green().bold(),
                    name,
                    email
                ),
            }
        }
        ContactsAction::Delete { iden } => {
            client.delete_contact(&iden).await?;
            println!("  {} Deleted contact {}", style("OK").green().bold(), iden);
        }
    }

    Ok(())
}

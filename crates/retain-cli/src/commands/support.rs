//! Support ticket commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use retain::Session;

use crate::output;
use crate::session::require_login;

#[derive(Args, Debug)]
pub struct SupportCommand {
    #[command(subcommand)]
    pub command: SupportSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SupportSubcommand {
    /// List your tickets
    List,

    /// Open a ticket
    Create {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        message: String,
    },
}

pub async fn handle(cmd: SupportCommand, session: &Session) -> Result<()> {
    require_login(session)?;

    match cmd.command {
        SupportSubcommand::List => {
            let tickets = session
                .support()
                .tickets()
                .await
                .context("Failed to list tickets")?;
            if tickets.is_empty() {
                output::note("No tickets.");
            }
            for ticket in &tickets {
                output::json(ticket)?;
            }
        }
        SupportSubcommand::Create { subject, message } => {
            let ticket = session
                .support()
                .create_ticket(&subject, &message)
                .await
                .context("Failed to create ticket")?;
            output::success(&format!("Opened ticket {}", ticket.id));
        }
    }

    Ok(())
}

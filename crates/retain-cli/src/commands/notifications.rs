//! Notification commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use retain::Session;
use retain::api::NotificationKind;

use crate::output;
use crate::session::require_login;

#[derive(Args, Debug)]
pub struct NotificationsCommand {
    #[command(subcommand)]
    pub command: NotificationsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NotificationsSubcommand {
    /// List notifications
    List,

    /// Mark one notification as read
    Read { id: i64 },

    /// Mark every notification as read
    ReadAll,
}

pub async fn handle(cmd: NotificationsCommand, session: &Session) -> Result<()> {
    require_login(session)?;
    let notifications = session.notifications();

    match cmd.command {
        NotificationsSubcommand::List => {
            let list = notifications
                .list()
                .await
                .context("Failed to list notifications")?;
            if list.is_empty() {
                output::note("No notifications.");
            }
            for n in &list {
                let title = match n.kind {
                    NotificationKind::Warning => n.title.yellow(),
                    NotificationKind::Error => n.title.red(),
                    NotificationKind::Success => n.title.green(),
                    NotificationKind::Info => n.title.normal(),
                };
                let marker = if n.is_read { " " } else { "*" };
                println!("{} {:>5}  {}  {}", marker, n.id, title, n.message.dimmed());
            }
        }
        NotificationsSubcommand::Read { id } => {
            notifications
                .mark_read(id)
                .await
                .context("Failed to mark notification as read")?;
            output::success(&format!("Marked notification {} as read", id));
        }
        NotificationsSubcommand::ReadAll => {
            notifications
                .mark_all_read()
                .await
                .context("Failed to mark notifications as read")?;
            output::success("Marked all notifications as read");
        }
    }

    Ok(())
}

//! Subcommand implementations.

pub mod auth;
pub mod notifications;
pub mod predict;
pub mod students;
pub mod support;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use retain::Session;
use retain::api::PredictionInput;

use crate::cli::Commands;

pub async fn handle(command: Commands, session: &Session) -> Result<()> {
    match command {
        Commands::Login(args) => auth::login(args, session).await,
        Commands::Logout(args) => auth::logout(args, session),
        Commands::Status(args) => auth::status(args, session),
        Commands::Register(args) => auth::register(args, session).await,
        Commands::Predict(args) => predict::predict(args, session).await,
        Commands::ClassAverage(args) => predict::class_average(args, session).await,
        Commands::Health(args) => predict::health(args, session).await,
        Commands::Upload(args) => predict::upload(args, session).await,
        Commands::Students(cmd) => students::handle(cmd, session).await,
        Commands::Support(cmd) => support::handle(cmd, session).await,
        Commands::Notifications(cmd) => notifications::handle(cmd, session).await,
    }
}

/// Read a student's attributes from a JSON file.
fn read_input(path: &Path) -> Result<PredictionInput> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid student data in {}", path.display()))
}

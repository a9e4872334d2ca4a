//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    auth::{LoginArgs, LogoutArgs, RegisterArgs, StatusArgs},
    notifications::NotificationsCommand,
    predict::{ClassAverageArgs, HealthArgs, PredictArgs, UploadArgs},
    students::StudentsCommand,
    support::SupportCommand,
};

/// Client for the student-retention prediction API.
#[derive(Parser, Debug)]
#[command(name = "retain")]
#[command(author, version = env!("RETAIN_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(
        long,
        global = true,
        env = "RETAIN_API_URL",
        default_value = retain::types::DEFAULT_API_URL
    )]
    pub api_url: String,

    /// Credential file (defaults to the user data directory)
    #[arg(long, global = true, env = "RETAIN_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the credential pair
    Login(LoginArgs),

    /// Forget the stored credentials
    Logout(LogoutArgs),

    /// Show whether a session is stored
    Status(StatusArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Predict the outcome for one student
    Predict(PredictArgs),

    /// Show cohort averages
    ClassAverage(ClassAverageArgs),

    /// Check API health
    Health(HealthArgs),

    /// Upload a CSV of students for bulk prediction
    Upload(UploadArgs),

    /// Stored student records
    Students(StudentsCommand),

    /// Support tickets
    Support(SupportCommand),

    /// Notifications
    Notifications(NotificationsCommand),
}

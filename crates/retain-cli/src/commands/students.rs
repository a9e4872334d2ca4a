//! Student record commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use retain::Session;
use retain::api::Student;

use super::read_input;
use crate::output;
use crate::session::require_login;

/// Dropout probability above which the API flags a student as high risk.
const HIGH_RISK_THRESHOLD: f64 = 0.7;

#[derive(Args, Debug)]
pub struct StudentsCommand {
    #[command(subcommand)]
    pub command: StudentsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StudentsSubcommand {
    /// List stored students
    List {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Show one student
    Get { id: i64 },

    /// Store a student from a JSON file
    Create { input: PathBuf },

    /// Replace a student's attributes from a JSON file
    Update { id: i64, input: PathBuf },

    /// Delete a student
    Delete { id: i64 },
}

pub async fn handle(cmd: StudentsCommand, session: &Session) -> Result<()> {
    require_login(session)?;
    let students = session.students();

    match cmd.command {
        StudentsSubcommand::List { json } => {
            let list = students.list().await.context("Failed to list students")?;

            if list.is_empty() {
                output::note("No students found.");
                return Ok(());
            }

            for student in &list {
                if json {
                    output::json(student)?;
                } else {
                    print_summary(student);
                }
            }
        }
        StudentsSubcommand::Get { id } => {
            let student = students.get(id).await.context("Failed to fetch student")?;
            output::json_pretty(&student)?;
        }
        StudentsSubcommand::Create { input } => {
            let input = read_input(&input)?;
            let student = students
                .create(&input)
                .await
                .context("Failed to create student")?;
            output::success(&format!("Created student {}", student.id));
        }
        StudentsSubcommand::Update { id, input } => {
            let input = read_input(&input)?;
            students
                .update(id, &input)
                .await
                .context("Failed to update student")?;
            output::success(&format!("Updated student {}", id));
        }
        StudentsSubcommand::Delete { id } => {
            students.delete(id).await.context("Failed to delete student")?;
            output::success(&format!("Deleted student {}", id));
        }
    }

    Ok(())
}

fn print_summary(student: &Student) {
    let prediction = student.last_prediction.as_deref().unwrap_or("-");
    let risk = match student.last_dropout_probability {
        Some(p) => output::risk(p, p > HIGH_RISK_THRESHOLD),
        None => "-".dimmed().to_string(),
    };
    println!(
        "{:>6}  {:<10} {:>7}  {}",
        student.id,
        prediction,
        risk,
        student.updated_at.format("%Y-%m-%d").to_string().dimmed()
    );
}

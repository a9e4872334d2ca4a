//! Predictions, cohort statistics and bulk upload.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use retain::Session;

use super::read_input;
use crate::output;
use crate::session::require_login;

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON file with the student's attributes
    pub input: PathBuf,

    /// Store the student record alongside the prediction
    #[arg(long)]
    pub save: bool,

    /// Print the raw JSON result
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ClassAverageArgs {
    /// Print the raw JSON result
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct HealthArgs {}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// CSV file of students
    pub file: PathBuf,
}

pub async fn predict(args: PredictArgs, session: &Session) -> Result<()> {
    require_login(session)?;
    let input = read_input(&args.input)?;

    let result = session
        .predictions()
        .predict(&input, args.save)
        .await
        .context("Prediction failed")?;

    if args.json {
        return output::json_pretty(&result);
    }

    output::field("Predicted", &result.predicted_class);
    output::field(
        "Dropout risk",
        &output::risk(result.dropout_probability, result.high_risk),
    );
    output::field("Grade trend", &format!("{:+.2}", result.grade_trend));
    for (class, probability) in &result.all_probabilities {
        output::field(&format!("  {}", class), &format!("{:.1}%", probability * 100.0));
    }
    if result.intervention_recommended {
        println!("{}", "Intervention recommended".yellow().bold());
    }
    if let Some(id) = result.saved_record_id {
        output::success(&format!("Saved as student {}", id));
    }

    Ok(())
}

pub async fn class_average(args: ClassAverageArgs, session: &Session) -> Result<()> {
    require_login(session)?;

    let avg = session
        .predictions()
        .class_average()
        .await
        .context("Failed to fetch class average")?;

    if args.json {
        return output::json_pretty(&avg);
    }

    output::field("1st semester grade", &format!("{:.2}", avg.first_sem_grade));
    output::field("2nd semester grade", &format!("{:.2}", avg.second_sem_grade));
    output::field("1st semester approved", &format!("{:.2}", avg.first_sem_approved));
    output::field("2nd semester approved", &format!("{:.2}", avg.second_sem_approved));
    output::field("1st semester enrolled", &format!("{:.2}", avg.first_sem_enrolled));
    output::field("2nd semester enrolled", &format!("{:.2}", avg.second_sem_enrolled));
    output::field("Admission grade", &format!("{:.2}", avg.admission_grade));

    Ok(())
}

pub async fn health(_args: HealthArgs, session: &Session) -> Result<()> {
    let health = session
        .predictions()
        .health()
        .await
        .context("Health check failed")?;

    output::field("Status", &health.status);
    output::field("Models loaded", &health.ml_models_loaded.to_string());

    Ok(())
}

pub async fn upload(args: UploadArgs, session: &Session) -> Result<()> {
    require_login(session)?;

    let bytes = fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());

    output::note(&format!("Uploading {} ({} bytes)...", file_name, bytes.len()));

    let summary = session
        .predictions()
        .upload_csv(&file_name, bytes)
        .await
        .context("Upload failed")?;

    output::success(&summary.message);
    output::field("Processed", &summary.processed_count.to_string());
    output::field("High risk", &summary.high_risk_count.to_string());
    for error in &summary.errors {
        output::error(error);
    }

    Ok(())
}

//! Session construction for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use retain::{ApiUrl, FileCredentialStore, Session};

use crate::output;

const CREDENTIALS_FILE: &str = "credentials.json";

/// Default credential file under the user data directory.
fn default_credentials_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "retain").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join(CREDENTIALS_FILE))
}

/// Build a session over the credential file at `credentials`, or the default one.
///
/// When the stored session cannot be recovered the library clears the file;
/// the hook only tells the user about it.
pub fn open(api_url: &str, credentials: Option<&Path>) -> Result<Session> {
    let api = ApiUrl::new(api_url).context("Invalid API URL")?;

    let path = match credentials {
        Some(path) => path.to_path_buf(),
        None => default_credentials_path()?,
    };
    tracing::debug!(path = %path.display(), "Using credential file");

    Session::builder(api)
        .store(Arc::new(FileCredentialStore::new(path)))
        .on_force_logout(|| {
            output::error("Session expired. Run 'retain login' to log in again.");
        })
        .build()
        .context("Failed to create session")
}

/// Fail early when no credentials are stored.
pub fn require_login(session: &Session) -> Result<()> {
    anyhow::ensure!(
        session.is_authenticated(),
        "Not logged in. Run 'retain login' first."
    );
    Ok(())
}

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated credential file and API URL for one test.
pub struct TestEnv {
    dir: TempDir,
    api_url: String,
}

impl TestEnv {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            api_url: api_url.into(),
        }
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.dir.path().join("credentials.json")
    }

    pub fn write_credentials(&self, access: &str, refresh: &str) {
        let json = serde_json::json!({ "access_token": access, "refresh_token": refresh });
        fs::write(self.credentials_path(), json.to_string()).expect("Failed to write credentials");
    }

    /// Returns the stored credential document, if the file exists.
    pub fn read_credentials(&self) -> Option<serde_json::Value> {
        let json = fs::read_to_string(self.credentials_path()).ok()?;
        Some(serde_json::from_str(&json).expect("Credential file is not JSON"))
    }

    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_retain"));
        cmd.args(args);
        cmd.env("RETAIN_API_URL", &self.api_url);
        cmd.env("RETAIN_CREDENTIALS", self.credentials_path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RETAIN_PASSWORD");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run the CLI binary with arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("Failed to execute CLI")
    }

    /// Run the CLI off the async runtime, so a mock server on it keeps serving.
    pub async fn run_async(&self, args: &[&str]) -> Output {
        let mut cmd = self.command(args);
        tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
            .await
            .expect("CLI task panicked")
    }
}

/// Expect success and return stdout.
pub fn success(args: &[&str], output: Output) -> String {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Expect failure and return stderr.
pub fn failure(args: &[&str], output: Output) -> String {
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

//! Login, logout, status and registration.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;

use retain::api::{Registration, Role};
use retain::{Credentials, Session};

use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "RETAIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

#[derive(Args, Debug)]
pub struct StatusArgs {}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long, env = "RETAIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// Account role (server default: student)
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,

    /// Log in with the new account afterwards
    #[arg(long)]
    pub login: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RoleArg {
    Student,
    Teacher,
    Analyst,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Student => Role::Student,
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Analyst => Role::Analyst,
        }
    }
}

pub async fn login(args: LoginArgs, session: &Session) -> Result<()> {
    let credentials = Credentials::new(&args.username, &args.password);

    output::note("Logging in...");

    session
        .auth()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &args.username);
    output::field("API", session.api_url().as_str());

    Ok(())
}

pub fn logout(_args: LogoutArgs, session: &Session) -> Result<()> {
    session.auth().logout();
    output::success("Logged out");
    Ok(())
}

pub fn status(_args: StatusArgs, session: &Session) -> Result<()> {
    output::field("API", session.api_url().as_str());

    if session.is_authenticated() {
        output::field("Session", &"Logged in".green().to_string());
    } else {
        output::field("Session", &"Not logged in".yellow().to_string());
    }

    Ok(())
}

pub async fn register(args: RegisterArgs, session: &Session) -> Result<()> {
    let mut registration = Registration::new(&args.username, &args.password);
    if let Some(email) = args.email {
        registration = registration.email(email);
    }
    if args.first_name.is_some() || args.last_name.is_some() {
        registration = registration.name(
            args.first_name.unwrap_or_default(),
            args.last_name.unwrap_or_default(),
        );
    }
    if let Some(role) = args.role {
        registration = registration.role(role.into());
    }

    let registered = if args.login {
        let (registered, _) = session
            .auth()
            .register_and_login(&registration)
            .await
            .context("Failed to register")?;
        registered
    } else {
        session
            .auth()
            .register(&registration)
            .await
            .context("Failed to register")?
    };

    output::success(&registered.message);
    println!();
    output::field("User", &registered.user.username);
    output::field("Role", &registered.role.to_string());
    if args.login {
        output::field("Session", "Logged in");
    }

    Ok(())
}

//! Command-line front end: one subcommand per session operation.

use std::collections::BTreeMap;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Arg, ArgMatches, ColorChoice, Command};
use serde_json::Value;
use thiserror::Error;

use crate::auth::{login, logout, Credentials, LoginError};
use crate::client::ApiError;
use crate::routes::Navigation;
use crate::state::AppState;
use crate::store::StoreError;

pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not render response: {0}")]
    Render(#[from] serde_json::Error),
    #[error("missing argument '{0}'")]
    MissingArgument(&'static str),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

pub fn command() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("dashgate")
        .about("Session and route gating for the admin dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to the YAML configuration file")
                .env("DASHGATE_CONFIG")
                .default_value(DEFAULT_CONFIG_PATH)
                .global(true),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in and store the session token")
                .arg(Arg::new("username").required(true))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Password; prefer the environment variable")
                        .env("DASHGATE_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the claims of the stored session"))
        .subcommand(
            Command::new("navigate")
                .about("Evaluate access to a dashboard route")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(
            Command::new("get")
                .about("GET a backend path with the stored session")
                .arg(Arg::new("path").required(true)),
        )
        .subcommand(Command::new("schema").about("Print the configuration JSON schema"))
}

fn required<'a>(args: &'a ArgMatches, name: &'static str) -> Result<&'a str, CliError> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or(CliError::MissingArgument(name))
}

/// Runs a parsed subcommand and returns what should be printed.
pub async fn execute(matches: &ArgMatches, state: &AppState) -> Result<String, CliError> {
    match matches.subcommand() {
        Some(("login", args)) => {
            let credentials = Credentials {
                username: required(args, "username")?.to_string(),
                password: required(args, "password")?.to_string(),
            };
            let claims = login(
                &state.client,
                state.store.as_ref(),
                &state.config.api.login_path,
                &credentials,
            )
            .await?;
            Ok(format!(
                "Logged in as {} (role: {})",
                claims.sub.as_deref().unwrap_or(&credentials.username),
                claims.role.as_deref().unwrap_or("none")
            ))
        }
        Some(("logout", _)) => {
            logout(state.store.as_ref())?;
            Ok("Logged out.".to_string())
        }
        Some(("whoami", _)) => match state.navigator.gate().current_claims() {
            Ok(claims) => {
                let sorted: BTreeMap<_, _> = claims.attributes().into_iter().collect();
                Ok(sorted
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Err(reason) => Ok(format!("Not signed in ({}).", reason)),
        },
        Some(("navigate", args)) => Ok(match state.navigator.navigate(required(args, "path")?) {
            Navigation::Render { path, .. } => format!("render {}", path),
            Navigation::Redirect { to, reason } => format!("redirect {} ({})", to, reason),
            Navigation::NotFound { path } => format!("not found {}", path),
        }),
        Some(("get", args)) => {
            let body: Value = state.client.get_json(required(args, "path")?).await?;
            Ok(serde_json::to_string_pretty(&body)?)
        }
        Some((other, _)) => Err(CliError::UnknownCommand(other.to_string())),
        None => Err(CliError::UnknownCommand(String::new())),
    }
}

pub async fn dispatch(
    matches: &ArgMatches,
    state: &AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = execute(matches, state).await?;
    println!("{}", output);
    Ok(())
}

use anyhow::Context;
use dossier_client::Client;
use dossier_client::ClientConfig;
use dossier_client::ClientError;
use dossier_client::NoAuth;
use dossier_client::Notifier;
use dossier_client::StaticToken;
use dossier_client::StderrNotifier;
use dossier_client::TokenFile;
use dossier_client::TokenProvider;
use dossier_client::find_dossier_home;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub mod cli;

mod archive_cmd;
mod format;
mod import_cmd;

use crate::cli::Cli;
use crate::cli::Command;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
const BASE_URL_ENV_VAR: &str = "DOSSIER_BASE_URL";
const TOKEN_ENV_VAR: &str = "DOSSIER_TOKEN";

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    init_logging();

    let client = build_client(&cli)?;
    let json = cli.json;
    let result = match cli.command {
        Command::Import(args) => import_cmd::run(&client, args, json).await,
        Command::Tasks => archive_cmd::tasks(&client, json).await,
        Command::List(args) => archive_cmd::list(&client, args, json).await,
        Command::Search(args) => archive_cmd::search(&client, args, json).await,
        Command::Show(args) => archive_cmd::show(&client, args, json).await,
        Command::Delete(args) => archive_cmd::delete(&client, args).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<ClientError>() {
            Some(client_err) => {
                StderrNotifier.notify_error(&client_err.user_message());
                if client_err.is_auth_expired() {
                    discard_stored_token();
                }
                std::process::exit(1);
            }
            None => Err(err),
        },
    }
}

/// Logging goes to stderr only; stdout belongs to command output.
fn init_logging() {
    let default_level = "error";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_client(cli: &Cli) -> anyhow::Result<Client> {
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var(BASE_URL_ENV_VAR).ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let config =
        ClientConfig::new(&base_url).with_context(|| format!("invalid base url: {base_url}"))?;
    Ok(Client::with_auth(config, token_provider(cli))?)
}

/// `--token` beats `$DOSSIER_TOKEN` beats the token stored under the
/// dossier home directory.
fn token_provider(cli: &Cli) -> Arc<dyn TokenProvider> {
    if let Some(token) = &cli.token {
        return Arc::new(StaticToken::new(token.clone()));
    }
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
        && !token.is_empty()
    {
        return Arc::new(StaticToken::new(token));
    }
    match find_dossier_home() {
        Ok(home) => Arc::new(TokenFile::in_home(&home)),
        Err(_) => Arc::new(NoAuth),
    }
}

fn discard_stored_token() {
    if let Ok(home) = find_dossier_home()
        && let Err(err) = TokenFile::in_home(&home).clear()
    {
        tracing::warn!("failed to remove stored token: {err}");
    }
}

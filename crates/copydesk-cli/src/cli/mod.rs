//! CLI entry and dispatch.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use copydesk_core::api::ApiClient;
use copydesk_core::api::auth::LoginRequest;
use copydesk_core::config::{self, Config};
use copydesk_core::session::SessionStore;

#[derive(Parser)]
#[command(name = "copydesk")]
#[command(version)]
#[command(about = "Terminal console for managing blog content")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the API base URL from config
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in and persist the session token
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Clear the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create the config file with a commented template
    Init,
    /// Set the API base URL, preserving other fields
    SetUrl {
        /// New base URL (no trailing slash)
        url: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _guard = crate::logging::init()?;

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    match cli.command {
        None => runtime()?.block_on(copydesk_tui::run_console(config)),
        Some(Commands::Login { email, password }) => {
            runtime()?.block_on(login(&config, email, password))
        }
        Some(Commands::Logout) => logout(),
        Some(Commands::Whoami) => runtime()?.block_on(whoami(&config)),
        Some(Commands::Config { command }) => config_command(&command),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}

/// Headless login: exchange credentials, persist the token, cache and print
/// the identity.
async fn login(config: &Config, email: String, password: String) -> Result<()> {
    let session = Arc::new(SessionStore::load()?);
    let api = ApiClient::new(config, Arc::clone(&session))?;

    let response = api
        .login(&LoginRequest { email, password })
        .await
        .context("Sign-in failed")?;
    session.set_token(Some(response.access_token))?;

    match api.get_profile().await {
        Ok(profile) => {
            session.set_profile(Some(profile.clone()));
            println!(
                "Signed in as {} <{}> ({})",
                profile.full_name,
                profile.email,
                profile.role.label()
            );
        }
        Err(err) => {
            tracing::warn!(error = %err, "profile fetch after login failed");
            println!("Signed in.");
        }
    }
    Ok(())
}

fn logout() -> Result<()> {
    let session = SessionStore::load()?;
    let had_session = session.token().is_some();
    session.clear()?;
    if had_session {
        println!("Signed out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

async fn whoami(config: &Config) -> Result<()> {
    let session = Arc::new(SessionStore::load()?);
    if session.token().is_none() {
        anyhow::bail!("Not signed in. Run `copydesk login` first.");
    }
    let api = ApiClient::new(config, session)?;
    let profile = api.get_profile().await.context("Profile fetch failed")?;
    println!("{} <{}>", profile.full_name, profile.email);
    println!("Role:   {}", profile.role.label());
    println!("Locked: {}", if profile.locked { "yes" } else { "no" });
    Ok(())
}

fn config_command(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config::paths::config_path().display());
            Ok(())
        }
        ConfigCommands::Init => {
            let path = config::paths::config_path();
            if path.exists() {
                anyhow::bail!("Config already exists at {}", path.display());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
            std::fs::write(&path, config::default_config_template())
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Created config at {}", path.display());
            Ok(())
        }
        ConfigCommands::SetUrl { url } => {
            Config::save_api_base_url(url)?;
            println!("API base URL set to {url}");
            Ok(())
        }
    }
}

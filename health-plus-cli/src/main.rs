use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod navigator;

use commands::{
    AppShell, AskCommand, AuthCommand, ChatCommand, ConfigCommand, DashboardCommand,
    MemberCommand,
};
use config::Config;
use health_plus_core::{
    ApiClient, BackendTarget, ClientOptions, FileStorage, Scheme, SessionStore, Shell,
};
use navigator::TerminalNavigator;

#[derive(Parser)]
#[command(name = "hplus")]
#[command(version)]
#[command(about = "Manage your family's health records from the terminal", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, register, log out or check the session
    Auth(AuthCommand),

    /// Show the family health overview
    Dashboard(DashboardCommand),

    /// Manage family members and their reports
    Member(MemberCommand),

    /// Ask the AI health assistant a question
    Ask(AskCommand),

    /// Chat with the AI health assistant
    Chat(ChatCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for config commands
    let cli_config_path = cli.config.clone();

    // Load configuration
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path)?,
        Some(Commands::Auth(cmd)) => cmd.run(&build_shell(&config)?).await?,
        Some(Commands::Dashboard(cmd)) => cmd.run(&build_shell(&config)?).await?,
        Some(Commands::Member(cmd)) => cmd.run(&build_shell(&config)?).await?,
        Some(Commands::Ask(cmd)) => cmd.run(&build_shell(&config)?).await?,
        Some(Commands::Chat(cmd)) => cmd.run(&build_shell(&config)?).await?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

/// Wires the session store, API client and navigator from configuration.
fn build_shell(config: &Config) -> Result<AppShell, Box<dyn std::error::Error>> {
    let session = Arc::new(SessionStore::new(FileStorage::new(
        config.data_dir.value.clone(),
    )));

    let scheme = Scheme::parse(&config.api_scheme.value);
    let api_url = config.api_url.as_ref().map(|u| u.value.as_str());
    let target = BackendTarget::select(&scheme, api_url)?;
    tracing::debug!(base_url = target.base_url(), "Selected backend");

    let api = ApiClient::new(
        target,
        session,
        ClientOptions {
            timeout: config.timeout(),
        },
    )?;

    Ok(Shell::new(api, TerminalNavigator::new()))
}

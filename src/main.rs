mod api;
mod config;
mod console;
mod controllers;
mod types;
mod view;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::api::{AccountApi, HttpAccountApi};
use crate::config::ClientConfig;
use crate::console::DashboardView;
use crate::controllers::LoginOutcome;
use crate::view::{Control, TerminalAlerts, TerminalNavigator};

#[derive(Parser)]
#[command(name = "trading-console")]
#[command(author = "Trading Bot")]
#[command(version = "0.1.0")]
#[command(about = "Terminal client for the trading account web API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "trading-console.toml")]
    config: PathBuf,

    /// Account server URL (overrides the configuration)
    #[arg(long)]
    base_url: Option<String>,

    /// Symbol for positions and close-all (overrides the configuration)
    #[arg(long)]
    symbol: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a username and password
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "TRADING_CONSOLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Load strategies and positions and print them
    Dashboard,
    /// Start a strategy by name
    Start {
        strategy: String,
    },
    /// Stop the running strategy
    Stop,
    /// Close all positions for the configured symbol
    CloseAll,
    /// Interactive dashboard, optionally logging in first
    Console {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long, env = "TRADING_CONSOLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    info!("trading-console v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::load(&cli.config)?.with_overrides(cli.base_url, cli.symbol)?;
    info!("Using account server {} for {}", config.base_url, config.symbol);

    run_command(cli.command, &config).await
}

async fn run_command(command: Commands, config: &ClientConfig) -> Result<()> {
    let symbol = config.symbol()?;
    let api: Arc<dyn AccountApi> = Arc::new(HttpAccountApi::new(&config.base_url)?);
    let alerts = Arc::new(TerminalAlerts::new());

    match command {
        Commands::Login { username, password } => {
            let navigator = Arc::new(TerminalNavigator::new());
            let outcome = console::login(
                api,
                alerts,
                navigator.clone(),
                &username,
                password.as_deref().unwrap_or_default(),
            )
            .await;
            check_login(&outcome, &navigator)?;
        }
        Commands::Dashboard => {
            let view = DashboardView::new(alerts);
            view.controller(api, symbol.clone()).initialize().await;
            println!("{}", view.render(&symbol));
        }
        Commands::Start { strategy } => {
            let view = DashboardView::new(alerts);
            view.controller(api, symbol).start_strategy(&strategy).await;
        }
        Commands::Stop => {
            let view = DashboardView::new(alerts);
            view.controller(api, symbol).click(Control::Stop).await;
        }
        Commands::CloseAll => {
            let view = DashboardView::new(alerts);
            view.controller(api, symbol).click(Control::CloseAll).await;
        }
        Commands::Console { username, password } => {
            if let Some(username) = username {
                let navigator = Arc::new(TerminalNavigator::new());
                let outcome = console::login(
                    api.clone(),
                    alerts.clone(),
                    navigator.clone(),
                    &username,
                    password.as_deref().unwrap_or_default(),
                )
                .await;
                check_login(&outcome, &navigator)?;
            }

            let view = DashboardView::new(alerts);
            let controller = view.controller(api, symbol);
            controller.initialize().await;
            console::run(&controller, &view, BufReader::new(tokio::io::stdin())).await?;
        }
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    // RUST_LOG wins over --verbose when set.
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = builder.with_env_filter(EnvFilter::from_default_env()).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        let subscriber = builder.with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn check_login(outcome: &LoginOutcome, navigator: &TerminalNavigator) -> Result<()> {
    match outcome {
        LoginOutcome::Redirected(_) => {
            if let Some(location) = navigator.location() {
                println!("Logged in, continuing at {}", location);
            }
            Ok(())
        }
        LoginOutcome::Completed { message } => {
            if message.is_none() {
                info!("Login accepted without redirect");
            }
            Ok(())
        }
        LoginOutcome::Rejected | LoginOutcome::Failed => bail!("login did not succeed"),
    }
}

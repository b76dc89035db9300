use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use wordbook_config::Config;

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;
pub mod ui;

use self::controller::AppController;
use self::state::AppState;

/// Look words up in the dictionary backend while you type
#[derive(Parser, Debug)]
#[command(name = "wordbook", version)]
struct Cli {
    /// JSON config file, missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dictionary API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Auth token sent with every lookup
    #[arg(long)]
    token: Option<String>,

    /// Debounce delay in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => profile::load_config(path)?,
        None => Config::new(),
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        config.api.token = token.clone();
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.lookup.debounce_ms = debounce_ms;
    }
    config.log_json |= cli.json_logs;

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(config.log_json);

    tracing::info!("Using dictionary API at {}", config.api.base_url);

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("Task finished"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::warn!("Task exited with error during shutdown: {e:#}");
        }
    }

    Ok(())
}

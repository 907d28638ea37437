use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

mod config;
mod monitoring;
mod notify;

use config::Config;
use monitoring::{HttpChecker, Monitor};
use notify::{NullNotifier, Notifier, TelegramNotifier};

/// Probes configured endpoints for reachability and notifies an operator
/// over Telegram when one stays down.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Duplicate log output to this file
    #[arg(long, default_value = "vigil.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The environment is loaded before the logger so RUST_LOG settings in
    // the env file take effect; any load failure is reported right after.
    let env_file_error = match &cli.env_file {
        Some(path) => dotenvy::from_path(path).err().map(|error| (path.clone(), error)),
        None => {
            dotenvy::dotenv().ok();
            None
        }
    };

    logger::init(Some(cli.log_file.as_path()));

    if let Some((path, error)) = env_file_error {
        warn!("Failed to load env file {}: {}", path.display(), error);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("{}", error);
            process::exit(1);
        }
    };

    info!("{}", config);

    if let Err(error) = run(config).await {
        error!("Fatal: {:#}", error);
        process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let checker = Arc::new(HttpChecker::new(config.probe_timeout)?);

    let notifier: Arc<dyn Notifier> = match &config.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(telegram)?),
        None => {
            warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set, alerts and reports go nowhere");
            Arc::new(NullNotifier)
        }
    };

    info!("Endpoint monitor started");
    Monitor::new(&config, checker, notifier).run().await;

    Ok(())
}

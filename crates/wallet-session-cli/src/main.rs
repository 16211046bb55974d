/*
[INPUT]:  CLI arguments, YAML simulation file
[OUTPUT]: JSON session snapshots for each step of a simulated wallet session
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or the simulated flow
*/

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wallet_session::{ExecutionContext, SessionController, TracingNavigator};
use wallet_session_cli::report::wallet_lines;
use wallet_session_cli::{SimulationConfig, StateReport};

#[derive(Parser, Debug)]
#[command(name = "wallet-session", version, about = "Simulated wallet connection sessions")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    /// Wallet to select; defaults to the first ranked wallet
    #[arg(long = "wallet", value_name = "NAME")]
    wallet: Option<String>,
    /// Run as a non-interactive host (no wallet discovery)
    #[arg(long = "headless")]
    headless: bool,
    /// Stay connected instead of disconnecting at the end
    #[arg(long = "keep-connected")]
    keep_connected: bool,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = %args.config_path.display(),
        headless = args.headless,
        dry_run = args.dry_run,
        "starting wallet-session"
    );

    let config = load_config(&args.config_path)?;
    info!(wallet_count = config.wallets.len(), "configuration loaded");

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let context = if args.headless {
        ExecutionContext::Headless
    } else {
        ExecutionContext::Interactive
    };
    let controller = config.build_controller(context, Arc::new(TracingNavigator));

    controller.initialize();
    print_report(&controller, "initialize")?;

    let state = controller.state();
    for line in wallet_lines(&state.wallets) {
        info!("{line}");
    }

    let Some(wallet) = args
        .wallet
        .clone()
        .or_else(|| state.wallets.first().map(|wallet| wallet.name.clone()))
    else {
        warn!("no wallets available; nothing to connect");
        return Ok(());
    };

    controller.open_modal();
    if let Err(err) = controller.select_wallet_by_name(&wallet).await {
        warn!(wallet = %wallet, error = %err, retryable = err.is_retryable(), "failed to connect wallet");
        controller.close_modal();
    }
    print_report(&controller, "select_wallet")?;

    if args.keep_connected {
        return Ok(());
    }

    if let Err(err) = controller.disconnect().await {
        warn!(error = %err, "failed to disconnect wallet");
    }
    print_report(&controller, "disconnect")?;

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    SimulationConfig::from_file(path).context("load config")
}

fn print_report(controller: &SessionController, step: &str) -> Result<()> {
    let report = StateReport::new(step, controller.state());
    println!("{}", report.to_json().context("serialize session state")?);
    Ok(())
}

//! `ballot`: command line front end for the election contract.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use ballot_adapters::{EmailJsNotifier, HttpObjectStorage, JsonRpcLedgerClient};
use ballot_coordinator::{AppConfig, Collaborators, ElectionStore, WalletConnection};
use ballot_types::{SystemClock, WalletAddress};
use ballot_utils::{init_logging, LogFormat};
use clap::Parser;

#[derive(Parser)]
#[command(name = "ballot", about = "Decentralized voting system client")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Contract gateway URL.
    #[arg(long, env = "BALLOT_LEDGER_ENDPOINT")]
    ledger_endpoint: Option<String>,

    /// Address of the election contract.
    #[arg(long, env = "BALLOT_CONTRACT_ADDRESS")]
    contract_address: Option<String>,

    /// Upload endpoint for candidate symbol images.
    #[arg(long, env = "BALLOT_STORAGE_ENDPOINT")]
    storage_endpoint: Option<String>,

    #[arg(long, env = "BALLOT_EMAIL_SERVICE_ID")]
    email_service_id: Option<String>,

    #[arg(long, env = "BALLOT_EMAIL_TEMPLATE_ID")]
    email_template_id: Option<String>,

    #[arg(long, env = "BALLOT_EMAIL_PUBLIC_KEY")]
    email_public_key: Option<String>,

    /// Election authority wallet.
    #[arg(long, env = "BALLOT_ADMIN_ADDRESS")]
    admin_address: Option<String>,

    /// Wallet the operations are submitted from.
    #[arg(long, env = "BALLOT_WALLET")]
    wallet: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

impl Cli {
    /// Overlay flags and env vars on top of the file (or default) config.
    fn apply_overrides(&self, mut config: AppConfig) -> anyhow::Result<AppConfig> {
        if let Some(endpoint) = &self.ledger_endpoint {
            config.ledger.endpoint = endpoint.clone();
        }
        if let Some(address) = &self.contract_address {
            config.ledger.contract_address = address.clone();
        }
        if let Some(endpoint) = &self.storage_endpoint {
            config.storage.endpoint = endpoint.clone();
        }
        if let Some(id) = &self.email_service_id {
            config.notification.service_id = id.clone();
        }
        if let Some(id) = &self.email_template_id {
            config.notification.template_id = id.clone();
        }
        if let Some(key) = &self.email_public_key {
            config.notification.public_key = key.clone();
        }
        if let Some(admin) = &self.admin_address {
            config.admin_address =
                Some(WalletAddress::parse(admin).context("invalid --admin-address")?);
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (file_config, load_error) = match &cli.config {
        Some(path) => match AppConfig::from_toml_file(&path.to_string_lossy()) {
            Ok(cfg) => (Some(cfg), None),
            Err(e) => (None, Some(e)),
        },
        None => (None, None),
    };
    let config = cli.apply_overrides(file_config.unwrap_or_default())?;

    let log_format = config
        .log_format
        .parse::<LogFormat>()
        .map_err(anyhow::Error::msg)?;
    init_logging(log_format, &config.log_level);

    match (&cli.config, load_error) {
        (Some(path), None) => tracing::info!("Loaded config from {}", path.display()),
        (Some(path), Some(e)) => {
            tracing::warn!("Failed to load config file {}: {e}, using CLI defaults", path.display())
        }
        _ => {}
    }

    let mut wallet = WalletConnection::new(config.admin_address.clone());
    if let Some(address) = &cli.wallet {
        wallet.begin_connect();
        wallet.connect(WalletAddress::parse(address).context("invalid --wallet")?);
    }

    let collaborators = Collaborators {
        ledger: Arc::new(JsonRpcLedgerClient::new(
            config.ledger.endpoint.clone(),
            config.ledger.contract_address.clone(),
        )?),
        notifier: Arc::new(EmailJsNotifier::new(config.notification.emailjs_settings())?),
        storage: Arc::new(HttpObjectStorage::new(config.storage.endpoint.clone())?),
        clock: Arc::new(SystemClock),
    };
    let (store, dispatcher) = ElectionStore::new(collaborators, config.notification.from_name.clone());
    let notifications = tokio::spawn(dispatcher.run());

    tracing::debug!(
        ledger = %config.ledger.endpoint,
        contract = %config.ledger.contract_address,
        "client ready"
    );

    let outcome = commands::run(cli.command, &store, &wallet).await;

    // Closing the store ends the dispatcher once queued emails are sent.
    drop(store);
    if let Err(e) = notifications.await {
        tracing::warn!("notification task ended abnormally: {e}");
    }
    outcome
}

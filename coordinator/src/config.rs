//! Application configuration with TOML file support.

use serde::{Deserialize, Serialize};

use ballot_adapters::EmailJsSettings;
use ballot_types::WalletAddress;

use crate::CoordinatorError;

/// Configuration for the ballot front end.
///
/// Can be loaded from a TOML file via [`AppConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is valid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Wallet allowed to run authority operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_address: Option<WalletAddress>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub ledger: LedgerConfig,

    #[serde(default)]
    pub notification: NotificationConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the election contract lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_ledger_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub contract_address: String,
}

/// Email service credentials used to send voters their proof value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notification_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub template_id: String,

    #[serde(default)]
    pub public_key: String,

    /// Sender name shown in every voter email.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Upload endpoint for candidate symbol images.
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ledger_endpoint() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_notification_api_url() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_from_name() -> String {
    "Decentralized Voting System".to_string()
}

fn default_storage_endpoint() -> String {
    "http://127.0.0.1:5001/upload".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, CoordinatorError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoordinatorError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CoordinatorError> {
        toml::from_str(s).map_err(|e| CoordinatorError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, CoordinatorError> {
        toml::to_string_pretty(self).map_err(|e| CoordinatorError::Config(e.to_string()))
    }
}

impl NotificationConfig {
    pub fn emailjs_settings(&self) -> EmailJsSettings {
        EmailJsSettings {
            api_url: self.api_url.clone(),
            service_id: self.service_id.clone(),
            template_id: self.template_id.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_address: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            ledger: LedgerConfig::default(),
            notification: NotificationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ledger_endpoint(),
            contract_address: String::new(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            api_url: default_notification_api_url(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            from_name: default_from_name(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_storage_endpoint(),
        }
    }
}

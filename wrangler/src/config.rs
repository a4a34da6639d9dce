//! Configuration resolution for labware-wrangler
//!
//! Priority: CLI → ENV → TOML → compiled defaults. The TOML layer (with its
//! own file-location priority) comes from `wrangler_common::config`; this
//! module layers the CLI/ENV overrides on top. clap reads each override from
//! its flag first and its environment variable second.

use clap::Args;
use std::path::PathBuf;
use tracing::info;
use wrangler_common::config::{load_config, TableName, TomlConfig, UnrecognizedLabwarePolicy};
use wrangler_common::{Error, Result};

/// Settings that can be overridden from the command line or environment
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Config file path (default: ~/.config/labware-wrangler/config.toml)
    #[arg(long, env = "WRANGLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Warehouse connection URL
    #[arg(long, env = "WRANGLER_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Warehouse table holding extraction rows
    #[arg(long, env = "WRANGLER_TABLE")]
    pub table: Option<String>,

    /// Destination filter value
    #[arg(long, env = "WRANGLER_DESTINATION")]
    pub destination: Option<String>,

    /// Registration service base URL
    #[arg(long, env = "WRANGLER_REGISTRATION_URL")]
    pub registration_url: Option<String>,

    /// Registration service API key
    #[arg(long, env = "WRANGLER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Seconds between scheduled runs
    #[arg(long, env = "WRANGLER_INTERVAL_SECS")]
    pub interval_secs: Option<u64>,

    /// What to do with unrecognized labware: abort or report
    #[arg(long, env = "WRANGLER_ON_UNRECOGNIZED_LABWARE")]
    pub on_unrecognized_labware: Option<UnrecognizedLabwarePolicy>,

    /// HTTP bind address
    #[arg(long, env = "WRANGLER_BIND")]
    pub bind: Option<String>,
}

impl ConfigOverrides {
    /// Apply overrides on top of a loaded config and re-validate
    pub fn apply(&self, config: &mut TomlConfig) -> Result<()> {
        let mut overridden = Vec::new();

        if let Some(url) = &self.database_url {
            config.warehouse.database_url = url.clone();
            overridden.push("database_url");
        }
        if let Some(table) = &self.table {
            config.warehouse.table = TableName::parse(table)?;
            overridden.push("table");
        }
        if let Some(destination) = &self.destination {
            config.warehouse.destination = destination.clone();
            overridden.push("destination");
        }
        if let Some(url) = &self.registration_url {
            config.registration.base_url = url.clone();
            overridden.push("registration_url");
        }
        if let Some(key) = &self.api_key {
            config.registration.api_key = key.clone();
            overridden.push("api_key");
        }
        if let Some(secs) = self.interval_secs {
            config.schedule.interval_secs = secs;
            overridden.push("interval_secs");
        }
        if let Some(policy) = self.on_unrecognized_labware {
            config.schedule.on_unrecognized_labware = policy;
            overridden.push("on_unrecognized_labware");
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
            overridden.push("bind");
        }

        if !overridden.is_empty() {
            info!("Configuration overridden from CLI/ENV: {}", overridden.join(", "));
        }

        config.validate()
    }
}

/// Load the TOML layer and apply CLI/ENV overrides
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<TomlConfig> {
    let mut config = load_config(overrides.config.as_deref())?;
    overrides.apply(&mut config)?;

    if config.registration.api_key.trim().is_empty() {
        tracing::warn!("Registration API key is empty; the service will likely reject requests");
    }

    Ok(config)
}

/// Parse a bind address early so a typo fails at startup
pub fn parse_bind_address(bind: &str) -> Result<std::net::SocketAddr> {
    bind.parse()
        .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))
}

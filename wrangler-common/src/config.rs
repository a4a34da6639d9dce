//! Configuration loading and config file resolution
//!
//! Config file resolution priority order:
//! 1. Explicit path (command-line argument)
//! 2. `WRANGLER_CONFIG` environment variable
//! 3. User config file (`~/.config/labware-wrangler/config.toml`)
//! 4. System config file (`/etc/labware-wrangler/config.toml`)
//! 5. Compiled defaults (a missing file is a warning, never an error)
//!
//! Individual settings can be overridden afterwards from CLI/ENV by the
//! service binary.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "WRANGLER_CONFIG";

const CONFIG_DIR_NAME: &str = "labware-wrangler";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default warehouse table holding the extraction rows
pub const DEFAULT_TABLE: &str = "cgap_heron";
/// Default destination filter value
pub const DEFAULT_DESTINATION: &str = "CGAP";
/// Default plate purpose name
pub const DEFAULT_PLATE_PURPOSE: &str = "LHR Lysate";
/// Default tube rack purpose name
pub const DEFAULT_TUBE_RACK_PURPOSE: &str = "TR Stock 96";

// ============================================================================
// Table identifier
// ============================================================================

/// Warehouse table name, validated as a plain SQL identifier
///
/// Table names cannot be bound as query parameters, so they are checked once
/// here and interpolated afterwards. An optional single schema qualifier is
/// accepted (`mlwarehouse.cgap_heron`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Maximum identifier length (MySQL limit, also fine for SQLite)
    pub const MAX_PART_LEN: usize = 64;

    pub fn parse(name: &str) -> Result<Self> {
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|part| is_identifier(part)) {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a valid table name",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    part.len() <= TableName::MAX_PART_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl TryFrom<String> for TableName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// TOML sections
// ============================================================================

/// What a run does when a container matches no known labware shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedLabwarePolicy {
    /// Abort the whole run (no marker write for anything in the run)
    #[default]
    Abort,
    /// Record the container as a failed outcome and carry on
    Report,
}

impl std::str::FromStr for UnrecognizedLabwarePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "report" => Ok(Self::Report),
            other => Err(Error::Config(format!(
                "on_unrecognized_labware must be 'abort' or 'report', got '{}'",
                other
            ))),
        }
    }
}

/// Warehouse connection and scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// sqlx connection URL
    pub database_url: String,
    pub table: TableName,
    /// Rows are only picked up when their destination column equals this
    pub destination: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://wrangler.db?mode=rwc".to_string(),
            table: TableName(DEFAULT_TABLE.to_string()),
            destination: DEFAULT_DESTINATION.to_string(),
        }
    }
}

/// Registration service (and reference lookup) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Total attempts per submission; 1 disables retry
    pub max_attempts: u32,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            max_attempts: 1,
        }
    }
}

/// Purpose names resolved once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PurposeConfig {
    pub plate: String,
    pub tube_rack: String,
}

impl Default for PurposeConfig {
    fn default() -> Self {
        Self {
            plate: DEFAULT_PLATE_PURPOSE.to_string(),
            tube_rack: DEFAULT_TUBE_RACK_PURPOSE.to_string(),
        }
    }
}

/// Scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
    pub on_unrecognized_labware: UnrecognizedLabwarePolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            on_unrecognized_labware: UnrecognizedLabwarePolicy::Abort,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5730".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Complete TOML configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub warehouse: WarehouseConfig,
    pub registration: RegistrationConfig,
    pub purposes: PurposeConfig,
    pub schedule: ScheduleConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.warehouse.destination.trim().is_empty() {
            return Err(Error::Config("warehouse.destination must not be empty".to_string()));
        }
        if self.registration.max_attempts == 0 {
            return Err(Error::Config("registration.max_attempts must be at least 1".to_string()));
        }
        if self.schedule.interval_secs == 0 {
            return Err(Error::Config("schedule.interval_secs must be at least 1".to_string()));
        }
        if self.purposes.plate.trim().is_empty() || self.purposes.tube_rack.trim().is_empty() {
            return Err(Error::Config("purpose names must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Locate the config file following the priority order in the module docs
///
/// Returns `None` when no file exists anywhere.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config, Priority 4: system config
    let user_config = dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    let system_config = PathBuf::from("/etc").join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);

    user_config
        .into_iter()
        .chain(std::iter::once(system_config))
        .find(|path| path.exists())
}

/// Load configuration, falling back to compiled defaults when no file exists
///
/// An explicitly named file that is missing or unreadable is an error; an
/// absent default-location file is only a warning.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let explicit = cli_arg.is_some() || std::env::var(CONFIG_ENV_VAR).is_ok();

    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
            let config = TomlConfig::from_toml_str(&content)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Some(path) if explicit => Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        ))),
        _ => {
            warn!("No configuration file found, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

//! Tracing subscriber setup
//!
//! The subscriber is installed before configuration is loaded so that
//! config-loading warnings reach the operator. `RUST_LOG` wins when set;
//! otherwise logging starts at `info` and switches to `logging.level` once
//! the config is resolved.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};
use wrangler_common::{Error, Result};

const STARTUP_LEVEL: &str = "info";

/// Filter layer whose level can be replaced after startup
pub type FilterLayer = reload::Layer<EnvFilter, Registry>;

/// Handle for applying the configured level to an installed subscriber
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevelHandle {
    /// Build the reloadable filter layer
    ///
    /// `env_filter` is the filter parsed from `RUST_LOG`, if any.
    pub fn reloadable(env_filter: Option<EnvFilter>) -> (FilterLayer, Self) {
        let from_env = env_filter.is_some();
        let filter = env_filter.unwrap_or_else(|| EnvFilter::new(STARTUP_LEVEL));
        let (layer, handle) = reload::Layer::new(filter);
        (layer, Self { handle, from_env })
    }

    /// Switch to the configured level unless `RUST_LOG` was set
    pub fn apply_config_level(&self, level: &str) -> Result<()> {
        if self.from_env {
            return Ok(());
        }

        let filter = EnvFilter::try_new(level)
            .map_err(|e| Error::Config(format!("Invalid logging.level '{}': {}", level, e)))?;
        self.handle
            .reload(filter)
            .map_err(|e| Error::Internal(format!("Failed to apply log level: {}", e)))
    }

    /// Current filter directives
    pub fn current(&self) -> Option<String> {
        self.handle.with_current(|filter| filter.to_string()).ok()
    }
}

/// Install the global subscriber at the startup level
pub fn init_tracing() -> LogLevelHandle {
    let (filter, handle) = LogLevelHandle::reloadable(EnvFilter::try_from_default_env().ok());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
    handle
}

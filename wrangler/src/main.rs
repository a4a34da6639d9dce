//! labware-wrangler - Labware registration reconciler
//!
//! Periodically registers unwrangled warehouse containers with the labware
//! registration service and marks the successes back in the warehouse.
//!
//! Modes:
//! - default: scheduler loop plus HTTP endpoints (health, single-barcode
//!   lookup and wrangle) until Ctrl-C
//! - `--once`: a single wrangling run, for an external scheduler such as cron

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

use labware_wrangler::config::{parse_bind_address, resolve_config, ConfigOverrides};
use labware_wrangler::db::{SqlWarehouse, WarehouseStore};
use labware_wrangler::logging::init_tracing;
use labware_wrangler::scheduler::Scheduler;
use labware_wrangler::services::{
    ContainerWrangler, EntityResolver, HttpReferenceClient, HttpRegistrationClient,
    RegistrationClient, RunSettings, WranglingOrchestrator,
};
use labware_wrangler::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(
    name = "labware-wrangler",
    version,
    about = "Registers warehouse labware with the registration service"
)]
struct Cli {
    /// Run one wrangling pass and exit
    #[arg(long)]
    once: bool,

    /// Create the warehouse table if missing (local and test setups)
    #[arg(long)]
    init_schema: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = init_tracing();
    let config = resolve_config(&cli.overrides).context("Failed to resolve configuration")?;
    log_level.apply_config_level(&config.logging.level)?;

    info!(
        "Starting labware-wrangler v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        table = %config.warehouse.table,
        destination = %config.warehouse.destination,
        registration = %config.registration.base_url,
        "Configuration resolved"
    );

    let pool = wrangler_common::db::init_warehouse_pool(&config.warehouse.database_url)
        .await
        .context("Failed to connect to warehouse")?;
    if cli.init_schema {
        wrangler_common::db::create_warehouse_table(&pool, &config.warehouse.table).await?;
    }

    let store: Arc<dyn WarehouseStore> = Arc::new(SqlWarehouse::new(pool));
    let reference = Arc::new(HttpReferenceClient::new(&config.registration)?);
    let resolver = EntityResolver::new(reference, config.purposes.clone());
    let client: Arc<dyn RegistrationClient> =
        Arc::new(HttpRegistrationClient::new(&config.registration)?);

    let orchestrator = Arc::new(WranglingOrchestrator::new(
        store.clone(),
        resolver.clone(),
        client.clone(),
        RunSettings {
            table: config.warehouse.table.clone(),
            destination: config.warehouse.destination.clone(),
            on_unrecognized_labware: config.schedule.on_unrecognized_labware,
        },
    ));
    let run_lock = Arc::new(Mutex::new(()));
    let scheduler = Scheduler::new(
        orchestrator,
        run_lock.clone(),
        Duration::from_secs(config.schedule.interval_secs),
    );

    if cli.once {
        let report = scheduler.run_once().await.map_err(|e| {
            error!("Wrangling run aborted: {}", e);
            e
        })?;
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Single run finished"
        );
        return Ok(());
    }

    let wrangler = ContainerWrangler::new(store, resolver, client, config.warehouse.table.clone());
    let app = build_router(AppState::new(wrangler, run_lock));

    let addr = parse_bind_address(&config.server.bind)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let scheduler_task = tokio::spawn(scheduler.run_until(async {
        let _ = tokio::signal::ctrl_c().await;
    }));

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    scheduler_task.await?;

    Ok(())
}

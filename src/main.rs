//! vibelevel-decay - runs one inactivity-decay batch.
//!
//! The scheduling cadence lives outside the engine: point cron or a systemd
//! timer at this binary once a day.

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vibelevel::config;
use vibelevel::decay::run_decay_batch;
use vibelevel::storage::Database;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting vibelevel-decay v{}", env!("CARGO_PKG_VERSION"));

    let config = config::load_config().context("failed to load configuration")?;
    let db_path = config::get_database_path();
    let mut db = Database::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    let report = run_decay_batch(&mut db, config.decay.inactivity_days, Utc::now())
        .context("decay batch failed")?;

    println!(
        "decay: scanned {}, decayed {}, skipped {}, failed {}",
        report.scanned, report.decayed, report.skipped, report.failed
    );

    Ok(())
}

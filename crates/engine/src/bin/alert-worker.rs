//! alert-worker — the alert engine as a long-running process.
//!
//! Loads the enabled rule set once at startup (fatal on failure), then
//! consumes events from the Redis feed and records matching alerts in
//! PostgreSQL until interrupted with ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use vigil_alerts::PgAlertStore;
use vigil_core::config::{load_dotenv, Config};
use vigil_engine::db::init_pg_pool;
use vigil_engine::{Engine, EngineConfig};
use vigil_queue::{EventSource, RedisEventSource};
use vigil_rules::PgRuleRepository;

// ── CLI ─────────────────────────────────────────────────────────────

/// Alert engine worker — evaluates security events against detection rules.
#[derive(Parser, Debug)]
#[command(name = "alert-worker", version, about)]
struct Cli {
    /// Redis list key holding serialized events (overrides EVENTS_KEY).
    #[arg(long)]
    events_key: Option<String>,

    /// Pause between polls when the feed is empty, in milliseconds
    /// (overrides WORKER_POLL_INTERVAL_MS).
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(key) = cli.events_key {
        config.queue.events_key = key;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.worker.poll_interval_ms = ms;
    }
    config.log_summary();

    let source = Arc::new(
        RedisEventSource::connect(&config.queue.url, &config.queue.events_key)
            .await
            .context("failed to connect to the Redis event feed")?,
    );
    match source.health_check().await {
        Ok(health) => info!(%health, "event feed reachable"),
        Err(e) => warn!(error = %e, "event feed health check failed"),
    }

    let pool = init_pg_pool(&config.postgres).await?;
    let repository = PgRuleRepository::new(pool.clone());
    let sink = Arc::new(PgAlertStore::new(pool));

    let engine = Engine::start(
        &repository,
        source,
        sink,
        EngineConfig {
            poll_interval: Duration::from_millis(config.worker.poll_interval_ms),
        },
    )
    .await
    .context("failed to load alert rules")?;

    let shutdown = engine.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown.notify_one();
        }
    });

    info!("alert-worker started, waiting for events");
    engine.run().await;
    info!("alert-worker exited cleanly");
    Ok(())
}

//! send-test-event — push one sample event onto the feed.
//!
//! Development utility for exercising a running alert-worker without a
//! real event producer: builds a JSON event from the flags and RPUSHes it
//! onto the Redis list the worker consumes.

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use tracing::info;

use vigil_core::config::load_dotenv;
use vigil_queue::RedisEventSource;

/// Push a test security event onto the Redis event feed.
#[derive(Parser, Debug)]
#[command(name = "send-test-event", version, about)]
struct Cli {
    #[arg(long, env = "REDIS_URL", default_value = "redis://localhost:6379")]
    redis_url: String,

    /// Redis list key the alert-worker consumes.
    #[arg(long, env = "EVENTS_KEY", default_value = "log_events")]
    events_key: String,

    #[arg(long, default_value = "login_failure")]
    action: String,

    #[arg(long, default_value = "alice")]
    username: String,

    #[arg(long, default_value = "192.168.1.10")]
    source_ip: String,

    /// Event timestamp (ISO-8601); defaults to now.
    #[arg(long)]
    timestamp: Option<String>,
}

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

    let timestamp = cli
        .timestamp
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    let event = serde_json::json!({
        "timestamp": timestamp,
        "username": cli.username,
        "source_ip": cli.source_ip,
        "action": cli.action,
    });

    let source = RedisEventSource::connect(&cli.redis_url, &cli.events_key)
        .await
        .context("failed to connect to Redis")?;
    source
        .push(&event.to_string())
        .await
        .context("failed to push event")?;

    info!(events_key = %cli.events_key, event = %event, "test event pushed");
    Ok(())
}

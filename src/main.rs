//! Autoblock - Entry point.
//!
//! This binary binds the configured kernel queues, launches the packet
//! workers and the lookup worker, and serves runtime counters over HTTP
//! until termination.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task;
use tracing::info;

use autoblock::cache::{MokaReputationCache, spawn_sweeper};
use autoblock::config::Config;
use autoblock::dnsbl::{DnsblResolver, LookupWorker};
use autoblock::filter::{NfqQueue, PacketWorker};

async fn run() -> Result<()> {
    let config =
        Config::load_or_default("autoblock.toml").context("Failed to load configuration")?;

    info!("Starting autoblock...");
    info!("Packet workers: {}", config.num_workers);
    info!("Cache TTL: {} seconds", config.cache_ttl_seconds);
    info!(
        "Zones: {}",
        config
            .zones
            .iter()
            .map(|zone| zone.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    autoblock::metrics::init(&config.metrics).context("Failed to start metrics exporter")?;

    // Initialize components
    let cache = MokaReputationCache::new(Duration::from_secs(config.cache_ttl_seconds));
    spawn_sweeper(cache.clone(), Duration::from_secs(config.cache_sweep_seconds));

    let resolver = DnsblResolver::new(config.zones.clone());
    let (lookup_tx, lookup_rx) = mpsc::channel(config.lookup_queue_capacity);

    // One worker per kernel queue (blocking I/O). A queue that cannot be
    // opened is fatal; a worker cannot degrade without it.
    for index in 0..config.num_workers {
        let queue =
            NfqQueue::open(index).with_context(|| format!("Failed to open kernel queue {index}"))?;
        let worker = PacketWorker::new(index, queue, cache.clone(), lookup_tx.clone());
        task::spawn_blocking(move || worker.run());
    }
    drop(lookup_tx);

    let lookup_handle = tokio::spawn(LookupWorker::new(lookup_rx, cache, resolver).run());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down...");
        }
        _ = lookup_handle => {
            info!("Lookup worker stopped");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    run().await
}

//! kvcache demonstration binary
//!
//! Constructs both cache flavors, exercises set/get/expiry/eviction, and
//! reports the results through tracing.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kvcache::{Config, Expiration, LruCache, TtlCache};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kvcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, sweep_interval={}s, lru_capacity={}",
        config.default_ttl_secs, config.sweep_interval_secs, config.lru_capacity
    );

    // == TTL cache demonstration ==
    let ttl_cache = TtlCache::builder()
        .default_ttl(config.default_ttl())
        .sweep_interval(config.sweep_interval())
        .on_evict(|key, value: i32| info!(key = %key, value, "ttl entry swept"))
        .build()?;

    ttl_cache.set("key", 1, Expiration::After(Duration::from_secs(1)));
    match ttl_cache.get("key") {
        Some(value) => info!(value, "ttl cache hit"),
        None => info!("key not found"),
    }
    if let Some(remaining) = ttl_cache.ttl_remaining("key") {
        info!(remaining_ms = remaining.as_millis() as u64, "entry lifetime left");
    }

    tokio::time::sleep(Duration::from_millis(1500)).await;
    info!(
        found = ttl_cache.get("key").is_some(),
        physical_entries = ttl_cache.count(),
        "after expiry"
    );

    // == LRU cache demonstration ==
    let lru_cache =
        LruCache::with_eviction(3, |key, value: i32| info!(key = %key, value, "lru entry evicted"))?;

    lru_cache.set("k1", 1);
    lru_cache.set("k2", 2);
    lru_cache.set("k3", 3);
    lru_cache.get("k1"); // promote k1, leaving k2 least recent
    lru_cache.set("k4", 4); // evicts k2

    info!(
        k1 = lru_cache.get("k1"),
        k2 = lru_cache.get("k2"),
        k3 = lru_cache.get("k3"),
        k4 = lru_cache.get("k4"),
        "lru contents after eviction"
    );

    let ttl_stats = ttl_cache.stats();
    let lru_stats = lru_cache.stats();
    info!(
        ttl_hits = ttl_stats.hits,
        ttl_misses = ttl_stats.misses,
        lru_hits = lru_stats.hits,
        lru_evictions = lru_stats.evictions,
        "cache statistics"
    );

    ttl_cache.close().await;
    info!("ttl cache closed, sweep task stopped");

    Ok(())
}

//! Reputation cache trait and implementations.
//!
//! The cache is the only rendezvous point between the packet workers and
//! the lookup worker: workers read on the hot path, the lookup worker
//! writes, and every entry expires after a fixed TTL.

use std::net::Ipv4Addr;
use std::time::Duration;

use moka::sync::Cache;
use tokio::task::JoinHandle;
use tracing::debug;

/// Cached outcome of a blocklist lookup for one source address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reputation {
    /// The address is listed; carries the 127.0.0.0/8 sentinel the zone
    /// answered with.
    Listed(Ipv4Addr),
    /// No configured zone lists the address.
    Clean,
}

/// Trait for verdict caching.
///
/// Multiple packet workers read concurrently while the lookup worker
/// writes; implementations must make a write visible to subsequent reads.
pub trait ReputationCache: Send + Sync + Clone + 'static {
    /// Returns the live verdict for an address; absent if expired or never
    /// looked up.
    fn get(&self, addr: Ipv4Addr) -> Option<Reputation>;

    /// Insert or replace the verdict for an address. Last writer wins.
    fn insert(&self, addr: Ipv4Addr, reputation: Reputation);

    /// Number of entries currently held. Expired entries may linger in the
    /// count until the next sweep; they are never returned by [`get`].
    ///
    /// [`get`]: ReputationCache::get
    fn entry_count(&self) -> u64;

    /// Reclaim expired entries.
    fn sweep(&self);
}

/// Production cache implementation using Moka.
#[derive(Clone)]
pub struct MokaReputationCache {
    inner: Cache<Ipv4Addr, Reputation>,
}

impl MokaReputationCache {
    /// Create a new cache expiring entries after `ttl`. The same TTL covers
    /// positive and negative verdicts.
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).build();

        Self { inner: cache }
    }
}

impl ReputationCache for MokaReputationCache {
    fn get(&self, addr: Ipv4Addr) -> Option<Reputation> {
        self.inner.get(&addr)
    }

    fn insert(&self, addr: Ipv4Addr, reputation: Reputation) {
        self.inner.insert(addr, reputation);
    }

    fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    fn sweep(&self) {
        self.inner.run_pending_tasks();
    }
}

/// Spawn the background task that evicts expired entries every `interval`.
pub fn spawn_sweeper<C: ReputationCache>(cache: C, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cache.sweep();
            debug!(entries = cache.entry_count(), "cache sweep");
        }
    })
}

//! Lookup worker: drains the lookup queue and writes verdicts to the cache.

use std::net::{IpAddr, Ipv4Addr};

use tokio::sync::mpsc;
use tracing::debug;

use crate::cache::{Reputation, ReputationCache};
use crate::dnsbl::resolver::{DnsblResolver, ZoneLookup};

/// Single long-lived consumer of the lookup queue.
///
/// Packet workers issue ACCEPT on a cache miss and enqueue the source
/// address, so under bursty traffic the same address is enqueued many
/// times before the first lookup completes. The cache re-check in the
/// loop collapses that herd to at most one lookup per address.
pub struct LookupWorker<C, L> {
    rx: mpsc::Receiver<Ipv4Addr>,
    cache: C,
    resolver: DnsblResolver<L>,
}

impl<C, L> LookupWorker<C, L>
where
    C: ReputationCache,
    L: ZoneLookup,
{
    pub fn new(rx: mpsc::Receiver<Ipv4Addr>, cache: C, resolver: DnsblResolver<L>) -> Self {
        Self {
            rx,
            cache,
            resolver,
        }
    }

    /// Run until every sender is dropped.
    ///
    /// Resolver failures yield `Clean` entries (negative caching); nothing
    /// on this path terminates the worker.
    pub async fn run(mut self) {
        while let Some(addr) = self.rx.recv().await {
            if self.cache.get(addr).is_some() {
                // enqueued again before the first lookup finished
                continue;
            }

            let reputation = match self.resolver.check(IpAddr::V4(addr)).await {
                Ok(Some(sentinel)) => Reputation::Listed(sentinel),
                Ok(None) => Reputation::Clean,
                Err(e) => {
                    debug!(%addr, error = %e, "lookup failed, caching as clean");
                    Reputation::Clean
                }
            };

            self.cache.insert(addr, reputation);
        }
    }
}

//! DNSBL resolution against an ordered list of zones.
//!
//! A listed address resolves to a sentinel in 127.0.0.0/8 under the name
//! `reversed-octets + zone-suffix`; the first zone that answers wins, so
//! zone order matters for log attribution.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use metrics::counter;
use tracing::debug;

use crate::config::Zone;
use crate::error::{Error, Result};
use crate::metrics::{DNS_QUERIES, DNS_QUERIES_SUCCESS};

/// Reverse the four octets of an address (`a.b.c.d` → `d.c.b.a`).
pub fn reverse_octets(addr: Ipv4Addr) -> Ipv4Addr {
    let [a, b, c, d] = addr.octets();
    Ipv4Addr::new(d, c, b, a)
}

/// The hostname queried for `addr` in `zone`. The trailing dot keeps
/// resolver search domains out of the lookup.
fn query_name(addr: Ipv4Addr, zone: &Zone) -> String {
    format!("{}{}.", reverse_octets(addr), zone.suffix)
}

/// Trait for a single A-record lookup of a constructed hostname.
///
/// This is the seam between zone iteration and the actual DNS transport,
/// allowing tests to run without network access.
pub trait ZoneLookup: Send + Sync + Clone + 'static {
    /// Resolve `host` and return the first IPv4 answer.
    fn lookup(&self, host: &str) -> impl Future<Output = Result<Option<Ipv4Addr>>> + Send;
}

/// Production lookup through the system resolver.
#[derive(Clone)]
pub struct SystemLookup {
    resolver: TokioResolver,
}

impl SystemLookup {
    /// Build from the system resolver configuration, falling back to the
    /// library defaults when none can be read.
    pub fn new() -> Self {
        let resolver = TokioResolver::builder_tokio()
            .map(|builder| builder.build())
            .unwrap_or_else(|_| {
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            });

        Self { resolver }
    }
}

impl Default for SystemLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneLookup for SystemLookup {
    async fn lookup(&self, host: &str) -> Result<Option<Ipv4Addr>> {
        let response = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| Error::Resolver(e.to_string()))?;

        Ok(response.iter().find_map(|ip| match ip {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        }))
    }
}

/// Checks one address against the configured zones in order.
#[derive(Clone)]
pub struct DnsblResolver<L> {
    zones: Arc<Vec<Zone>>,
    lookup: L,
}

impl DnsblResolver<SystemLookup> {
    /// Production resolver over the system resolver.
    pub fn new(zones: Vec<Zone>) -> Self {
        Self::with_lookup(zones, SystemLookup::new())
    }
}

impl<L: ZoneLookup> DnsblResolver<L> {
    pub fn with_lookup(zones: Vec<Zone>, lookup: L) -> Self {
        Self {
            zones: Arc::new(zones),
            lookup,
        }
    }

    /// Check `addr` against every zone in order and return the first
    /// sentinel found, or `None` when no configured zone lists it.
    ///
    /// A per-zone failure (NXDOMAIN, timeout, servfail) only skips that
    /// zone. Blocks on the system resolver, so this is only ever called
    /// from the lookup worker, never from a packet worker.
    pub async fn check(&self, addr: IpAddr) -> Result<Option<Ipv4Addr>> {
        let IpAddr::V4(v4) = addr else {
            return Err(Error::NotIpv4(addr));
        };

        for zone in self.zones.iter() {
            let host = query_name(v4, zone);
            counter!(DNS_QUERIES).increment(1);

            match self.lookup.lookup(&host).await {
                Ok(Some(sentinel)) => {
                    counter!(DNS_QUERIES_SUCCESS).increment(1);
                    debug!(%addr, zone = %zone.name, %sentinel, "address listed");
                    return Ok(Some(sentinel));
                }
                Ok(None) => {
                    debug!(%addr, zone = %zone.name, "no answer records");
                }
                Err(e) => {
                    debug!(%addr, zone = %zone.name, error = %e, "not listed");
                }
            }
        }

        Ok(None)
    }
}

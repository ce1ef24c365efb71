//! Counter names and initialization for the Prometheus exporter.
//!
//! All counters are process-wide and monotonically increasing; readers
//! compute rates by differencing snapshots.

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::MetricsConfig;
use crate::error::Result;

/// A DNS query was issued by the resolver.
pub const DNS_QUERIES: &str = "autoblock.dns_queries";
/// A DNS query returned a match.
pub const DNS_QUERIES_SUCCESS: &str = "autoblock.dns_queries_success";
/// An IPv4 packet was observed by a packet worker.
pub const IPV4_PACKETS: &str = "autoblock.ipv4_packets";
/// A packet was given verdict DROP.
pub const IPV4_PACKETS_BLOCKED: &str = "autoblock.ipv4_packets_blocked";
/// A cache lookup hit a `Listed` entry.
pub const CACHE_HITS_BLOCK: &str = "autoblock.cache_hits_block";
/// A cache lookup hit a `Clean` entry.
pub const CACHE_HITS_PASS: &str = "autoblock.cache_hits_pass";
/// A cache lookup missed.
pub const CACHE_HITS_MISSES: &str = "autoblock.cache_hits_misses";

/// Initialize the metrics system based on configuration.
///
/// When metrics are enabled, this starts an HTTP server that exposes
/// a `/metrics` endpoint for scraping the counter snapshot.
///
/// When metrics are disabled, this is a no-op. The `metrics` crate
/// handles unregistered metrics gracefully (they become no-ops).
pub fn init(config: &MetricsConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    PrometheusBuilder::new()
        .with_http_listener(config.listen)
        .install()?;

    describe_counter!(DNS_QUERIES, "DNS queries issued against DNSBL zones");
    describe_counter!(DNS_QUERIES_SUCCESS, "DNS queries that returned a listing");
    describe_counter!(IPV4_PACKETS, "IPv4 packets observed");
    describe_counter!(IPV4_PACKETS_BLOCKED, "Packets dropped");
    describe_counter!(CACHE_HITS_BLOCK, "Cache hits on a listed entry");
    describe_counter!(CACHE_HITS_PASS, "Cache hits on a clean entry");
    describe_counter!(CACHE_HITS_MISSES, "Cache misses");

    Ok(())
}

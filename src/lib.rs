//! Autoblock - an inline IPv4 traffic filter driven by DNS blocklists.
//!
//! Packets whose verdicts the kernel defers to user space are matched
//! against an expiring verdict cache; misses are accepted immediately and
//! resolved asynchronously against a set of DNSBL zones, so no packet
//! ever waits on a DNS round-trip. Once a lookup completes, further
//! packets from a listed source are dropped until the entry expires.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: Configuration loading and validation
//! - [`filter`]: Kernel queue binding, IPv4 parsing, packet workers
//! - [`dnsbl`]: Zone resolution, reason table, lookup worker
//! - [`cache`]: Verdict caching with TTL expiry
//! - [`metrics`]: Counter names and the Prometheus exporter
//! - [`error`]: Error types
//!
//! # Testing
//!
//! Components are trait-based so the whole pipeline can run without
//! NFQUEUE, root privileges, or network access: [`filter::KernelQueue`]
//! stands in for the kernel queue and [`dnsbl::ZoneLookup`] for the
//! system resolver.

pub mod cache;
pub mod config;
pub mod dnsbl;
pub mod error;
pub mod filter;
pub mod metrics;

pub use config::Config;
pub use error::{Error, Result};

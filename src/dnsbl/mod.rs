//! DNSBL lookup pipeline: zone resolution, reason table, lookup worker.

pub mod lookup;
pub mod reasons;
pub mod resolver;

pub use lookup::LookupWorker;
pub use resolver::{DnsblResolver, SystemLookup, ZoneLookup, reverse_octets};

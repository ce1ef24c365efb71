//! Verdict caching with TTL expiry.

mod reputation;

pub use reputation::{MokaReputationCache, Reputation, ReputationCache, spawn_sweeper};

//! Packet-path modules: kernel queue binding, header parsing, workers.

pub mod packet;
pub mod queue;
pub mod worker;

pub use packet::{Flow, parse_ipv4};
pub use queue::{KernelQueue, NfqQueue, Verdict};
pub use worker::PacketWorker;

//! Packet worker: one per kernel queue.
//!
//! The hot path never blocks on anything but the queue receive itself:
//! the cache read is bounded, the lookup enqueue is non-blocking, and the
//! verdict is issued before the enqueue is attempted. DNS latency never
//! touches this path.

use std::net::Ipv4Addr;

use metrics::counter;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::cache::{Reputation, ReputationCache};
use crate::dnsbl::reasons;
use crate::filter::packet::parse_ipv4;
use crate::filter::queue::{KernelQueue, Verdict};
use crate::metrics::{
    CACHE_HITS_BLOCK, CACHE_HITS_MISSES, CACHE_HITS_PASS, IPV4_PACKETS, IPV4_PACKETS_BLOCKED,
};

/// Processes the packet stream of one kernel queue.
pub struct PacketWorker<Q, C> {
    index: u16,
    queue: Q,
    cache: C,
    lookup_tx: mpsc::Sender<Ipv4Addr>,
}

impl<Q, C> PacketWorker<Q, C>
where
    Q: KernelQueue,
    C: ReputationCache,
{
    pub fn new(index: u16, queue: Q, cache: C, lookup_tx: mpsc::Sender<Ipv4Addr>) -> Self {
        Self {
            index,
            queue,
            cache,
            lookup_tx,
        }
    }

    /// Process packets in queue order until the queue closes. Exactly one
    /// verdict is issued per packet before the next is dequeued.
    pub fn run(mut self) {
        debug!(queue = self.index, "packet worker started");
        while let Some(packet) = self.queue.recv() {
            self.handle(packet);
        }
        debug!(queue = self.index, "packet worker stopped");
    }

    fn handle(&mut self, packet: Q::Packet) {
        let Some(flow) = parse_ipv4(Q::payload(&packet)) else {
            // the filter must not black-hole traffic it does not understand
            error!(queue = self.index, "not an IPv4 packet");
            self.issue(packet, Verdict::Accept);
            return;
        };
        counter!(IPV4_PACKETS).increment(1);

        match self.cache.get(flow.source) {
            Some(Reputation::Listed(sentinel)) => {
                counter!(CACHE_HITS_BLOCK).increment(1);
                self.issue(packet, Verdict::Drop);
                counter!(IPV4_PACKETS_BLOCKED).increment(1);
                info!(
                    source = %flow.source,
                    dest = %flow.dest,
                    reason = %reasons::describe(sentinel),
                    "blocked"
                );
            }
            Some(Reputation::Clean) => {
                counter!(CACHE_HITS_PASS).increment(1);
                self.issue(packet, Verdict::Accept);
            }
            None => {
                counter!(CACHE_HITS_MISSES).increment(1);
                // verdict first: the enqueue must never delay the packet.
                // A full lookup queue drops the enqueue; the next packet
                // from this source tries again.
                self.issue(packet, Verdict::Accept);
                if self.lookup_tx.try_send(flow.source).is_ok() {
                    debug!(source = %flow.source, "queued for lookup");
                }
            }
        }
    }

    fn issue(&mut self, packet: Q::Packet, verdict: Verdict) {
        if let Err(e) = self.queue.verdict(packet, verdict) {
            warn!(queue = self.index, error = %e, "failed to issue verdict");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaReputationCache;
    use crate::filter::packet::tests::ipv4_payload;
    use crate::filter::queue::tests::MockQueue;
    use std::time::Duration;

    const SRC: Ipv4Addr = Ipv4Addr::new(198, 51, 100, 7);
    const DST: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 1);
    const SENTINEL: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 14);

    fn cache() -> MokaReputationCache {
        MokaReputationCache::new(Duration::from_secs(300))
    }

    #[test]
    fn should_drop_when_cache_holds_a_listing() {
        let cache = cache();
        cache.insert(SRC, Reputation::Listed(SENTINEL));
        let (tx, mut rx) = mpsc::channel(1000);

        let queue = MockQueue::new(vec![ipv4_payload(SRC, DST)]);
        let verdicts = queue.verdicts();
        PacketWorker::new(0, queue, cache, tx).run();

        assert_eq!(verdicts.lock().unwrap().as_slice(), &[Verdict::Drop]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn should_accept_on_clean_hit_without_enqueue() {
        let cache = cache();
        cache.insert(SRC, Reputation::Clean);
        let (tx, mut rx) = mpsc::channel(1000);

        let queue = MockQueue::new(vec![ipv4_payload(SRC, DST)]);
        let verdicts = queue.verdicts();
        PacketWorker::new(0, queue, cache, tx).run();

        assert_eq!(verdicts.lock().unwrap().as_slice(), &[Verdict::Accept]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn should_accept_and_enqueue_on_miss() {
        let (tx, mut rx) = mpsc::channel(1000);

        let queue = MockQueue::new(vec![ipv4_payload(SRC, DST)]);
        let verdicts = queue.verdicts();
        PacketWorker::new(0, queue, cache(), tx).run();

        assert_eq!(verdicts.lock().unwrap().as_slice(), &[Verdict::Accept]);
        assert_eq!(rx.try_recv().unwrap(), SRC);
    }

    #[test]
    fn should_accept_non_ipv4_without_touching_cache_or_channel() {
        let cache = cache();
        let (tx, mut rx) = mpsc::channel(1000);

        let mut ipv6 = vec![0u8; 40];
        ipv6[0] = 0x60;

        let queue = MockQueue::new(vec![ipv6]);
        let verdicts = queue.verdicts();
        PacketWorker::new(0, queue, cache.clone(), tx).run();

        assert_eq!(verdicts.lock().unwrap().as_slice(), &[Verdict::Accept]);
        assert!(rx.try_recv().is_err());
        cache.sweep();
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn should_issue_exactly_one_verdict_per_packet() {
        let cache = cache();
        cache.insert(SRC, Reputation::Listed(SENTINEL));
        let (tx, _rx) = mpsc::channel(1000);

        let other = Ipv4Addr::new(198, 51, 100, 8);
        let queue = MockQueue::new(vec![
            ipv4_payload(SRC, DST),
            ipv4_payload(other, DST),
            ipv4_payload(SRC, DST),
        ]);
        let verdicts = queue.verdicts();
        PacketWorker::new(0, queue, cache, tx).run();

        assert_eq!(
            verdicts.lock().unwrap().as_slice(),
            &[Verdict::Drop, Verdict::Accept, Verdict::Drop]
        );
    }

    #[test]
    fn should_accept_when_the_lookup_queue_is_full() {
        let (tx, mut rx) = mpsc::channel(1);

        let other = Ipv4Addr::new(198, 51, 100, 8);
        let queue = MockQueue::new(vec![ipv4_payload(SRC, DST), ipv4_payload(other, DST)]);
        let verdicts = queue.verdicts();
        PacketWorker::new(0, queue, cache(), tx).run();

        // both packets pass; only the first enqueue fit
        assert_eq!(
            verdicts.lock().unwrap().as_slice(),
            &[Verdict::Accept, Verdict::Accept]
        );
        assert_eq!(rx.try_recv().unwrap(), SRC);
        assert!(rx.try_recv().is_err());
    }
}

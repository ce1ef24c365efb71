//! Kernel packet-queue binding.
//!
//! The kernel defers packet verdicts to user space through NFQUEUE; each
//! queue number is exclusively owned by one packet worker.

use nfq::Queue;
use tracing::warn;

use crate::error::{Error, Result};

/// Verdict returned to the kernel for one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Drop,
}

/// Trait over one kernel queue delivering packets with deferred verdicts.
pub trait KernelQueue: Send + 'static {
    type Packet: Send;

    /// Block until the kernel delivers the next packet; `None` once the
    /// queue is closed.
    fn recv(&mut self) -> Option<Self::Packet>;

    /// Raw packet bytes, starting at the IP header.
    fn payload(packet: &Self::Packet) -> &[u8];

    /// Return the verdict for a previously received packet.
    fn verdict(&mut self, packet: Self::Packet, verdict: Verdict) -> Result<()>;
}

/// Production binding over NFQUEUE.
pub struct NfqQueue {
    queue: Queue,
}

impl NfqQueue {
    /// Open a netlink socket and bind it to kernel queue `index`.
    pub fn open(index: u16) -> Result<Self> {
        let mut queue = Queue::open().map_err(|source| Error::QueueOpen { index, source })?;
        queue
            .bind(index)
            .map_err(|source| Error::QueueOpen { index, source })?;

        Ok(Self { queue })
    }
}

impl KernelQueue for NfqQueue {
    type Packet = nfq::Message;

    fn recv(&mut self) -> Option<nfq::Message> {
        match self.queue.recv() {
            Ok(msg) => Some(msg),
            Err(e) => {
                warn!(error = %e, "kernel queue receive failed");
                None
            }
        }
    }

    fn payload(packet: &nfq::Message) -> &[u8] {
        packet.get_payload()
    }

    fn verdict(&mut self, mut packet: nfq::Message, verdict: Verdict) -> Result<()> {
        packet.set_verdict(match verdict {
            Verdict::Accept => nfq::Verdict::Accept,
            Verdict::Drop => nfq::Verdict::Drop,
        });
        self.queue.verdict(packet)?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock kernel queue delivering pre-loaded payloads and recording the
    /// verdict issued for each.
    pub struct MockQueue {
        packets: VecDeque<Vec<u8>>,
        verdicts: Arc<Mutex<Vec<Verdict>>>,
    }

    impl MockQueue {
        pub fn new(packets: Vec<Vec<u8>>) -> Self {
            Self {
                packets: packets.into(),
                verdicts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn verdicts(&self) -> Arc<Mutex<Vec<Verdict>>> {
            Arc::clone(&self.verdicts)
        }
    }

    impl KernelQueue for MockQueue {
        type Packet = Vec<u8>;

        fn recv(&mut self) -> Option<Vec<u8>> {
            self.packets.pop_front()
        }

        fn payload(packet: &Vec<u8>) -> &[u8] {
            packet
        }

        fn verdict(&mut self, _packet: Vec<u8>, verdict: Verdict) -> Result<()> {
            self.verdicts.lock().unwrap().push(verdict);
            Ok(())
        }
    }

    #[test]
    fn test_mock_queue() {
        let mut queue = MockQueue::new(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let verdicts = queue.verdicts();

        let packet = queue.recv().unwrap();
        assert_eq!(MockQueue::payload(&packet), &[1, 2, 3]);
        queue.verdict(packet, Verdict::Drop).unwrap();

        let packet = queue.recv().unwrap();
        queue.verdict(packet, Verdict::Accept).unwrap();

        assert!(queue.recv().is_none());
        assert_eq!(
            verdicts.lock().unwrap().as_slice(),
            &[Verdict::Drop, Verdict::Accept]
        );
    }
}

//! # Policy-driven event queue between callback and consumer.
//!
//! [`EventQueue`] is the sole synchronization point of a bridge: the native
//! callback offers values on one side, a single consumer pulls them on the
//! other. The producer path never blocks and never suspends; the consumer
//! side parks on a stored [`Waker`] until a value arrives or the queue
//! closes.
//!
//! ## Architecture
//! ```text
//! native callback ──offer()──► [Mutex: buffer + waker + flags] ──poll_recv()──► consumer
//!                    │                                               │
//!                non-blocking,                                 parks while empty,
//!                policy decides                                None once closed
//! ```
//!
//! ## Rules
//! - **Non-blocking offers**: `offer()` returns immediately with an
//!   [`OfferOutcome`]; the capacity policy decides acceptance.
//! - **Single consumer**: one waker slot; the receiving half is owned by
//!   exactly one stream or sink runner.
//! - **Graceful close**: `close()` stops intake and wakes a parked consumer;
//!   values buffered before the close still drain, then `poll_recv` yields
//!   `None`.
//! - **Loss accounting**: rejected offers and values displaced by conflation
//!   or drop-oldest eviction increment a counter readable via
//!   [`EventQueue::dropped`]. Offers against a closed queue are teardown
//!   noise and are not counted.
//!
//! ## Rendezvous readiness
//! Under [`CapacityPolicy::Rendezvous`] an offer is accepted only while the
//! consumer is parked waiting on an empty buffer. The flag is best-effort: a
//! consumer that abandons a pending `recv` future leaves a one-value window
//! where an offer is still accepted; the value is observed by the next
//! `recv`.

use std::collections::VecDeque;
use std::future::poll_fn;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

use crate::policies::{CapacityPolicy, OverflowPolicy};

/// Result of a single non-blocking offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OfferOutcome {
    /// Value queued, or handed to the parked consumer.
    Accepted,
    /// Value queued; an undelivered value was discarded to make room.
    Displaced,
    /// Value rejected by the capacity policy.
    Rejected,
    /// Queue intake already closed.
    Closed,
}

impl OfferOutcome {
    /// Whether the offered value will reach the consumer.
    pub(crate) fn accepted(self) -> bool {
        matches!(self, OfferOutcome::Accepted | OfferOutcome::Displaced)
    }
}

struct QueueInner<T> {
    buf: VecDeque<T>,
    closed: bool,
    waker: Option<Waker>,
    /// Consumer currently parked on an empty buffer.
    parked: bool,
}

/// Single-producer/single-consumer queue governed by a [`CapacityPolicy`].
pub(crate) struct EventQueue<T> {
    policy: CapacityPolicy,
    inner: Mutex<QueueInner<T>>,
    dropped: AtomicU64,
}

impl<T> EventQueue<T> {
    pub(crate) fn new(policy: CapacityPolicy) -> Self {
        Self {
            policy,
            inner: Mutex::new(QueueInner {
                buf: VecDeque::new(),
                closed: false,
                waker: None,
                parked: false,
            }),
            dropped: AtomicU64::new(0),
        }
    }

    /// Places `value` in the buffer bypassing the capacity policy.
    ///
    /// Used once, before the listener is registered, for initial-value
    /// replay: the baseline must survive until the first pull even under
    /// `Rendezvous`. Under `Conflated` a later live event may still replace
    /// it, preserving most-recent-wins.
    pub(crate) fn seed(&self, value: T) {
        let mut q = lock(&self.inner);
        if !q.closed {
            q.buf.push_back(value);
        }
    }

    /// Offers one value, never blocking the caller.
    pub(crate) fn offer(&self, value: T) -> OfferOutcome {
        let (outcome, waker) = {
            let mut q = lock(&self.inner);
            if q.closed {
                return OfferOutcome::Closed;
            }

            let outcome = match self.policy {
                CapacityPolicy::Rendezvous => {
                    if q.parked && q.buf.is_empty() {
                        q.buf.push_back(value);
                        OfferOutcome::Accepted
                    } else {
                        OfferOutcome::Rejected
                    }
                }
                CapacityPolicy::Conflated => {
                    let displaced = !q.buf.is_empty();
                    q.buf.clear();
                    q.buf.push_back(value);
                    if displaced {
                        OfferOutcome::Displaced
                    } else {
                        OfferOutcome::Accepted
                    }
                }
                CapacityPolicy::Bounded { capacity, overflow } => {
                    let capacity = capacity.max(1);
                    if q.buf.len() < capacity {
                        q.buf.push_back(value);
                        OfferOutcome::Accepted
                    } else {
                        match overflow {
                            OverflowPolicy::RejectNewest => OfferOutcome::Rejected,
                            OverflowPolicy::DropOldest => {
                                q.buf.pop_front();
                                q.buf.push_back(value);
                                OfferOutcome::Displaced
                            }
                        }
                    }
                }
                CapacityPolicy::Unbounded => {
                    q.buf.push_back(value);
                    OfferOutcome::Accepted
                }
            };

            let waker = if outcome.accepted() {
                q.parked = false;
                q.waker.take()
            } else {
                None
            };
            (outcome, waker)
        };

        if matches!(outcome, OfferOutcome::Rejected | OfferOutcome::Displaced) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(waker) = waker {
            waker.wake();
        }
        outcome
    }

    /// Pulls the next value, or reports end-of-stream.
    ///
    /// Drains values buffered before a close, then yields `None`.
    pub(crate) fn poll_recv(&self, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut q = lock(&self.inner);
        if let Some(value) = q.buf.pop_front() {
            q.parked = false;
            q.waker = None;
            return Poll::Ready(Some(value));
        }
        if q.closed {
            return Poll::Ready(None);
        }
        q.waker = Some(cx.waker().clone());
        q.parked = true;
        Poll::Pending
    }

    /// Awaits the next value; `None` means graceful end-of-stream.
    pub(crate) async fn recv(&self) -> Option<T> {
        poll_fn(|cx| self.poll_recv(cx)).await
    }

    /// Stops intake and wakes a parked consumer.
    ///
    /// Idempotent. Values buffered before the close remain available to
    /// `poll_recv` until drained.
    pub(crate) fn close(&self) {
        let waker = {
            let mut q = lock(&self.inner);
            if q.closed {
                None
            } else {
                q.closed = true;
                q.parked = false;
                q.waker.take()
            }
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Number of offers lost to backpressure (rejected or displaced).
    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        lock(&self.inner).buf.len()
    }
}

/// Locks a mutex, recovering the guard if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_unbounded_preserves_order() {
        let q = EventQueue::new(CapacityPolicy::Unbounded);
        for i in 0..5 {
            assert!(q.offer(i).accepted());
        }
        assert_eq!(q.len(), 5);
    }

    #[tokio::test]
    async fn test_unbounded_delivers_in_arrival_order() {
        let q = EventQueue::new(CapacityPolicy::Unbounded);
        q.offer("a");
        q.offer("b");
        q.offer("c");
        q.close();

        assert_eq!(q.recv().await, Some("a"));
        assert_eq!(q.recv().await, Some("b"));
        assert_eq!(q.recv().await, Some("c"));
        assert_eq!(q.recv().await, None);
    }

    #[tokio::test]
    async fn test_conflated_keeps_most_recent() {
        let q = EventQueue::new(CapacityPolicy::Conflated);
        assert_eq!(q.offer(1), OfferOutcome::Accepted);
        assert_eq!(q.offer(2), OfferOutcome::Displaced);
        assert_eq!(q.offer(3), OfferOutcome::Displaced);

        assert_eq!(q.recv().await, Some(3));
        assert_eq!(q.dropped(), 2);
    }

    #[test]
    fn test_rendezvous_drops_without_a_waiting_consumer() {
        let q = EventQueue::<u32>::new(CapacityPolicy::Rendezvous);
        assert_eq!(q.offer(7), OfferOutcome::Rejected);
        assert_eq!(q.len(), 0);
        assert_eq!(q.dropped(), 1);
    }

    #[tokio::test]
    async fn test_rendezvous_delivers_to_parked_consumer() {
        let q = Arc::new(EventQueue::new(CapacityPolicy::Rendezvous));

        let consumer = {
            let q = q.clone();
            tokio::spawn(async move { q.recv().await })
        };
        // Let the consumer park.
        tokio::task::yield_now().await;

        assert_eq!(q.offer(42), OfferOutcome::Accepted);
        assert_eq!(consumer.await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_bounded_rejects_newest_when_full() {
        let q = EventQueue::new(CapacityPolicy::bounded(2));
        assert_eq!(q.offer(1), OfferOutcome::Accepted);
        assert_eq!(q.offer(2), OfferOutcome::Accepted);
        assert_eq!(q.offer(3), OfferOutcome::Rejected);

        assert_eq!(q.recv().await, Some(1));
        assert_eq!(q.recv().await, Some(2));
        assert_eq!(q.dropped(), 1);
    }

    #[tokio::test]
    async fn test_bounded_drop_oldest_evicts_head() {
        let q = EventQueue::new(CapacityPolicy::bounded_drop_oldest(2));
        q.offer(1);
        q.offer(2);
        assert_eq!(q.offer(3), OfferOutcome::Displaced);

        assert_eq!(q.recv().await, Some(2));
        assert_eq!(q.recv().await, Some(3));
        assert_eq!(q.dropped(), 1);
    }

    #[tokio::test]
    async fn test_close_wakes_parked_consumer_into_end_of_stream() {
        let q = Arc::new(EventQueue::<u32>::new(CapacityPolicy::Unbounded));

        let consumer = {
            let q = q.clone();
            tokio::spawn(async move { q.recv().await })
        };
        tokio::task::yield_now().await;

        q.close();
        assert_eq!(consumer.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_buffered_values_drain_after_close() {
        let q = EventQueue::new(CapacityPolicy::bounded(4));
        q.offer(1);
        q.offer(2);
        q.close();

        assert_eq!(q.offer(3), OfferOutcome::Closed);
        assert_eq!(q.recv().await, Some(1));
        assert_eq!(q.recv().await, Some(2));
        assert_eq!(q.recv().await, None);
        // Teardown noise is not backpressure.
        assert_eq!(q.dropped(), 0);
    }

    #[tokio::test]
    async fn test_seed_survives_rendezvous_until_first_pull() {
        let q = EventQueue::new(CapacityPolicy::Rendezvous);
        q.seed(true);
        assert_eq!(q.recv().await, Some(true));
    }

    #[tokio::test]
    async fn test_seed_replaced_under_conflation() {
        let q = EventQueue::new(CapacityPolicy::Conflated);
        q.seed(0);
        assert_eq!(q.offer(1), OfferOutcome::Displaced);
        assert_eq!(q.recv().await, Some(1));
    }
}

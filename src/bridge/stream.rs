//! # Pull-based consumption shape.
//!
//! [`EventStream`] is the consumer half of an open bridge: await
//! [`recv`](EventStream::recv) until it returns `None`, or drive it through
//! the [`futures::Stream`] impl. End-of-stream is always graceful — consumer
//! cancellation, explicit close, and scope cancellation all end iteration
//! without an error.
//!
//! ## Rules
//! - Values arrive in the order the source raised them; only conflation may
//!   collapse intermediate values.
//! - While the bridge is `Closing`, values buffered before the close still
//!   drain; then `recv` reports `None`.
//! - Dropping the stream closes the bridge (the listener is detached exactly
//!   once).

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;

use crate::core::BridgeState;
use crate::core::close::CloseHandle;
use crate::core::queue::EventQueue;

/// Single-consumer stream of events from one bridge.
pub struct EventStream<T> {
    queue: Arc<EventQueue<T>>,
    closer: Arc<CloseHandle>,
}

impl<T: Send + 'static> EventStream<T> {
    pub(crate) fn new(queue: Arc<EventQueue<T>>, closer: Arc<CloseHandle>) -> Self {
        Self { queue, closer }
    }

    /// Awaits the next event.
    ///
    /// Returns `None` once the bridge has closed and buffered values are
    /// drained — graceful end-of-stream, never an error.
    pub async fn recv(&mut self) -> Option<T> {
        self.queue.recv().await
    }

    /// Closes the bridge: stops intake, detaches the listener, wakes a
    /// suspended consumer. Safe to call any number of times.
    pub fn close(&self) {
        self.closer.close();
    }

    /// Current lifecycle state of the bridge.
    pub fn state(&self) -> BridgeState {
        self.closer.state()
    }

    /// Number of offers lost to backpressure so far (rejected by the
    /// capacity policy, or displaced by conflation / drop-oldest eviction).
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }
}

impl<T: Send + 'static> Stream for EventStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.queue.poll_recv(cx)
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        self.closer.close();
    }
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("state", &self.closer.state())
            .finish()
    }
}

//! # One teardown path for every way a bridge can end.
//!
//! A bridge can be torn down from several directions at once: the consumer
//! drops or closes the stream, the owning scope is cancelled, or a sink
//! handler fails. [`CloseHandle`] funnels all of them through one idempotent
//! sequence:
//!
//! ```text
//! close()
//!   ├─► CAS Open → Closing            (exactly one caller wins)
//!   ├─► cancel bridge-local token     (trips the guard, stops the watcher)
//!   ├─► close queue intake            (wakes a parked consumer)
//!   ├─► detach listener               (slot guarantees exactly once)
//!   └─► CAS Closing → Closed
//! ```
//!
//! Losers of the first CAS return immediately; the teardown never runs twice.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::state::{BridgeState, StateCell};

/// Idempotent close path shared by the stream and sink consumption shapes.
pub(crate) struct CloseHandle {
    state: Arc<StateCell>,
    local: CancellationToken,
    teardown: Box<dyn Fn() + Send + Sync>,
}

impl CloseHandle {
    /// `teardown` closes the queue intake and detaches the listener; it must
    /// be safe to call more than once (both halves are idempotent on their
    /// own), though the state machine already ensures a single invocation.
    pub(crate) fn new(
        state: Arc<StateCell>,
        local: CancellationToken,
        teardown: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            state,
            local,
            teardown: Box::new(teardown),
        }
    }

    /// Transitions the bridge to `Closed`, running the teardown exactly once.
    pub(crate) fn close(&self) {
        if self.state.advance(BridgeState::Open, BridgeState::Closing) {
            self.local.cancel();
            (self.teardown)();
            self.state.advance(BridgeState::Closing, BridgeState::Closed);
        }
    }

    /// Current lifecycle state of the bridge.
    pub(crate) fn state(&self) -> BridgeState {
        self.state.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn open_cell() -> Arc<StateCell> {
        let cell = Arc::new(StateCell::new());
        cell.advance(BridgeState::Idle, BridgeState::Open);
        cell
    }

    #[test]
    fn test_close_runs_teardown_once() {
        let torn_down = Arc::new(AtomicU32::new(0));
        let t = torn_down.clone();
        let handle = CloseHandle::new(open_cell(), CancellationToken::new(), move || {
            t.fetch_add(1, Ordering::SeqCst);
        });

        handle.close();
        handle.close();
        handle.close();

        assert_eq!(torn_down.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), BridgeState::Closed);
    }

    #[test]
    fn test_close_cancels_local_token() {
        let local = CancellationToken::new();
        let handle = CloseHandle::new(open_cell(), local.clone(), || {});

        handle.close();
        assert!(local.is_cancelled());
    }

    #[test]
    fn test_close_before_open_is_noop() {
        let torn_down = Arc::new(AtomicU32::new(0));
        let t = torn_down.clone();
        let handle = CloseHandle::new(Arc::new(StateCell::new()), CancellationToken::new(), move || {
            t.fetch_add(1, Ordering::SeqCst);
        });

        handle.close();
        assert_eq!(torn_down.load(Ordering::SeqCst), 0);
        assert_eq!(handle.state(), BridgeState::Idle);
    }
}

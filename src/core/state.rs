//! # Bridge lifecycle state machine.
//!
//! Every bridge, whatever its consumption shape, moves through the same four
//! states:
//!
//! ```text
//! Idle ──► Open ──► Closing ──► Closed
//! ```
//!
//! - `Idle → Open` when the bridge wires up to its source.
//! - `Open → Closing` on consumer cancellation, explicit close, scope
//!   cancellation, or a fatal handler failure — whichever comes first.
//! - `Closing → Closed` once the listener teardown has run.
//! - `Closed` is terminal.
//!
//! Transitions are compare-and-swap, so exactly one caller wins each edge and
//! teardown cannot run twice even when close is raced from several paths.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BridgeState {
    /// Created, not yet wired to a source.
    Idle = 0,
    /// Listener attached; emissions accepted, consumer attached.
    Open = 1,
    /// No new emissions accepted; already-buffered values may still drain.
    Closing = 2,
    /// Listener detached; terminal.
    Closed = 3,
}

impl BridgeState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => BridgeState::Idle,
            1 => BridgeState::Open,
            2 => BridgeState::Closing,
            _ => BridgeState::Closed,
        }
    }
}

/// Shared, lock-free holder of a [`BridgeState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(BridgeState::Idle as u8))
    }

    /// Current state.
    pub(crate) fn get(&self) -> BridgeState {
        BridgeState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Attempts the `from → to` transition; returns `true` if this caller won
    /// the edge.
    pub(crate) fn advance(&self, from: BridgeState, to: BridgeState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether emissions are currently accepted.
    pub(crate) fn is_open(&self) -> bool {
        self.get() == BridgeState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), BridgeState::Idle);
        assert!(!cell.is_open());
    }

    #[test]
    fn test_advance_follows_edges() {
        let cell = StateCell::new();
        assert!(cell.advance(BridgeState::Idle, BridgeState::Open));
        assert!(cell.is_open());
        assert!(cell.advance(BridgeState::Open, BridgeState::Closing));
        assert!(cell.advance(BridgeState::Closing, BridgeState::Closed));
        assert_eq!(cell.get(), BridgeState::Closed);
    }

    #[test]
    fn test_only_one_caller_wins_an_edge() {
        let cell = StateCell::new();
        cell.advance(BridgeState::Idle, BridgeState::Open);
        assert!(cell.advance(BridgeState::Open, BridgeState::Closing));
        // A racing closer loses the same edge.
        assert!(!cell.advance(BridgeState::Open, BridgeState::Closing));
    }

    #[test]
    fn test_closed_is_terminal() {
        let cell = StateCell::new();
        cell.advance(BridgeState::Idle, BridgeState::Open);
        cell.advance(BridgeState::Open, BridgeState::Closing);
        cell.advance(BridgeState::Closing, BridgeState::Closed);
        assert!(!cell.advance(BridgeState::Closed, BridgeState::Open));
        assert_eq!(cell.get(), BridgeState::Closed);
    }
}

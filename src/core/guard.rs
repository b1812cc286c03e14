//! # Liveness check on the emission path.
//!
//! A native callback can fire after the consumer has stopped caring but
//! before the listener is physically detached. [`EmissionGuard`] is the
//! check-then-act predicate evaluated at every emission attempt: if the
//! owning scope has been cancelled or the bridge has left its `Open` state,
//! the value is silently discarded instead of reviving a closed stream.
//!
//! The check is best-effort by design: a callback may race the teardown and
//! be discarded even though it fired validly from the source's point of view.
//! Late delivery is a documented no-op, never an error.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::state::StateCell;

/// Stateless liveness predicate bound to a bridge's cancellation token and
/// lifecycle cell.
///
/// Cloneable; every [`Emitter`](crate::Emitter) carries one and consults it
/// before offering a value into the queue.
#[derive(Clone)]
pub struct EmissionGuard {
    token: CancellationToken,
    state: Arc<StateCell>,
}

impl EmissionGuard {
    pub(crate) fn new(token: CancellationToken, state: Arc<StateCell>) -> Self {
        Self { token, state }
    }

    /// Whether an emission attempted right now should be forwarded.
    ///
    /// `false` once the owning scope is cancelled or the bridge has started
    /// closing.
    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled() && self.state.is_open()
    }
}

impl std::fmt::Debug for EmissionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmissionGuard")
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::BridgeState;

    fn open_cell() -> Arc<StateCell> {
        let cell = Arc::new(StateCell::new());
        cell.advance(BridgeState::Idle, BridgeState::Open);
        cell
    }

    #[test]
    fn test_live_while_open() {
        let guard = EmissionGuard::new(CancellationToken::new(), open_cell());
        assert!(guard.is_live());
    }

    #[test]
    fn test_dead_after_cancellation() {
        let token = CancellationToken::new();
        let guard = EmissionGuard::new(token.clone(), open_cell());

        token.cancel();
        assert!(!guard.is_live());
    }

    #[test]
    fn test_dead_once_closing() {
        let cell = open_cell();
        let guard = EmissionGuard::new(CancellationToken::new(), cell.clone());

        cell.advance(BridgeState::Open, BridgeState::Closing);
        assert!(!guard.is_live());
    }

    #[test]
    fn test_dead_before_open() {
        let guard = EmissionGuard::new(CancellationToken::new(), Arc::new(StateCell::new()));
        assert!(!guard.is_live());
    }
}

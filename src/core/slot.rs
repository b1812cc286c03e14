//! # Exclusive ownership of a source's single registration point.
//!
//! Most native widgets expose exactly one listener slot per event kind, with
//! last-writer-wins semantics: setting a second listener silently orphans the
//! first. [`ListenerSlot`] turns that foot-gun into a hard invariant — at most
//! one live registration per source, and a teardown that runs exactly once.
//!
//! ## Lifecycle
//! ```text
//! Empty ──attach──► Attached ──detach──► Empty
//!   ▲                                      │
//!   └────────── (a new bridge may ─────────┘
//!                attach again later)
//! ```
//!
//! ## Rules
//! - `attach` while `Attached` fails with [`BridgeError::SlotOccupied`];
//!   nothing is registered and the existing registration is untouched.
//! - `detach` runs the stored teardown exactly once; later calls are no-ops.
//! - `detach` is safe from any exit path: explicit close, the cancellation
//!   watcher, consumer drop, or sink failure unwind.

use std::sync::Mutex;

use crate::error::BridgeError;

type Teardown = Box<dyn FnOnce() + Send>;

/// Exclusive-ownership wrapper around a native source's single registration
/// point.
///
/// An [`EventSource`](crate::EventSource) implementation embeds one slot per
/// listener it exposes; the bridge goes through the slot for every attach and
/// detach, which is what enforces the one-live-registration invariant across
/// bridges.
#[derive(Default)]
pub struct ListenerSlot {
    teardown: Mutex<Option<Teardown>>,
}

impl ListenerSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    /// Stores `teardown` and invokes `register`.
    ///
    /// The teardown is stored *before* `register` runs, so a concurrent
    /// attach observes the slot as occupied from the first possible moment.
    ///
    /// # Errors
    /// [`BridgeError::SlotOccupied`] if a registration is already live; in
    /// that case `register` is not invoked.
    pub fn attach(
        &self,
        register: impl FnOnce(),
        teardown: impl FnOnce() + Send + 'static,
    ) -> Result<(), BridgeError> {
        {
            let mut slot = lock(&self.teardown);
            if slot.is_some() {
                return Err(BridgeError::SlotOccupied);
            }
            *slot = Some(Box::new(teardown));
        }
        register();
        Ok(())
    }

    /// Runs the stored teardown, exactly once.
    ///
    /// Idempotent: a second call finds the slot empty and does nothing. The
    /// teardown runs outside the internal lock, so it may itself touch the
    /// source (and, transitively, this slot) without deadlocking.
    pub fn detach(&self) {
        let teardown = lock(&self.teardown).take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Whether a registration is currently live.
    pub fn is_attached(&self) -> bool {
        lock(&self.teardown).is_some()
    }
}

impl std::fmt::Debug for ListenerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("attached", &self.is_attached())
            .finish()
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
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_attach_registers_and_occupies() {
        let slot = ListenerSlot::new();
        let registered = Arc::new(AtomicU32::new(0));

        let r = registered.clone();
        slot.attach(|| { r.fetch_add(1, Ordering::SeqCst); }, || {})
            .unwrap();

        assert_eq!(registered.load(Ordering::SeqCst), 1);
        assert!(slot.is_attached());
    }

    #[test]
    fn test_second_attach_fails_without_registering() {
        let slot = ListenerSlot::new();
        slot.attach(|| {}, || {}).unwrap();

        let mut second_registered = false;
        let err = slot
            .attach(|| second_registered = true, || {})
            .unwrap_err();

        assert!(matches!(err, BridgeError::SlotOccupied));
        assert!(!second_registered);
    }

    #[test]
    fn test_detach_runs_teardown_exactly_once() {
        let slot = ListenerSlot::new();
        let torn_down = Arc::new(AtomicU32::new(0));

        let t = torn_down.clone();
        slot.attach(|| {}, move || { t.fetch_add(1, Ordering::SeqCst); })
            .unwrap();

        slot.detach();
        slot.detach();
        slot.detach();

        assert_eq!(torn_down.load(Ordering::SeqCst), 1);
        assert!(!slot.is_attached());
    }

    #[test]
    fn test_detach_on_empty_slot_is_noop() {
        let slot = ListenerSlot::new();
        slot.detach();
        assert!(!slot.is_attached());
    }

    #[test]
    fn test_reattach_after_detach() {
        let slot = ListenerSlot::new();
        slot.attach(|| {}, || {}).unwrap();
        slot.detach();

        // The source is free again; a new bridge may bind it.
        assert!(slot.attach(|| {}, || {}).is_ok());
        assert!(slot.is_attached());
    }
}

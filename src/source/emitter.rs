//! # Forwarding handle given to the native listener.
//!
//! When a bridge registers on a source, it hands the source an [`Emitter`].
//! The listener glue calls [`Emitter::emit`] with each native payload; the
//! emitter runs the liveness check, applies the optional handled-predicate
//! filter, and makes the non-blocking offer. That is the entire producer
//! path — it never suspends, never blocks, and never panics across the
//! callback boundary.

use std::sync::Arc;

use crate::core::EmissionGuard;
use crate::core::queue::EventQueue;

pub(crate) type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Cloneable emission handle for one bridge.
///
/// Listener closures capture an emitter (multi-method listeners may clone it
/// per callback) and funnel every native payload through the same guard and
/// queue.
pub struct Emitter<T> {
    guard: EmissionGuard,
    queue: Arc<EventQueue<T>>,
    filter: Option<Filter<T>>,
}

impl<T: Send + 'static> Emitter<T> {
    pub(crate) fn new(
        guard: EmissionGuard,
        queue: Arc<EventQueue<T>>,
        filter: Option<Filter<T>>,
    ) -> Self {
        Self {
            guard,
            queue,
            filter,
        }
    }

    /// Forwards one native payload into the bridge.
    ///
    /// Returns `true` if the value will reach the consumer. `false` covers
    /// every silent-drop case: the bridge is no longer live, the filter
    /// declined the value, or the capacity policy rejected the offer. The
    /// return value exists for listener glue that must answer the widget
    /// (e.g. an on-long-click "handled" flag); it is never an error signal.
    pub fn emit(&self, value: T) -> bool {
        if !self.guard.is_live() {
            return false;
        }
        if let Some(filter) = &self.filter {
            if !filter(&value) {
                return false;
            }
        }
        self.queue.offer(value).accepted()
    }

    /// Whether the bridge is still accepting emissions.
    pub fn is_live(&self) -> bool {
        self.guard.is_live()
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            guard: self.guard.clone(),
            queue: self.queue.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("guard", &self.guard)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

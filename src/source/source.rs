//! # Boundary contract with the native event source.
//!
//! A native widget is reached through exactly three operations: register one
//! callback, unregister it, and (optionally) answer a synchronous
//! current-state query for initial-value replay. The bridge never inspects
//! or mutates any other aspect of the source.
//!
//! Adapter authors implement [`EventSource`] once per widget/listener pair;
//! everything else — buffering, cancellation, teardown — is the bridge's
//! job.

use crate::core::ListenerSlot;
use crate::source::Emitter;

/// One native widget listener, seen from the bridge side.
///
/// Implementations own a [`ListenerSlot`] per registration point; the bridge
/// attaches and detaches through it, which is what enforces the
/// one-live-registration-per-source invariant.
///
/// Multi-method listeners (e.g. selected/unselected/reselected) funnel every
/// callback into the same emitter, usually with a sum-type `Event`.
///
/// # Example
/// ```
/// use std::sync::Mutex;
/// use evbind::{Emitter, EventSource, ListenerSlot};
///
/// /// Stand-in for a native button with one click listener slot.
/// struct Button {
///     slot: ListenerSlot,
///     listener: Mutex<Option<Emitter<u32>>>,
/// }
///
/// impl EventSource for Button {
///     type Event = u32;
///
///     fn slot(&self) -> &ListenerSlot {
///         &self.slot
///     }
///
///     fn register(&self, emitter: Emitter<u32>) {
///         *self.listener.lock().unwrap() = Some(emitter);
///     }
///
///     fn unregister(&self) {
///         self.listener.lock().unwrap().take();
///     }
/// }
/// ```
pub trait EventSource: Send + Sync + 'static {
    /// Payload carried by this listener's events.
    type Event: Send + 'static;

    /// The single registration point for this listener.
    fn slot(&self) -> &ListenerSlot;

    /// Installs the native callback, forwarding payloads via `emitter`.
    ///
    /// Called at most once per attachment, strictly after any initial-value
    /// replay, so the consumer always observes the baseline before live
    /// events.
    fn register(&self, emitter: Emitter<Self::Event>);

    /// Removes the native callback.
    ///
    /// Invoked through the slot's teardown, exactly once per attachment.
    /// Must tolerate late callbacks already in flight on the dispatch
    /// thread; the bridge discards them.
    fn unregister(&self);

    /// Synchronous snapshot of the source's current state, if it has one.
    ///
    /// Sources with a meaningful baseline ("currently focused?", "selected
    /// tab") return `Some`; the bridge replays it as the stream's first
    /// value. Trigger-style sources (clicks) keep the default `None`.
    fn current(&self) -> Option<Self::Event> {
        None
    }
}

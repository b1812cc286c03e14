//! # Bridge construction and wiring.
//!
//! [`EventBridge`] is the entry point: it owns the configuration a bridge is
//! built with (capacity policy, owning scope, replay flag, filter) and the
//! shared wiring sequence both consumption shapes go through:
//!
//! ```text
//! EventBridge::new(source)
//!     .capacity(...)
//!     .scope(token)
//!     ├─► open()          ──► EventStream<T>   (pull-based)
//!     └─► sink(handler)   ──► SinkHandle       (sequential push-consume)
//!
//! wiring order (both shapes):
//!   1. seed initial value from source.current()    — baseline first
//!   2. lifecycle Idle → Open
//!   3. slot.attach: store teardown, register listener
//!   4. spawn scope watcher (when a scope was given)
//! ```
//!
//! The builder is consumed by `open()`/`sink()`, so a closed bridge cannot
//! be reopened; bind the source again with a fresh bridge instead.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::bridge::sink::{Handler, SinkHandle};
use crate::bridge::stream::EventStream;
use crate::core::EmissionGuard;
use crate::core::close::CloseHandle;
use crate::core::queue::EventQueue;
use crate::core::state::{BridgeState, StateCell};
use crate::error::BridgeError;
use crate::policies::CapacityPolicy;
use crate::source::{Emitter, EventSource, Filter};

/// Everything both consumption shapes need after wiring.
pub(crate) struct BridgeParts<T> {
    pub(crate) queue: Arc<EventQueue<T>>,
    pub(crate) closer: Arc<CloseHandle>,
}

/// Adapter from a single-listener event source to an async consumer.
///
/// Defaults: [`CapacityPolicy::Rendezvous`], no owning scope, initial-value
/// replay enabled, no filter. Configuration is fixed once `open()` or
/// `sink()` runs.
///
/// # Example
/// ```no_run
/// # use std::sync::Mutex;
/// # use evbind::{CapacityPolicy, Emitter, EventBridge, EventSource, ListenerSlot};
/// # struct View { slot: ListenerSlot, listener: Mutex<Option<Emitter<bool>>> }
/// # impl EventSource for View {
/// #     type Event = bool;
/// #     fn slot(&self) -> &ListenerSlot { &self.slot }
/// #     fn register(&self, e: Emitter<bool>) { *self.listener.lock().unwrap() = Some(e); }
/// #     fn unregister(&self) { self.listener.lock().unwrap().take(); }
/// #     fn current(&self) -> Option<bool> { Some(false) }
/// # }
/// # async fn demo(view: View) -> Result<(), evbind::BridgeError> {
/// let mut focus = EventBridge::new(view)
///     .capacity(CapacityPolicy::Conflated)
///     .open()?;
///
/// while let Some(focused) = focus.recv().await {
///     println!("focused: {focused}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct EventBridge<S: EventSource> {
    source: Arc<S>,
    capacity: CapacityPolicy,
    scope: Option<CancellationToken>,
    replay: bool,
    filter: Option<Filter<S::Event>>,
}

impl<S: EventSource> EventBridge<S> {
    /// Starts configuring a bridge over `source`.
    pub fn new(source: S) -> Self {
        Self::from_arc(Arc::new(source))
    }

    /// Same as [`EventBridge::new`] for sources already behind an `Arc`
    /// (the usual case: the caller keeps a handle to fire/inspect the
    /// widget).
    pub fn from_arc(source: Arc<S>) -> Self {
        Self {
            source,
            capacity: CapacityPolicy::default(),
            scope: None,
            replay: true,
            filter: None,
        }
    }

    /// Sets the buffering policy. Default: [`CapacityPolicy::Rendezvous`];
    /// prefer [`CapacityPolicy::Conflated`] for state-style events.
    pub fn capacity(mut self, capacity: CapacityPolicy) -> Self {
        self.capacity = capacity;
        self
    }

    /// Ties the bridge to an owning cancellation scope.
    ///
    /// Cancelling `scope` closes the bridge: emissions stop, the listener is
    /// detached exactly once, and a suspended consumer observes graceful
    /// end-of-stream.
    pub fn scope(mut self, scope: CancellationToken) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Enables or disables initial-value replay. Default: enabled.
    ///
    /// With replay on, a source whose [`current`](EventSource::current)
    /// returns `Some` contributes a synthetic first value reflecting its
    /// state at open time, delivered strictly before any live event.
    pub fn replay(mut self, replay: bool) -> Self {
        self.replay = replay;
        self
    }

    /// Installs a predicate consulted on every live emission; values it
    /// declines are dropped before the capacity policy sees them, and the
    /// listener's [`Emitter::emit`] call reports `false` back to the widget
    /// glue.
    pub fn filter(mut self, filter: impl Fn(&S::Event) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Wires the bridge and exposes events as a pull-based stream.
    ///
    /// # Errors
    /// [`BridgeError::SlotOccupied`] if another bridge is already attached
    /// to this source.
    pub fn open(self) -> Result<EventStream<S::Event>, BridgeError> {
        let parts = self.connect()?;
        Ok(EventStream::new(parts.queue, parts.closer))
    }

    /// Wires the bridge and runs `handler` once per event, strictly in
    /// arrival order, on a spawned runner task.
    ///
    /// Must be called within a tokio runtime. A handler failure is fatal to
    /// the bridge and surfaces from [`SinkHandle::join`].
    ///
    /// # Errors
    /// [`BridgeError::SlotOccupied`] if another bridge is already attached
    /// to this source.
    pub fn sink<H>(self, handler: H) -> Result<SinkHandle, BridgeError>
    where
        H: Handler<S::Event>,
    {
        let parts = self.connect()?;
        Ok(SinkHandle::spawn(parts.queue, parts.closer, handler))
    }

    /// Shared wiring sequence; see the module docs for the ordering
    /// guarantees.
    fn connect(self) -> Result<BridgeParts<S::Event>, BridgeError> {
        let queue = Arc::new(EventQueue::new(self.capacity));
        let state = Arc::new(StateCell::new());
        let local = match &self.scope {
            Some(scope) => scope.child_token(),
            None => CancellationToken::new(),
        };
        let guard = EmissionGuard::new(local.clone(), state.clone());

        // Baseline strictly before live events.
        if self.replay {
            if let Some(value) = self.source.current() {
                queue.seed(value);
            }
        }

        state.advance(BridgeState::Idle, BridgeState::Open);

        let emitter = Emitter::new(guard, queue.clone(), self.filter.clone());
        let register_source = self.source.clone();
        let teardown_source = self.source.clone();
        self.source.slot().attach(
            move || register_source.register(emitter),
            move || teardown_source.unregister(),
        )?;

        let closer = {
            let queue = queue.clone();
            let source = self.source.clone();
            Arc::new(CloseHandle::new(state, local.clone(), move || {
                queue.close();
                source.slot().detach();
            }))
        };

        if let Some(scope) = self.scope {
            let closer = closer.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = scope.cancelled() => closer.close(),
                    _ = local.cancelled() => {}
                }
            });
        }

        Ok(BridgeParts { queue, closer })
    }
}

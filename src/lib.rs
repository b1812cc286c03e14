//! # evbind
//!
//! **Evbind** bridges push-based, single-listener event sources — native UI
//! widgets with a "set the callback" registration point — into
//! structured-concurrency consumers: a pull-based async stream, or a strictly
//! sequential per-event action sink.
//!
//! The crate is the one reusable abstraction behind the usual pile of
//! near-identical per-widget adapter functions: register a listener, forward
//! its payload, unregister on cancellation. Adapter authors implement
//! [`EventSource`] once per widget listener; the bridge owns everything
//! else — buffering, backpressure, initial-value replay, and
//! cancellation-safe teardown.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌───────────────┐  register /   ┌──────────────────────────────────────┐
//!  │ native source │  unregister   │  EventBridge                         │
//!  │ (one listener │◄─────────────►│  - ListenerSlot (exclusive attach)   │
//!  │  slot, may    │               │  - EmissionGuard (liveness check)    │
//!  │  answer       │  callback     │  - EventQueue (CapacityPolicy)       │
//!  │  current())   │──────────────►│  - CloseHandle (teardown once)       │
//!  └───────────────┘  emitter.emit └───────┬──────────────────┬───────────┘
//!                                          │                  │
//!                                    open()│            sink()│
//!                                          ▼                  ▼
//!                                 ┌────────────────┐ ┌─────────────────────┐
//!                                 │ EventStream<T> │ │ SinkHandle          │
//!                                 │ recv().await / │ │ handler.handle(ev)  │
//!                                 │ futures-Stream │ │ one at a time, in   │
//!                                 │ until None     │ │ arrival order       │
//!                                 └────────────────┘ └─────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──open/sink──► Open ──close / drop / scope cancel / fatal action──► Closing ──► Closed
//!
//! on every exit path:
//!   ├─► stop accepting emissions (guard trips)
//!   ├─► detach the native listener (exactly once)
//!   ├─► wake a suspended consumer into graceful end-of-stream
//!   └─► tolerate racing callbacks (silently discarded)
//! ```
//!
//! ## Features
//! | Area             | Description                                                    | Key types                              |
//! |------------------|----------------------------------------------------------------|----------------------------------------|
//! | **Source seam**  | Three-operation contract with the native widget.               | [`EventSource`], [`Emitter`]           |
//! | **Backpressure** | Non-blocking offers; policy fixed at construction.             | [`CapacityPolicy`], [`OverflowPolicy`] |
//! | **Exclusivity**  | One live registration per source, teardown exactly once.       | [`ListenerSlot`]                       |
//! | **Liveness**     | Late callbacks after close/cancel are silent no-ops.           | [`EmissionGuard`]                      |
//! | **Consumption**  | Pull-based stream or sequential action sink.                   | [`EventStream`], [`SinkHandle`]        |
//! | **Errors**       | Usage errors and fatal per-event action failures.              | [`BridgeError`], [`ActionError`]       |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use evbind::{CapacityPolicy, Emitter, EventBridge, EventSource, ListenerSlot};
//!
//! /// Stand-in for a native focusable view.
//! struct View {
//!     slot: ListenerSlot,
//!     focused: AtomicBool,
//!     listener: Mutex<Option<Emitter<bool>>>,
//! }
//!
//! impl View {
//!     fn fire(&self, focused: bool) {
//!         self.focused.store(focused, Ordering::SeqCst);
//!         if let Some(emitter) = &*self.listener.lock().unwrap() {
//!             emitter.emit(focused);
//!         }
//!     }
//! }
//!
//! impl EventSource for View {
//!     type Event = bool;
//!
//!     fn slot(&self) -> &ListenerSlot { &self.slot }
//!     fn register(&self, emitter: Emitter<bool>) {
//!         *self.listener.lock().unwrap() = Some(emitter);
//!     }
//!     fn unregister(&self) { self.listener.lock().unwrap().take(); }
//!     fn current(&self) -> Option<bool> {
//!         Some(self.focused.load(Ordering::SeqCst))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), evbind::BridgeError> {
//!     let view = Arc::new(View {
//!         slot: ListenerSlot::new(),
//!         focused: AtomicBool::new(false),
//!         listener: Mutex::new(None),
//!     });
//!
//!     // Conflated: only the latest focus state matters.
//!     let mut focus = EventBridge::from_arc(view.clone())
//!         .capacity(CapacityPolicy::Conflated)
//!         .open()?;
//!
//!     // First value is the replayed baseline, before any native event.
//!     assert_eq!(focus.recv().await, Some(false));
//!
//!     view.fire(true);
//!     assert_eq!(focus.recv().await, Some(true));
//!
//!     focus.close();
//!     assert_eq!(focus.recv().await, None); // graceful end-of-stream
//!     Ok(())
//! }
//! ```

mod bridge;
mod core;
mod error;
mod policies;
mod source;

// ---- Public re-exports ----

pub use bridge::{EventBridge, EventStream, Handler, HandlerFn, SinkHandle};
pub use self::core::{BridgeState, EmissionGuard, ListenerSlot};
pub use error::{ActionError, BridgeError};
pub use policies::{CapacityPolicy, OverflowPolicy};
pub use source::{Emitter, EventSource};

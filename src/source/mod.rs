//! The seam between the bridge and native widgets.
//!
//! ## Contents
//! - [`EventSource`] the three-operation contract an adapter implements
//!   (register / unregister / optional current-state query)
//! - [`Emitter`] the forwarding handle listener glue calls on each payload
//!
//! ## Quick wiring
//! ```text
//! EventBridge::open()
//!     └─► source.slot().attach(
//!             register: || source.register(emitter),
//!             teardown: || source.unregister(),
//!         )
//! native callback ──► emitter.emit(payload) ──► guard ──► queue
//! ```

mod emitter;
#[allow(clippy::module_inception)]
mod source;

pub(crate) use emitter::Filter;
pub use emitter::Emitter;
pub use source::EventSource;

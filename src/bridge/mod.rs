//! The two consumption shapes a bridge exposes.
//!
//! ## Contents
//! - [`EventBridge`] construction-time configuration and wiring
//! - [`EventStream`] pull-based: await values until graceful end-of-stream
//! - [`Handler`]/[`HandlerFn`]/[`SinkHandle`] push-based: run an action per
//!   event, strictly sequentially
//!
//! Both shapes share the same core underneath (queue, guard, slot, close
//! path); they differ only in who drives consumption.

mod builder;
mod sink;
mod stream;

pub use builder::EventBridge;
pub use sink::{Handler, HandlerFn, SinkHandle};
pub use stream::EventStream;

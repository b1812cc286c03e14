//! Delivery policies.
//!
//! This module groups the knobs that control **how many** undelivered events a
//! bridge may hold and **what happens** when that limit is reached.
//!
//! ## Contents
//! - [`CapacityPolicy`] how much to buffer (rendezvous / conflated / bounded / unbounded)
//! - [`OverflowPolicy`] what a full bounded queue does (reject-newest / drop-oldest)
//!
//! ## Quick wiring
//! ```text
//! EventBridge::new(source).capacity(CapacityPolicy::Conflated)
//!      └─► core::queue::EventQueue applies the policy on every offer
//! ```
//!
//! ## Defaults
//! - `CapacityPolicy::Rendezvous` (no buffering; matches "perform on event" sinks).
//! - `OverflowPolicy::RejectNewest` for bounded queues (ordered history wins).
//! - `CapacityPolicy::Conflated` is the recommended choice for state-style
//!   events (focus, selection) where only the latest value matters.

mod capacity;

pub use capacity::{CapacityPolicy, OverflowPolicy};

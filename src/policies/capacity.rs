//! # Buffering policy for undelivered events.
//!
//! [`CapacityPolicy`] controls how many events a bridge may hold between the
//! native callback that produced them and the consumer that has not pulled
//! them yet, and what happens when that limit is hit. The policy is fixed at
//! bridge construction and never changes at runtime.
//!
//! ## Picking a policy
//! - [`CapacityPolicy::Rendezvous`] — no buffer; an event is delivered only if
//!   the consumer is waiting right now. Good for discrete triggers (clicks)
//!   where missing one while busy is acceptable.
//! - [`CapacityPolicy::Conflated`] — buffer of one, most-recent-wins. Good for
//!   state-style events (focus, selection, scroll position) where only the
//!   latest value matters.
//! - [`CapacityPolicy::Bounded`] — queue up to `capacity` events, with an
//!   explicit [`OverflowPolicy`]. Good for ordered event logs.
//! - [`CapacityPolicy::Unbounded`] — never drop; memory is the limit.
//!
//! # Example
//! ```
//! use evbind::{CapacityPolicy, OverflowPolicy};
//!
//! // Default is rendezvous: no buffering at all.
//! assert_eq!(CapacityPolicy::default(), CapacityPolicy::Rendezvous);
//!
//! // Bounded queues reject the incoming event by default.
//! let bounded = CapacityPolicy::bounded(16);
//! assert_eq!(
//!     bounded,
//!     CapacityPolicy::Bounded { capacity: 16, overflow: OverflowPolicy::RejectNewest }
//! );
//! ```

/// What to do when a bounded queue is full and a new event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the incoming event; queued history is preserved.
    ///
    /// This is the default: silently losing the *oldest* event is usually
    /// wrong for an ordered event log.
    #[default]
    RejectNewest,

    /// Evict the oldest queued event to make room for the incoming one.
    DropOldest,
}

/// How many undelivered events a bridge may hold.
///
/// Every emission is a non-blocking offer against this policy; the native
/// callback thread is never stalled, whatever the policy says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// No buffering. An offer succeeds only if the consumer is currently
    /// waiting for a value; otherwise the event is dropped.
    #[default]
    Rendezvous,

    /// Buffer of one with most-recent-wins semantics: a new event replaces a
    /// pending undelivered one.
    Conflated,

    /// Ring of up to `capacity` events with an explicit overflow rule.
    ///
    /// `capacity` is clamped to a minimum of 1 when the queue is built.
    Bounded {
        /// Maximum number of undelivered events held at once.
        capacity: usize,
        /// What to do when the queue is full.
        overflow: OverflowPolicy,
    },

    /// Queue without a limit. Offers always succeed while the bridge is open.
    Unbounded,
}

impl CapacityPolicy {
    /// Creates a bounded policy with the default overflow rule
    /// ([`OverflowPolicy::RejectNewest`]).
    ///
    /// `capacity` is clamped to a minimum of 1.
    pub fn bounded(capacity: usize) -> Self {
        CapacityPolicy::Bounded {
            capacity: capacity.max(1),
            overflow: OverflowPolicy::RejectNewest,
        }
    }

    /// Creates a bounded policy that evicts the oldest queued event on
    /// overflow.
    ///
    /// `capacity` is clamped to a minimum of 1.
    pub fn bounded_drop_oldest(capacity: usize) -> Self {
        CapacityPolicy::Bounded {
            capacity: capacity.max(1),
            overflow: OverflowPolicy::DropOldest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_rendezvous() {
        assert_eq!(CapacityPolicy::default(), CapacityPolicy::Rendezvous);
    }

    #[test]
    fn test_bounded_clamps_to_one() {
        assert_eq!(
            CapacityPolicy::bounded(0),
            CapacityPolicy::Bounded {
                capacity: 1,
                overflow: OverflowPolicy::RejectNewest
            }
        );
    }

    #[test]
    fn test_bounded_drop_oldest() {
        assert_eq!(
            CapacityPolicy::bounded_drop_oldest(8),
            CapacityPolicy::Bounded {
                capacity: 8,
                overflow: OverflowPolicy::DropOldest
            }
        );
    }

    #[test]
    fn test_default_overflow_rejects_newest() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::RejectNewest);
    }
}

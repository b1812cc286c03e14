//! Error types used by the bridge and its sink runner.
//!
//! This module defines two main error enums:
//!
//! - [`BridgeError`] — usage errors raised while wiring a bridge to a source.
//! - [`ActionError`] — failures raised by a per-event handler in the sink shape.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Backpressure rejections and late deliveries are *not* errors: an offer that
//! cannot be queued is silently dropped (and counted), and an emission arriving
//! after close/cancellation is silently discarded. Nothing in this module ever
//! crosses into the native callback thread.

use thiserror::Error;

/// # Usage errors raised while opening a bridge.
///
/// These are programming errors, not runtime conditions: they are never
/// retried, and the bridge is not partially wired when one is returned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The source's listener slot already holds a live registration.
    ///
    /// Most native widgets expose a single listener slot with last-writer-wins
    /// semantics; silently replacing the registration would orphan the bridge
    /// that installed it. A second attach therefore fails loudly instead.
    #[error("listener slot is already attached")]
    SlotOccupied,
}

impl BridgeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evbind::BridgeError;
    ///
    /// assert_eq!(BridgeError::SlotOccupied.as_label(), "slot_occupied");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BridgeError::SlotOccupied => "slot_occupied",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BridgeError::SlotOccupied => {
                "a listener is already attached to this source; \
                 close the previous bridge before opening a new one"
                    .to_string()
            }
        }
    }
}

/// # Failures raised by a per-event handler.
///
/// Produced only by the sink consumption shape. Any `ActionError` is fatal to
/// the owning bridge: the runner stops, the listener is detached, and the
/// error surfaces from [`SinkHandle::join`](crate::SinkHandle::join).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActionError {
    /// The handler returned an error for an event.
    #[error("action failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The handler panicked while processing an event.
    ///
    /// The panic is caught at the runner boundary and converted; it never
    /// unwinds into the runtime or the native callback thread.
    #[error("action panicked: {error}")]
    Panicked {
        /// Panic payload rendered as a message.
        error: String,
    },
}

impl ActionError {
    /// Creates a [`ActionError::Failed`] from any displayable error.
    ///
    /// # Example
    /// ```
    /// use evbind::ActionError;
    ///
    /// let err = ActionError::failed("connection refused");
    /// assert_eq!(err.as_label(), "action_failed");
    /// ```
    pub fn failed(error: impl Into<String>) -> Self {
        ActionError::Failed {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Failed { .. } => "action_failed",
            ActionError::Panicked { .. } => "action_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::Failed { error } => format!("error: {error}"),
            ActionError::Panicked { error } => format!("panic: {error}"),
        }
    }

    /// Indicates whether this failure came from a caught panic.
    pub fn is_panic(&self) -> bool {
        matches!(self, ActionError::Panicked { .. })
    }
}

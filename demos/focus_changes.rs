//! # Example: focus_changes
//!
//! Bridges a fake focusable view into a conflated stream with initial-value
//! replay — the state-style binding shape.
//!
//! Shows how to:
//! - Implement [`EventSource`] for a widget with a current-state query.
//! - Pick [`CapacityPolicy::Conflated`] for events where only the latest
//!   value matters.
//! - Consume until graceful end-of-stream.
//!
//! ## Flow
//! ```text
//! FocusView::fire(bool) ──► Emitter::emit ──► EmissionGuard ──► queue (Conflated)
//!                                                                  │
//!     baseline from FocusView::current() first ──► EventStream::recv().await
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example focus_changes
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use evbind::{CapacityPolicy, Emitter, EventBridge, EventSource, ListenerSlot};

/// Stand-in for a native view with one focus-change listener slot.
struct FocusView {
    slot: ListenerSlot,
    focused: AtomicBool,
    listener: Mutex<Option<Emitter<bool>>>,
}

impl FocusView {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: ListenerSlot::new(),
            focused: AtomicBool::new(false),
            listener: Mutex::new(None),
        })
    }

    /// Simulates the UI dispatch thread delivering a focus change.
    fn fire(&self, focused: bool) {
        self.focused.store(focused, Ordering::SeqCst);
        if let Some(emitter) = &*self.listener.lock().unwrap() {
            emitter.emit(focused);
        }
    }
}

impl EventSource for FocusView {
    type Event = bool;

    fn slot(&self) -> &ListenerSlot {
        &self.slot
    }

    fn register(&self, emitter: Emitter<bool>) {
        *self.listener.lock().unwrap() = Some(emitter);
    }

    fn unregister(&self) {
        self.listener.lock().unwrap().take();
    }

    fn current(&self) -> Option<bool> {
        Some(self.focused.load(Ordering::SeqCst))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let view = FocusView::new();

    let mut focus = EventBridge::from_arc(view.clone())
        .capacity(CapacityPolicy::Conflated)
        .open()?;

    // Simulated UI dispatch thread.
    let ui = {
        let view = view.clone();
        tokio::spawn(async move {
            for focused in [true, false, true] {
                tokio::time::sleep(Duration::from_millis(50)).await;
                view.fire(focused);
            }
        })
    };

    // The first value is the replayed baseline, before any native event.
    println!("[focus] baseline: {:?}", focus.recv().await);

    for _ in 0..3 {
        match focus.recv().await {
            Some(focused) => println!("[focus] changed: {focused}"),
            None => break,
        }
    }

    ui.await?;
    focus.close();
    assert_eq!(focus.recv().await, None);
    println!("[focus] stream ended gracefully");
    Ok(())
}

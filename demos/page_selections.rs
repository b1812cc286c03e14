//! # Example: page_selections
//!
//! Bridges a fake pager into the sink shape: a handler runs once per page
//! selection, strictly in arrival order, with the whole binding owned by a
//! cancellation scope.
//!
//! Shows how to:
//! - Consume events with [`EventBridge::sink`] and a [`HandlerFn`] closure.
//! - Tie a bridge to an owning [`CancellationToken`] scope.
//! - Read the backpressure drop counter after the fact.
//!
//! ## Flow
//! ```text
//! Pager::swipe(page) ──► emitter.emit ──► queue (Conflated) ──► runner task
//!                                                                  │
//!                                                        handler(page).await
//!                                                      (one at a time, in order)
//! scope.cancel() ──► close bridge ──► runner drains ──► join() = Ok(())
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example page_selections
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use evbind::{CapacityPolicy, Emitter, EventBridge, EventSource, HandlerFn, ListenerSlot};

/// Stand-in for a native pager with one page-change listener slot.
struct Pager {
    slot: ListenerSlot,
    page: AtomicU32,
    listener: Mutex<Option<Emitter<u32>>>,
}

impl Pager {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: ListenerSlot::new(),
            page: AtomicU32::new(0),
            listener: Mutex::new(None),
        })
    }

    /// Simulates a swipe landing on `page`, on the UI dispatch thread.
    fn swipe(&self, page: u32) {
        self.page.store(page, Ordering::SeqCst);
        if let Some(emitter) = &*self.listener.lock().unwrap() {
            emitter.emit(page);
        }
    }
}

impl EventSource for Pager {
    type Event = u32;

    fn slot(&self) -> &ListenerSlot {
        &self.slot
    }

    fn register(&self, emitter: Emitter<u32>) {
        *self.listener.lock().unwrap() = Some(emitter);
    }

    fn unregister(&self) {
        self.listener.lock().unwrap().take();
    }

    fn current(&self) -> Option<u32> {
        Some(self.page.load(Ordering::SeqCst))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let scope = CancellationToken::new();
    let pager = Pager::new();

    let handler = HandlerFn::new(|page: u32| async move {
        println!("[pager] showing page {page}");
        // Simulate per-page work; later swipes conflate while this runs.
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok(())
    });

    let sink = EventBridge::from_arc(pager.clone())
        .capacity(CapacityPolicy::Conflated)
        .scope(scope.clone())
        .sink(handler)?;

    for page in [1, 2, 3, 4] {
        pager.swipe(page);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Let the runner catch up, then cancel the owning scope.
    tokio::time::sleep(Duration::from_millis(200)).await;
    scope.cancel();

    let dropped = sink.dropped();
    sink.join().await?;

    println!("[pager] sink ended gracefully ({dropped} swipes conflated away)");
    Ok(())
}

//! # Example: tab_selection
//!
//! Bridges a fake tab bar whose native listener has *three* callback methods
//! (selected / unselected / reselected) into one stream of a sum-type event.
//! Multi-method listeners funnel every case through the same emitter.
//!
//! Shows how to:
//! - Model a tagged-variant event payload for a multi-method listener.
//! - Replay the currently selected tab as the baseline value.
//! - Keep full event order with [`CapacityPolicy::Unbounded`].
//!
//! ## Flow
//! ```text
//! TabBar::select(i)
//!     ├─► Unselected { tab: old }  ──┐
//!     ├─► Selected   { tab: i }    ──┼──► emitter.emit ──► queue ──► recv()
//!     └─► Reselected { tab: i }    ──┘
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example tab_selection
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use evbind::{CapacityPolicy, Emitter, EventBridge, EventSource, ListenerSlot};

/// One tab-selection lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TabEvent {
    Selected { tab: usize },
    Unselected { tab: usize },
    Reselected { tab: usize },
}

/// Stand-in for a native tab bar with one selection listener slot.
struct TabBar {
    slot: ListenerSlot,
    selected: AtomicUsize,
    listener: Mutex<Option<Emitter<TabEvent>>>,
}

impl TabBar {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            slot: ListenerSlot::new(),
            selected: AtomicUsize::new(0),
            listener: Mutex::new(None),
        })
    }

    fn emit(&self, event: TabEvent) {
        if let Some(emitter) = &*self.listener.lock().unwrap() {
            emitter.emit(event);
        }
    }

    /// Simulates a user tapping tab `tab` on the UI dispatch thread.
    fn select(&self, tab: usize) {
        let previous = self.selected.swap(tab, Ordering::SeqCst);
        if previous == tab {
            self.emit(TabEvent::Reselected { tab });
        } else {
            self.emit(TabEvent::Unselected { tab: previous });
            self.emit(TabEvent::Selected { tab });
        }
    }
}

impl EventSource for TabBar {
    type Event = TabEvent;

    fn slot(&self) -> &ListenerSlot {
        &self.slot
    }

    fn register(&self, emitter: Emitter<TabEvent>) {
        *self.listener.lock().unwrap() = Some(emitter);
    }

    fn unregister(&self) {
        self.listener.lock().unwrap().take();
    }

    fn current(&self) -> Option<TabEvent> {
        Some(TabEvent::Selected {
            tab: self.selected.load(Ordering::SeqCst),
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let tabs = TabBar::new();

    let mut selections = EventBridge::from_arc(tabs.clone())
        .capacity(CapacityPolicy::Unbounded)
        .open()?;

    // Tap around: switch to 2, re-tap 2, switch to 1.
    tabs.select(2);
    tabs.select(2);
    tabs.select(1);
    selections.close();

    // Baseline first (tab 0 was selected at open), then the taps in order.
    while let Some(event) = selections.recv().await {
        match event {
            TabEvent::Selected { tab } => println!("[tabs] selected:   {tab}"),
            TabEvent::Unselected { tab } => println!("[tabs] unselected: {tab}"),
            TabEvent::Reselected { tab } => println!("[tabs] reselected: {tab}"),
        }
    }

    println!("[tabs] stream ended gracefully");
    Ok(())
}

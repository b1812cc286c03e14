//! # Push-based consumption shape: run an action per event.
//!
//! Instead of exposing a stream, [`EventBridge::sink`](crate::EventBridge::sink)
//! feeds a spawned runner that executes one async handler call per event,
//! strictly in arrival order — a handler call completes (including all of
//! its own suspension) before the next queued event's call begins.
//!
//! ## Architecture
//! ```text
//! emitter ──offer──► [queue] ──recv──► runner task ──► handler.handle(event)
//!                                          │                  │
//!                                          │             Err / panic
//!                                          │                  ▼
//!                                          │        close bridge (detach)
//!                                          └──────► SinkHandle::join() ──► Result
//! ```
//!
//! ## Rules
//! - **Sequential, never concurrent**: one runner, one in-flight handler
//!   call.
//! - **Failure is fatal**: a handler error or panic stops the runner, tears
//!   the bridge down, and surfaces from [`SinkHandle::join`]. Nothing is
//!   retried.
//! - **Graceful paths stay quiet**: explicit close and scope cancellation
//!   drain the queue and resolve `join()` with `Ok(())`.
//!
//! ## Panic handling
//! Handler futures run under `catch_unwind`; a panic is converted to
//! [`ActionError::Panicked`] and follows the fatal-failure path. It never
//! unwinds into the runtime or the native callback thread.

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::core::BridgeState;
use crate::core::close::CloseHandle;
use crate::core::queue::EventQueue;
use crate::error::ActionError;

/// Per-event action run by the sink shape.
///
/// Called from the runner task, never from the native callback thread.
/// Implementations may suspend freely; the queue buffers (per the bridge's
/// capacity policy) while a call is in flight.
///
/// For one-off closures, see [`HandlerFn`].
#[async_trait]
pub trait Handler<T: Send + 'static>: Send + Sync + 'static {
    /// Processes a single event. Any `Err` is fatal to the bridge.
    async fn handle(&self, event: T) -> Result<(), ActionError>;
}

/// Function-backed [`Handler`].
///
/// Wraps a closure that creates a fresh future per event; shared state goes
/// through an explicit `Arc` inside the closure if needed.
///
/// # Example
/// ```
/// use evbind::{ActionError, HandlerFn};
///
/// let handler = HandlerFn::new(|page: u32| async move {
///     println!("page selected: {page}");
///     Ok::<(), ActionError>(())
/// });
/// # let _ = handler;
/// ```
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<T, F, Fut> Handler<T> for HandlerFn<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), ActionError>> + Send + 'static,
{
    async fn handle(&self, event: T) -> Result<(), ActionError> {
        (self.f)(event).await
    }
}

/// Owner handle for a running sink.
///
/// The runner belongs to the bridge, not to this handle: dropping the handle
/// leaves the sink consuming until the owning scope cancels or a handler
/// fails. [`close`](SinkHandle::close) ends it gracefully;
/// [`join`](SinkHandle::join) awaits the runner and surfaces a fatal
/// handler failure, if any.
pub struct SinkHandle {
    runner: JoinHandle<Result<(), ActionError>>,
    closer: Arc<CloseHandle>,
    dropped: Box<dyn Fn() -> u64 + Send + Sync>,
}

impl SinkHandle {
    pub(crate) fn spawn<T, H>(
        queue: Arc<EventQueue<T>>,
        closer: Arc<CloseHandle>,
        handler: H,
    ) -> Self
    where
        T: Send + 'static,
        H: Handler<T>,
    {
        let runner = {
            let queue = queue.clone();
            let closer = closer.clone();
            tokio::spawn(async move {
                let result = drain(&queue, &handler).await;
                // Teardown on every exit path; a no-op if close() already ran.
                closer.close();
                result
            })
        };

        Self {
            runner,
            closer,
            dropped: Box::new(move || queue.dropped()),
        }
    }

    /// Closes the bridge: stops intake and detaches the listener. The runner
    /// finishes the in-flight handler call, drains what was already
    /// buffered, then resolves `join()` with `Ok(())`. Safe to call any
    /// number of times.
    pub fn close(&self) {
        self.closer.close();
    }

    /// Current lifecycle state of the bridge.
    pub fn state(&self) -> BridgeState {
        self.closer.state()
    }

    /// Number of offers lost to backpressure so far.
    pub fn dropped(&self) -> u64 {
        (self.dropped)()
    }

    /// Awaits the runner and reports how the sink ended.
    ///
    /// `Ok(())` after a graceful close or scope cancellation; the fatal
    /// [`ActionError`] if a handler call failed or panicked.
    pub async fn join(self) -> Result<(), ActionError> {
        match self.runner.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => Err(ActionError::Panicked {
                error: "sink runner panicked".to_string(),
            }),
            // Runner aborted by runtime shutdown: nothing to report.
            Err(_) => Ok(()),
        }
    }
}

impl std::fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkHandle")
            .field("state", &self.closer.state())
            .finish()
    }
}

/// Sequential drain loop: one handler call at a time, in arrival order.
async fn drain<T, H>(queue: &EventQueue<T>, handler: &H) -> Result<(), ActionError>
where
    T: Send + 'static,
    H: Handler<T>,
{
    while let Some(event) = queue.recv().await {
        let action = handler.handle(event);
        match std::panic::AssertUnwindSafe(action).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(panic) => {
                return Err(ActionError::Panicked {
                    error: panic_message(panic.as_ref()),
                });
            }
        }
    }
    Ok(())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;

    use crate::core::{BridgeState, ListenerSlot};
    use crate::error::ActionError;
    use crate::policies::CapacityPolicy;
    use crate::source::{Emitter, EventSource};
    use crate::{EventBridge, HandlerFn};

    /// Stand-in for a native pager: one page-change listener slot.
    struct FakePager {
        slot: ListenerSlot,
        listener: StdMutex<Option<Emitter<u32>>>,
        unregistered: AtomicU32,
    }

    impl FakePager {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                slot: ListenerSlot::new(),
                listener: StdMutex::new(None),
                unregistered: AtomicU32::new(0),
            })
        }

        fn fire(&self, page: u32) -> bool {
            match &*self.listener.lock().unwrap() {
                Some(emitter) => emitter.emit(page),
                None => false,
            }
        }
    }

    impl EventSource for FakePager {
        type Event = u32;

        fn slot(&self) -> &ListenerSlot {
            &self.slot
        }

        fn register(&self, emitter: Emitter<u32>) {
            *self.listener.lock().unwrap() = Some(emitter);
        }

        fn unregister(&self) {
            self.listener.lock().unwrap().take();
            self.unregistered.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_action_stays_strictly_sequential() {
        let pager = FakePager::new();
        let log: Arc<StdMutex<Vec<String>>> = Arc::new(StdMutex::new(Vec::new()));

        let handler = {
            let log = log.clone();
            HandlerFn::new(move |page: u32| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(format!("start {page}"));
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    log.lock().unwrap().push(format!("end {page}"));
                    Ok(())
                }
            })
        };

        let sink = EventBridge::from_arc(pager.clone())
            .capacity(CapacityPolicy::Unbounded)
            .sink(handler)
            .unwrap();

        // Two events in quick succession while the first action is slow.
        assert!(pager.fire(1));
        assert!(pager.fire(2));

        tokio::time::sleep(Duration::from_millis(500)).await;
        sink.close();
        sink.join().await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(*log, vec!["start 1", "end 1", "start 2", "end 2"]);
    }

    #[tokio::test]
    async fn test_handler_error_is_fatal_and_tears_down() {
        let pager = FakePager::new();
        let handler = HandlerFn::new(|page: u32| async move {
            if page == 2 {
                return Err(ActionError::failed("page 2 is broken"));
            }
            Ok(())
        });

        let sink = EventBridge::from_arc(pager.clone())
            .capacity(CapacityPolicy::Unbounded)
            .sink(handler)
            .unwrap();

        pager.fire(1);
        pager.fire(2);

        let err = sink.join().await.unwrap_err();
        assert_eq!(err.as_label(), "action_failed");
        assert_eq!(pager.unregistered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_panic_is_caught_and_fatal() {
        let pager = FakePager::new();
        let handler = HandlerFn::new(|_page: u32| async move {
            panic!("boom");
        });

        let sink = EventBridge::from_arc(pager.clone())
            .capacity(CapacityPolicy::Unbounded)
            .sink(handler)
            .unwrap();

        pager.fire(1);

        let err = sink.join().await.unwrap_err();
        assert!(err.is_panic());
        assert_eq!(pager.unregistered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_close_resolves_join_ok() {
        let pager = FakePager::new();
        let seen = Arc::new(AtomicU32::new(0));

        let handler = {
            let seen = seen.clone();
            HandlerFn::new(move |_page: u32| {
                let seen = seen.clone();
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
        };

        let sink = EventBridge::from_arc(pager.clone())
            .capacity(CapacityPolicy::Unbounded)
            .sink(handler)
            .unwrap();

        pager.fire(1);
        tokio::task::yield_now().await;

        sink.close();
        assert_eq!(sink.state(), BridgeState::Closed);
        sink.join().await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(pager.unregistered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scope_cancellation_stops_sink_gracefully() {
        let scope = CancellationToken::new();
        let pager = FakePager::new();

        let sink = EventBridge::from_arc(pager.clone())
            .scope(scope.clone())
            .sink(HandlerFn::new(|_page: u32| async { Ok(()) }))
            .unwrap();

        scope.cancel();
        sink.join().await.unwrap();

        assert_eq!(pager.unregistered.load(Ordering::SeqCst), 1);
        assert!(!pager.fire(9)); // late callback: no delivery, no error
    }
}

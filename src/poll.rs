// src/poll.rs

//! Snapshot poller over a fallible fetch. Holds the last-known-good dataset
//! across failures, re-fetches on a fixed interval, and applies results
//! through a generation ticket so an older in-flight fetch can never
//! overwrite a newer one — including results that settle after shutdown.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<Vec<T>, crate::sheets::SheetError>> + Send>>;
type FetchFn<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Point-in-time view of the polled dataset.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// Last successfully fetched dataset; retained across failures, replaced
    /// wholesale on success.
    pub data: Option<Vec<T>>,
    /// Message from the most recent failed fetch; cleared on success.
    pub error: Option<String>,
    /// True until the in-flight fetch settles.
    pub loading: bool,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: true,
        }
    }
}

struct State<T> {
    /// Ticket of the fetch whose result currently backs the snapshot.
    applied: u64,
    snapshot: Snapshot<T>,
}

struct Inner<T> {
    fetch: FetchFn<T>,
    state: RwLock<State<T>>,
    issued: AtomicU64,
    shutdown: AtomicBool,
}

impl<T: Clone + Send + Sync + 'static> Inner<T> {
    /// Issue a fetch and apply its result unless a newer fetch already has,
    /// or the poller shut down while it was in flight.
    async fn run_fetch(&self) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            state.snapshot.loading = true;
        }

        let result = (self.fetch)().await;

        if self.shutdown.load(Ordering::SeqCst) {
            debug!(ticket, "discarding fetch result after teardown");
            return;
        }
        let mut state = self.state.write().await;
        if ticket <= state.applied {
            debug!(ticket, applied = state.applied, "discarding stale fetch result");
            return;
        }
        state.applied = ticket;
        state.snapshot.loading = false;
        match result {
            Ok(data) => {
                state.snapshot.data = Some(data);
                state.snapshot.error = None;
            }
            Err(err) => {
                warn!(%err, "poll fetch failed; keeping last-known-good data");
                state.snapshot.error = Some(err.to_string());
            }
        }
    }
}

/// Handle to a polling stream. Each instance is an independent resource:
/// the interval task is spawned on construction and aborted on drop.
pub struct Poller<T> {
    inner: Arc<Inner<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> Poller<T> {
    /// Run the initial fetch, then keep re-fetching every `interval` (if
    /// given) until the poller is dropped. The constructor resolves once the
    /// initial fetch settles.
    pub async fn spawn<F, Fut>(fetch: F, interval: Option<Duration>) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, crate::sheets::SheetError>> + Send + 'static,
    {
        let fetch: FetchFn<T> = Arc::new(move || Box::pin(fetch()) as FetchFuture<T>);
        let inner = Arc::new(Inner {
            fetch,
            state: RwLock::new(State {
                applied: 0,
                snapshot: Snapshot::default(),
            }),
            issued: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        });

        inner.run_fetch().await;

        let task = interval.map(|every| {
            let inner = Arc::clone(&inner);
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(every).await;
                    inner.run_fetch().await;
                }
            })
        });

        Self { inner, task }
    }

    /// Fetch now, without resetting the interval timer.
    pub async fn refetch(&self) {
        self.inner.run_fetch().await;
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        self.inner.state.read().await.snapshot.clone()
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.inner.shutdown.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

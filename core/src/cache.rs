//! Client-side cache for the todo list.
//!
//! # Design
//! One authoritative snapshot, published through a `watch` channel;
//! observers subscribe to the channel and never touch cache internals.
//! Fetches run as spawned tasks tagged with a generation number.
//! Cancelling a fetch aborts its task *and* advances the generation, so a
//! fetch that already passed its last await installs nothing. The
//! cancel, snapshot, patch sequence of an optimistic mutation runs inside
//! a single mutex-guarded critical section with no await point, which
//! serializes competing mutations and keeps a stale response from landing
//! between the snapshot and the patch.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, trace, warn};

use crate::api::TodosApi;
use crate::types::Todo;

/// Snapshot of the cached todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// No fetch has completed yet.
    Absent,
    /// The list as of the last completed fetch, plus any optimistic
    /// patches applied since.
    Ready(Vec<Todo>),
    /// The last fetch failed; the previous list, if any, was discarded.
    Failed(String),
}

impl ListState {
    /// The items, when the list is available.
    pub fn todos(&self) -> Option<&[Todo]> {
        match self {
            ListState::Ready(todos) => Some(todos),
            _ => None,
        }
    }
}

/// Whether a fetch for the list is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Fetching,
}

struct CacheInner {
    /// Generation of the fetch whose result is still allowed to install.
    generation: u64,
    /// Abort handle for the in-flight fetch task, if any.
    inflight: Option<AbortHandle>,
}

/// The single authoritative cache entry for the todo list.
///
/// Clones share state; hand one to each mutation coordinator and keep one
/// for the observer side.
#[derive(Clone)]
pub struct TodoCache {
    api: TodosApi,
    inner: Arc<Mutex<CacheInner>>,
    snapshot_tx: watch::Sender<ListState>,
    status_tx: watch::Sender<FetchStatus>,
}

impl TodoCache {
    /// Create an empty cache that fetches through `api`.
    pub fn new(api: TodosApi) -> Self {
        let (snapshot_tx, _) = watch::channel(ListState::Absent);
        let (status_tx, _) = watch::channel(FetchStatus::Idle);
        Self {
            api,
            inner: Arc::new(Mutex::new(CacheInner {
                generation: 0,
                inflight: None,
            })),
            snapshot_tx,
            status_tx,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> ListState {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.snapshot_tx.subscribe()
    }

    /// Current fetch status.
    pub fn fetch_status(&self) -> FetchStatus {
        *self.status_tx.borrow()
    }

    /// Subscribe to fetch status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<FetchStatus> {
        self.status_tx.subscribe()
    }

    /// Mark the cached list stale and start a background refetch.
    ///
    /// Any fetch already in flight is cancelled first; its result would be
    /// stale by definition. Must be called from within a tokio runtime.
    pub fn invalidate(&self) {
        let mut inner = self.inner.lock();
        self.cancel_inflight(&mut inner);
        let generation = inner.generation;
        debug!(generation, "cache invalidated, refetching");

        let cache = self.clone();
        let handle = tokio::spawn(async move { cache.run_fetch(generation).await });
        inner.inflight = Some(handle.abort_handle());
        self.status_tx.send_replace(FetchStatus::Fetching);
    }

    /// Refetch in the foreground: invalidate, then wait for the result to
    /// land.
    pub async fn refetch(&self) {
        self.invalidate();
        self.wait_idle().await;
    }

    /// Wait until no fetch is in flight.
    pub async fn wait_idle(&self) {
        let mut status = self.status_tx.subscribe();
        loop {
            if *status.borrow_and_update() == FetchStatus::Idle {
                return;
            }
            if status.changed().await.is_err() {
                return;
            }
        }
    }

    /// Apply `patch` to a clone of the current list and install the result,
    /// returning the snapshot captured just before the patch.
    ///
    /// The in-flight fetch, if any, is cancelled first so a stale response
    /// cannot overwrite the patch. The whole sequence runs inside one
    /// critical section; competing mutations serialize here.
    pub(crate) fn apply_optimistic(&self, patch: impl FnOnce(&mut Vec<Todo>)) -> ListState {
        let mut inner = self.inner.lock();
        self.cancel_inflight(&mut inner);
        self.status_tx.send_replace(FetchStatus::Idle);

        let prior = self.snapshot_tx.borrow().clone();
        if let ListState::Ready(todos) = &prior {
            let mut patched = todos.clone();
            patch(&mut patched);
            self.snapshot_tx.send_replace(ListState::Ready(patched));
        }
        prior
    }

    /// Reinstall a snapshot captured by [`apply_optimistic`], verbatim.
    ///
    /// The caller is expected to invalidate afterwards; the corrective
    /// refetch heals whatever the blind restore got wrong.
    pub(crate) fn rollback(&self, prior: ListState) {
        debug!("mutation failed, restoring pre-patch snapshot");
        self.snapshot_tx.send_replace(prior);
    }

    async fn run_fetch(self, generation: u64) {
        let result = self.api.list().await;

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            trace!(generation, "fetch superseded, discarding result");
            return;
        }
        inner.inflight = None;

        match result {
            Ok(todos) => {
                trace!(count = todos.len(), "installing fetched list");
                self.snapshot_tx.send_replace(ListState::Ready(todos));
            }
            Err(e) => {
                warn!(error = %e, "todo list fetch failed");
                self.snapshot_tx.send_replace(ListState::Failed(e.to_string()));
            }
        }
        self.status_tx.send_replace(FetchStatus::Idle);
    }

    /// Cancel the in-flight fetch, if any, and advance the generation so a
    /// completed-but-uninstalled result gets discarded.
    fn cancel_inflight(&self, inner: &mut CacheInner) {
        inner.generation += 1;
        if let Some(handle) = inner.inflight.take() {
            handle.abort();
            trace!("cancelled in-flight fetch");
        }
    }
}

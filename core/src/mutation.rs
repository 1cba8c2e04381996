//! Mutation coordinators: one per mutation type, each wrapping a remote
//! call with the optimistic-update protocol.
//!
//! # Design
//! Update and delete patch the cached list immediately, then reconcile
//! with the server: invalidate on success, rollback plus invalidate on
//! failure. Create is the exception; the server assigns the id, so nothing
//! is inserted speculatively and a failed create leaves the cache exactly
//! as it was, with no refetch. Payloads are validated here, before the
//! cache is touched or a request is built.

use tracing::debug;

use crate::api::TodosApi;
use crate::cache::TodoCache;
use crate::error::Error;
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Creates a todo remotely, then refreshes the cached list.
#[derive(Clone)]
pub struct CreateTodoMutation {
    api: TodosApi,
    cache: TodoCache,
}

impl CreateTodoMutation {
    pub fn new(api: TodosApi, cache: TodoCache) -> Self {
        Self { api, cache }
    }

    /// Create `input` on the server.
    ///
    /// The cached list is untouched until the invalidation refetch lands.
    /// On failure the cache stays untouched entirely and no refetch is
    /// scheduled.
    pub async fn mutate(&self, input: CreateTodo) -> Result<Todo, Error> {
        input.validate()?;
        let created = self.api.create(&input).await?;
        debug!(id = created.id, "created todo");
        self.cache.invalidate();
        Ok(created)
    }
}

/// Applies a partial update optimistically, then reconciles with the
/// server.
#[derive(Clone)]
pub struct UpdateTodoMutation {
    api: TodosApi,
    cache: TodoCache,
}

impl UpdateTodoMutation {
    pub fn new(api: TodosApi, cache: TodoCache) -> Self {
        Self { api, cache }
    }

    /// Merge `patch` into the cached item with this `id` immediately, then
    /// issue the remote update.
    ///
    /// On success the cache is invalidated so the server's authoritative
    /// list replaces the patched one. On failure the snapshot captured
    /// before the patch is restored verbatim and the cache is invalidated
    /// anyway; the corrective refetch heals any transient inconsistency
    /// the blind restore introduced.
    pub async fn mutate(&self, id: i64, patch: UpdateTodo) -> Result<Todo, Error> {
        patch.validate()?;

        let prior = self.cache.apply_optimistic(|todos| {
            if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
                patch.apply_to(todo);
            }
        });

        match self.api.update(id, &patch).await {
            Ok(updated) => {
                debug!(id, "updated todo");
                self.cache.invalidate();
                Ok(updated)
            }
            Err(e) => {
                self.cache.rollback(prior);
                self.cache.invalidate();
                Err(e)
            }
        }
    }
}

/// Removes a todo optimistically, then reconciles with the server.
#[derive(Clone)]
pub struct DeleteTodoMutation {
    api: TodosApi,
    cache: TodoCache,
}

impl DeleteTodoMutation {
    pub fn new(api: TodosApi, cache: TodoCache) -> Self {
        Self { api, cache }
    }

    /// Remove the cached item with this `id` immediately, then issue the
    /// remote delete. Success and failure reconcile exactly like
    /// [`UpdateTodoMutation::mutate`].
    pub async fn mutate(&self, id: i64) -> Result<(), Error> {
        let prior = self
            .cache
            .apply_optimistic(|todos| todos.retain(|todo| todo.id != id));

        match self.api.delete(id).await {
            Ok(()) => {
                debug!(id, "deleted todo");
                self.cache.invalidate();
                Ok(())
            }
            Err(e) => {
                self.cache.rollback(prior);
                self.cache.invalidate();
                Err(e)
            }
        }
    }
}

//! Client-side synchronization library for a remote todo list.
//!
//! # Overview
//! Typed CRUD operations against the todo REST API, a token-based session
//! store persisted in local key-value storage, and a client-side cache
//! holding the single authoritative snapshot of the list. Mutations apply
//! optimistically: the snapshot is patched before the remote call, rolled
//! back verbatim if the call fails, and reconciled afterwards by an
//! invalidation-triggered refetch from the server.
//!
//! # Design
//! - `TodoClient` builds requests and parses responses without touching
//!   the network; an `HttpTransport` executes the round-trip in between.
//! - The session store is passed to `TodosApi` explicitly and read once
//!   per request, never through an ambient lookup.
//! - `TodoCache` publishes its snapshot through a watch channel. The
//!   presentation layer observes that channel, never the network.
//! - One coordinator per mutation type wraps the remote call with the
//!   cancel, snapshot, patch, reconcile sequence.

pub mod api;
pub mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod mutation;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;

pub use api::{TodosApi, TodosApiBuilder};
pub use cache::{FetchStatus, ListState, TodoCache};
pub use client::TodoClient;
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mutation::{CreateTodoMutation, DeleteTodoMutation, UpdateTodoMutation};
pub use session::{SessionState, SessionStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{CreateTodo, Todo, TodoFilter, UpdateTodo, UserProfile};

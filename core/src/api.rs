//! Typed asynchronous client for the remote todo resource.
//!
//! # Design
//! Thin orchestration: `TodoClient` builds a request, the transport
//! executes it, `TodoClient` parses the result. No retries and no caching
//! here; the cache layer sits above. The session store is threaded in
//! explicitly and read once per request, so a login or logout applies to
//! the next call without tearing anything down.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::client::TodoClient;
use crate::error::Error;
use crate::session::SessionStore;
use crate::transport::{HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT};
use crate::types::{CreateTodo, Todo, TodoFilter, UpdateTodo};

/// Asynchronous, cloneable handle to the remote todo API.
///
/// Built with [`TodosApi::builder`]. Clones share the transport and the
/// session store.
#[derive(Clone)]
pub struct TodosApi {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    client: TodoClient,
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
}

impl fmt::Debug for TodosApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodosApi")
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

impl TodosApi {
    pub fn builder() -> TodosApiBuilder {
        TodosApiBuilder::new()
    }

    /// The session store this handle authenticates with.
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Fetch the full todo list.
    pub async fn list(&self) -> Result<Vec<Todo>, Error> {
        let token = self.inner.session.token();
        let request = self.inner.client.build_list_todos(token.as_deref());
        debug!(url = %request.url, "listing todos");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_list_todos(response)
    }

    /// Fetch the list restricted to completed or active items.
    pub async fn list_filtered(&self, filter: TodoFilter) -> Result<Vec<Todo>, Error> {
        let token = self.inner.session.token();
        let request = self
            .inner
            .client
            .build_list_todos_filtered(filter, token.as_deref());
        debug!(url = %request.url, "listing filtered todos");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_list_todos(response)
    }

    /// Fetch a single todo by id.
    pub async fn get(&self, id: i64) -> Result<Todo, Error> {
        let token = self.inner.session.token();
        let request = self.inner.client.build_get_todo(id, token.as_deref());
        debug!(id, "fetching todo");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_get_todo(response)
    }

    /// Create a todo. The server assigns the id and both timestamps.
    pub async fn create(&self, input: &CreateTodo) -> Result<Todo, Error> {
        let token = self.inner.session.token();
        let request = self.inner.client.build_create_todo(input, token.as_deref())?;
        debug!(title = %input.title, "creating todo");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_create_todo(response)
    }

    /// Apply a partial update to the todo with this id.
    pub async fn update(&self, id: i64, input: &UpdateTodo) -> Result<Todo, Error> {
        let token = self.inner.session.token();
        let request = self
            .inner
            .client
            .build_update_todo(id, input, token.as_deref())?;
        debug!(id, "updating todo");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_update_todo(response)
    }

    /// Delete the todo with this id.
    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        let token = self.inner.session.token();
        let request = self.inner.client.build_delete_todo(id, token.as_deref());
        debug!(id, "deleting todo");
        let response = self.inner.transport.execute(request).await?;
        self.inner.client.parse_delete_todo(response)
    }
}

/// Builder for [`TodosApi`].
pub struct TodosApiBuilder {
    api_root: Option<String>,
    session: Option<SessionStore>,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Duration,
}

impl TodosApiBuilder {
    fn new() -> Self {
        Self {
            api_root: None,
            session: None,
            transport: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Root URL the todo paths are appended to. Required.
    pub fn api_root(mut self, url: impl Into<String>) -> Self {
        self.api_root = Some(url.into());
        self
    }

    /// Session store whose token authenticates requests. Required.
    pub fn session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    /// Replace the default reqwest transport. Tests use scripted fakes.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Per-request timeout for the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<TodosApi, Error> {
        let api_root = self
            .api_root
            .ok_or_else(|| Error::Config("api_root is required".to_string()))?;
        let session = self
            .session
            .ok_or_else(|| Error::Config("session store is required".to_string()))?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_timeout(self.timeout)?),
        };
        Ok(TodosApi {
            inner: Arc::new(ApiInner {
                client: TodoClient::new(&api_root),
                transport,
                session,
            }),
        })
    }
}

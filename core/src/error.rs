//! Error types for the todo client.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because callers
//! branch on them: "the item is gone" ends a mutation quietly, while "the
//! token was rejected" should send the user back through login. All other
//! non-2xx responses land in `Http` with the raw status code and body for
//! debugging. `Validation` is raised locally, before any request is built.

use thiserror::Error;

/// Errors surfaced by the client, the session store and the cache.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned 404 for the addressed todo.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the session token with a 401.
    #[error("unauthorized: session token missing or rejected")]
    Unauthorized,

    /// The server returned a non-2xx status not covered by a dedicated
    /// variant.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The payload was rejected locally, before any request was built.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A client handle was assembled incompletely.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The durable key-value storage behind the session failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// True when the addressed todo does not exist on the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// True when the session token was missing or rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

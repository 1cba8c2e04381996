//! Token-based session state with durable persistence.
//!
//! # Design
//! The store mirrors a browser session kept in local storage: an opaque
//! bearer token under `"token"` and a JSON-serialized profile under
//! `"user"`. It starts in `Loading`; `restore` settles it into
//! `Authenticated` or `Anonymous` from the persisted keys. No verification
//! round-trip is made on restore: a present, non-empty token is trusted
//! until a request comes back 401. Clones share state through an `Arc`, so
//! the API client observes a login or logout on its very next request.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::Error;
use crate::storage::KeyValueStorage;
use crate::types::UserProfile;

/// Storage key holding the opaque session token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "user";

/// Authentication state of the session store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The persisted session has not been read yet.
    Loading,
    /// No usable token is held.
    Anonymous,
    /// A token is held and attached to every request.
    Authenticated,
}

enum SessionData {
    Loading,
    Anonymous,
    Authenticated {
        token: String,
        profile: Option<UserProfile>,
    },
}

/// Shared, cloneable session store.
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    storage: Box<dyn KeyValueStorage>,
    data: Mutex<SessionData>,
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state())
            .finish()
    }
}

impl SessionStore {
    /// Create a store over `storage`, in the `Loading` state.
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                storage: Box::new(storage),
                data: Mutex::new(SessionData::Loading),
            }),
        }
    }

    /// Read the persisted session and settle into `Authenticated` or
    /// `Anonymous`.
    ///
    /// A missing or empty token yields `Anonymous`. A token paired with an
    /// unreadable profile clears both persisted keys and yields `Anonymous`;
    /// half a session is worse than none.
    pub fn restore(&self) -> Result<SessionState, Error> {
        let token = match self.inner.storage.get(TOKEN_KEY)? {
            Some(token) if !token.is_empty() => token,
            _ => {
                *self.inner.data.lock() = SessionData::Anonymous;
                debug!("no persisted session token, starting anonymous");
                return Ok(SessionState::Anonymous);
            }
        };

        let profile = match self.inner.storage.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(error = %e, "persisted profile is unreadable, clearing session");
                    self.inner.storage.remove(TOKEN_KEY)?;
                    self.inner.storage.remove(USER_KEY)?;
                    *self.inner.data.lock() = SessionData::Anonymous;
                    return Ok(SessionState::Anonymous);
                }
            },
            None => None,
        };

        debug!("restored authenticated session");
        *self.inner.data.lock() = SessionData::Authenticated { token, profile };
        Ok(SessionState::Authenticated)
    }

    /// Persist `token` and transition to `Authenticated`.
    ///
    /// Any profile persisted by an earlier login is dropped; attach the
    /// current one with [`login_with_profile`](Self::login_with_profile).
    pub fn login(&self, token: &str) -> Result<(), Error> {
        self.login_inner(token, None)
    }

    /// Persist `token` and `profile` and transition to `Authenticated`.
    pub fn login_with_profile(&self, token: &str, profile: UserProfile) -> Result<(), Error> {
        self.login_inner(token, Some(profile))
    }

    fn login_inner(&self, token: &str, profile: Option<UserProfile>) -> Result<(), Error> {
        if token.is_empty() {
            return Err(Error::Validation(
                "session token must not be empty".to_string(),
            ));
        }
        self.inner.storage.set(TOKEN_KEY, token)?;
        match &profile {
            Some(profile) => {
                let raw = serde_json::to_string(profile)
                    .map_err(|e| Error::Serialization(e.to_string()))?;
                self.inner.storage.set(USER_KEY, &raw)?;
            }
            None => self.inner.storage.remove(USER_KEY)?,
        }
        *self.inner.data.lock() = SessionData::Authenticated {
            token: token.to_string(),
            profile,
        };
        debug!("session authenticated");
        Ok(())
    }

    /// Drop the session unconditionally: in-memory state first, then the
    /// persisted keys. Requires no server round-trip.
    pub fn logout(&self) -> Result<(), Error> {
        *self.inner.data.lock() = SessionData::Anonymous;
        debug!("session logged out");
        self.inner.storage.remove(TOKEN_KEY)?;
        self.inner.storage.remove(USER_KEY)
    }

    pub fn state(&self) -> SessionState {
        match &*self.inner.data.lock() {
            SessionData::Loading => SessionState::Loading,
            SessionData::Anonymous => SessionState::Anonymous,
            SessionData::Authenticated { .. } => SessionState::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Current token, if authenticated.
    pub fn token(&self) -> Option<String> {
        match &*self.inner.data.lock() {
            SessionData::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    /// Current profile, if one was restored or attached at login.
    pub fn profile(&self) -> Option<UserProfile> {
        match &*self.inner.data.lock() {
            SessionData::Authenticated { profile, .. } => profile.clone(),
            _ => None,
        }
    }
}

//! Explicit session context
//!
//! The signed-in actor and their bearer token live in one shared
//! [`SessionContext`]. The HTTP client reads the token from it, the grid reads
//! the profile from it, and a 401 anywhere invalidates it. Subscribers learn
//! about sign-in, sign-out and invalidation through a watch channel.

mod storage;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use schooldesk_model::{AccountId, Profile};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use zeroize::Zeroizing;

pub use storage::SessionStore;

use crate::error::SessionError;

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Zeroizing<String>,
    pub profile: Profile,
    pub stored_at: DateTime<Utc>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, profile: Profile) -> Self {
        Self {
            access_token: Zeroizing::new(access_token.into()),
            profile,
            stored_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("profile", &self.profile)
            .field("stored_at", &self.stored_at)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// The backend rejected the token.
    Unauthorized,
    /// The persisted blob could not be used.
    Corrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedOut,
    SignedIn { account_id: AccountId },
    Invalidated(InvalidationReason),
}

/// Shared handle to the current session. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    events: Arc<watch::Sender<SessionEvent>>,
    store: Option<Arc<SessionStore>>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("signed_in", &self.is_signed_in())
            .field("store", &self.store.as_ref().map(|s| s.path().to_path_buf()))
            .finish()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// In-memory context, nothing persisted.
    pub fn new() -> Self {
        let (events, _) = watch::channel(SessionEvent::SignedOut);
        Self {
            current: Arc::new(RwLock::new(None)),
            events: Arc::new(events),
            store: None,
        }
    }

    /// Context backed by `store`, seeded from whatever it holds.
    pub fn with_store(store: SessionStore) -> Result<Self, SessionError> {
        let loaded = store.load()?;
        let mut context = Self::new();
        if let Some(session) = loaded {
            let account_id = session.profile.account_id;
            *context.current.write() = Some(session);
            context
                .events
                .send_replace(SessionEvent::SignedIn { account_id });
        }
        context.store = Some(Arc::new(store));
        Ok(context)
    }

    pub fn sign_in(&self, session: Session) -> Result<(), SessionError> {
        session.profile.validate()?;
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        let account_id = session.profile.account_id;
        *self.current.write() = Some(session);
        self.events.send_replace(SessionEvent::SignedIn { account_id });
        log::info!("[Session] Signed in account {}", account_id);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.current.write().take();
        if let Some(store) = &self.store {
            store.clear()?;
        }
        self.events.send_replace(SessionEvent::SignedOut);
        Ok(())
    }

    /// Drop the session and its blob. Storage errors are logged, not
    /// returned, because callers are already on an error path.
    pub fn invalidate(&self, reason: InvalidationReason) {
        let had_session = self.current.write().take().is_some();
        if let Some(store) = &self.store
            && let Err(err) = store.clear()
        {
            log::warn!("[Session] Failed to remove session blob: {}", err);
        }
        if had_session {
            log::warn!("[Session] Session invalidated: {:?}", reason);
        }
        self.events.send_replace(SessionEvent::Invalidated(reason));
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn access_token(&self) -> Option<Zeroizing<String>> {
        self.current
            .read()
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub fn profile(&self) -> Option<Profile> {
        self.current
            .read()
            .as_ref()
            .map(|session| session.profile.clone())
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

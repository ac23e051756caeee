use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::role::Role;
use super::storage::{MemoryStorage, SessionStorage, StorageError, StoredSession};
use crate::tprintln;

/// Token plus role for whoever is signed in. Both are present or neither is: an
/// absent (or empty) token means `Role::None`, and a token without a signed-in role
/// is dropped. The constructor enforces it so no other shape can exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    role: Role,
}

impl Session {
    pub fn new(token: Option<String>, role: Role) -> Self {
        match token {
            Some(t) if !t.is_empty() && role.is_signed_in() => Self { token: Some(t), role },
            _ => Self::anonymous(),
        }
    }

    pub fn anonymous() -> Self { Self { token: None, role: Role::None } }

    pub fn token(&self) -> Option<&str> { self.token.as_deref() }

    pub fn role(&self) -> Role { self.role }

    pub fn is_authenticated(&self) -> bool { self.token.is_some() }

    fn to_record(&self) -> StoredSession {
        StoredSession { token: self.token.clone(), role: self.role }
    }
}

impl From<StoredSession> for Session {
    fn from(rec: StoredSession) -> Self { Session::new(rec.token, rec.role) }
}

/// The single mutable holder of the current session.
///
/// Clones share state: the remote client and the presentation layer hold the same
/// store, so a logout forced by the backend is seen by the next `current()` call.
/// Every write replaces the whole `Session` under one lock and persists it before
/// the lock is released, which keeps memory and storage in the same order.
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Restore whatever the storage holds. Unreadable records are treated as logged out.
    pub fn open<S: SessionStorage + 'static>(storage: S) -> Self {
        let restored = match storage.load() {
            Ok(Some(rec)) => Session::from(rec),
            Ok(None) => Session::anonymous(),
            Err(e) => {
                warn!(target: "curo", "session restore failed, starting logged out: {}", e);
                Session::anonymous()
            }
        };
        tprintln!("session.open authenticated={} role={}", restored.is_authenticated(), restored.role());
        Self { current: Arc::new(RwLock::new(restored)), storage: Arc::new(storage) }
    }

    pub fn in_memory() -> Self { Self::open(MemoryStorage::new()) }

    /// A token paired with `Role::None` never becomes a session; the store ends up
    /// logged out instead.
    pub fn login(&self, token: impl Into<String>, role: Role) {
        let next = Session::new(Some(token.into()), role);
        let mut slot = self.current.write();
        let persisted = if next.is_authenticated() {
            self.storage.save(&next.to_record())
        } else {
            warn!(target: "curo", "session.login rejected: no usable role");
            self.storage.clear()
        };
        if let Err(e) = persisted {
            warn!(target: "curo", "session persist failed on login: {}", e);
        }
        *slot = next;
        if slot.is_authenticated() {
            info!(target: "curo", "session.login role={}", slot.role());
        }
    }

    /// Idempotent: a second call leaves the same anonymous session behind.
    pub fn logout(&self) {
        let mut slot = self.current.write();
        if let Err(e) = self.storage.clear() {
            warn!(target: "curo", "session persist failed on logout: {}", e);
        }
        if slot.is_authenticated() {
            info!(target: "curo", "session.logout role={}", slot.role());
        }
        *slot = Session::anonymous();
    }

    pub fn current(&self) -> Session { self.current.read().clone() }

    /// Re-read the persisted record, for callers that want to know whether storage
    /// still agrees with memory.
    pub fn persisted(&self) -> Result<Session, StorageError> {
        Ok(self.storage.load()?.map(Session::from).unwrap_or_default())
    }
}

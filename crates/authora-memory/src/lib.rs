//! In-memory persistence for Authora.
//!
//! [`MemoryAdapter`] keeps users and sessions in two `HashMap`s behind a
//! `tokio::sync::RwLock`. It is meant for tests, demos and single-process
//! tools. Everything is lost when the process exits.
//!
//! ```rust
//! use authora::{AuthConfig, DatabaseUser, SessionManager};
//! use authora_memory::MemoryAdapter;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let adapter: MemoryAdapter<u64> = MemoryAdapter::new();
//! adapter.insert_user(DatabaseUser { id: 1, attributes: () }).await;
//!
//! let auth = SessionManager::new(adapter, AuthConfig::default());
//! let session = auth.create_session(1, (), None).await.unwrap();
//!
//! let (session, user) = auth.validate_session(&session.id).await.unwrap().unwrap();
//! assert_eq!(user.id, 1);
//! assert!(!session.fresh);
//! # }
//! ```

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use authora::{Adapter, Clock, DatabaseSession, DatabaseUser, SystemClock};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

struct Store<Id, SA, UA> {
    users: HashMap<Id, DatabaseUser<Id, UA>>,
    sessions: HashMap<String, DatabaseSession<Id, SA>>,
}

/// A thread-safe, in-process [`Adapter`].
///
/// `Id` is the user id type; `SA` / `UA` are the persisted session and
/// user attribute types.
pub struct MemoryAdapter<Id, SA = (), UA = ()> {
    store: RwLock<Store<Id, SA, UA>>,
    clock: Arc<dyn Clock>,
}

impl<Id, SA, UA> MemoryAdapter<Id, SA, UA>
where
    Id: Clone + Eq + Hash,
    SA: Clone,
    UA: Clone,
{
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Uses `clock` to decide what counts as expired in
    /// [`Adapter::delete_expired_sessions`].
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(Store {
                users: HashMap::new(),
                sessions: HashMap::new(),
            }),
            clock,
        }
    }

    /// Adds or replaces a user.
    pub async fn insert_user(&self, user: DatabaseUser<Id, UA>) {
        self.store.write().await.users.insert(user.id.clone(), user);
    }

    /// Removes a user without touching their sessions, leaving them orphaned.
    pub async fn remove_user(&self, user_id: &Id) -> Option<DatabaseUser<Id, UA>> {
        self.store.write().await.users.remove(user_id)
    }

    /// Stores a session record as-is, bypassing the manager.
    pub async fn insert_session(&self, session: DatabaseSession<Id, SA>) {
        self.store
            .write()
            .await
            .sessions
            .insert(session.id.clone(), session);
    }

    pub async fn session(&self, session_id: &str) -> Option<DatabaseSession<Id, SA>> {
        self.store.read().await.sessions.get(session_id).cloned()
    }

    pub async fn session_count(&self) -> usize {
        self.store.read().await.sessions.len()
    }
}

impl<Id, SA, UA> Default for MemoryAdapter<Id, SA, UA>
where
    Id: Clone + Eq + Hash,
    SA: Clone,
    UA: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id, SA, UA> Adapter for MemoryAdapter<Id, SA, UA>
where
    Id: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static,
    SA: Clone + Send + Sync + 'static,
    UA: Clone + Send + Sync + 'static,
{
    type UserId = Id;
    type SessionAttributes = SA;
    type UserAttributes = UA;
    type Error = Infallible;

    async fn get_session_and_user(
        &self,
        session_id: &str,
    ) -> Result<(Option<DatabaseSession<Id, SA>>, Option<DatabaseUser<Id, UA>>), Infallible> {
        let store = self.store.read().await;
        let Some(session) = store.sessions.get(session_id).cloned() else {
            return Ok((None, None));
        };
        let user = store.users.get(&session.user_id).cloned();
        Ok((Some(session), user))
    }

    async fn get_user_sessions(
        &self,
        user_id: &Id,
    ) -> Result<Vec<DatabaseSession<Id, SA>>, Infallible> {
        let store = self.store.read().await;
        Ok(store
            .sessions
            .values()
            .filter(|session| &session.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn set_session(&self, session: DatabaseSession<Id, SA>) -> Result<(), Infallible> {
        self.insert_session(session).await;
        Ok(())
    }

    async fn update_session_expiration(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Infallible> {
        if let Some(session) = self.store.write().await.sessions.get_mut(session_id) {
            session.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), Infallible> {
        self.store.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: &Id) -> Result<(), Infallible> {
        self.store
            .write()
            .await
            .sessions
            .retain(|_, session| &session.user_id != user_id);
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> Result<(), Infallible> {
        let now = self.clock.now();
        let mut store = self.store.write().await;
        let before = store.sessions.len();
        store.sessions.retain(|_, session| session.expires_at > now);
        debug!(removed = before - store.sessions.len(), "expired sessions swept");
        Ok(())
    }
}

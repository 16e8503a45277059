//! Shared fixtures for the integration tests.
//!
//! - [`CountingAdapter`] wraps a `MemoryAdapter` and counts every write,
//!   so tests can assert "zero writes" / "exactly one update".
//! - [`FailingAdapter`] fails every call, for error propagation tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use authora::{
    Adapter, AuthConfig, DatabaseSession, DatabaseUser, ManualClock, SessionManager,
};
use authora_memory::MemoryAdapter;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub type UserId = String;

/// Persisted session attributes used throughout the tests.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub ip_address: String,
}

/// Persisted user attributes used throughout the tests.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn ttl() -> Duration {
    Duration::hours(1)
}

pub fn config() -> AuthConfig {
    AuthConfig {
        session_expires_in: ttl(),
        ..AuthConfig::default()
    }
}

pub fn record(ip: &str) -> SessionRecord {
    SessionRecord {
        ip_address: ip.to_owned(),
    }
}

// =========================================================================
// CountingAdapter
// =========================================================================

#[derive(Default)]
pub struct WriteCounts {
    pub set_session: AtomicUsize,
    pub update_session_expiration: AtomicUsize,
    pub delete_session: AtomicUsize,
    pub delete_user_sessions: AtomicUsize,
    pub delete_expired_sessions: AtomicUsize,
}

impl WriteCounts {
    pub fn total(&self) -> usize {
        self.set_session.load(Ordering::SeqCst)
            + self.update_session_expiration.load(Ordering::SeqCst)
            + self.delete_session.load(Ordering::SeqCst)
            + self.delete_user_sessions.load(Ordering::SeqCst)
            + self.delete_expired_sessions.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.update_session_expiration.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.delete_session.load(Ordering::SeqCst)
    }
}

/// A `MemoryAdapter` that counts every write it forwards.
///
/// Both halves are behind `Arc`s so the test keeps a handle after moving
/// the adapter into the manager.
pub struct CountingAdapter {
    pub inner: Arc<MemoryAdapter<UserId, SessionRecord, UserRecord>>,
    pub counts: Arc<WriteCounts>,
}

impl Adapter for CountingAdapter {
    type UserId = UserId;
    type SessionAttributes = SessionRecord;
    type UserAttributes = UserRecord;
    type Error = std::convert::Infallible;

    async fn get_session_and_user(
        &self,
        session_id: &str,
    ) -> Result<
        (
            Option<DatabaseSession<UserId, SessionRecord>>,
            Option<DatabaseUser<UserId, UserRecord>>,
        ),
        Self::Error,
    > {
        self.inner.get_session_and_user(session_id).await
    }

    async fn get_user_sessions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<DatabaseSession<UserId, SessionRecord>>, Self::Error> {
        self.inner.get_user_sessions(user_id).await
    }

    async fn set_session(
        &self,
        session: DatabaseSession<UserId, SessionRecord>,
    ) -> Result<(), Self::Error> {
        self.counts.set_session.fetch_add(1, Ordering::SeqCst);
        self.inner.set_session(session).await
    }

    async fn update_session_expiration(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        self.counts
            .update_session_expiration
            .fetch_add(1, Ordering::SeqCst);
        self.inner
            .update_session_expiration(session_id, expires_at)
            .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), Self::Error> {
        self.counts.delete_session.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_session(session_id).await
    }

    async fn delete_user_sessions(&self, user_id: &UserId) -> Result<(), Self::Error> {
        self.counts
            .delete_user_sessions
            .fetch_add(1, Ordering::SeqCst);
        self.inner.delete_user_sessions(user_id).await
    }

    async fn delete_expired_sessions(&self) -> Result<(), Self::Error> {
        self.counts
            .delete_expired_sessions
            .fetch_add(1, Ordering::SeqCst);
        self.inner.delete_expired_sessions().await
    }
}

/// Everything a lifecycle test needs to drive and observe the manager.
pub struct Harness {
    pub auth: SessionManager<CountingAdapter>,
    pub store: Arc<MemoryAdapter<UserId, SessionRecord, UserRecord>>,
    pub counts: Arc<WriteCounts>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    /// Manager with a one-hour TTL, clock pinned at [`t0`], and one user
    /// `"alice"` already stored.
    pub async fn new() -> Self {
        let clock = Arc::new(ManualClock::new(t0()));
        let store = Arc::new(MemoryAdapter::with_clock(clock.clone()));
        store
            .insert_user(DatabaseUser {
                id: "alice".to_owned(),
                attributes: UserRecord {
                    username: "alice".to_owned(),
                    password_hash: "not-a-real-hash".to_owned(),
                },
            })
            .await;
        let counts = Arc::new(WriteCounts::default());

        let adapter = CountingAdapter {
            inner: store.clone(),
            counts: counts.clone(),
        };
        let auth = SessionManager::new(adapter, config()).with_clock(clock.clone());

        Self {
            auth,
            store,
            counts,
            clock,
        }
    }
}

// =========================================================================
// FailingAdapter
// =========================================================================

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub struct StoreUnavailable;

/// An adapter whose every call fails.
pub struct FailingAdapter;

impl Adapter for FailingAdapter {
    type UserId = UserId;
    type SessionAttributes = ();
    type UserAttributes = ();
    type Error = StoreUnavailable;

    async fn get_session_and_user(
        &self,
        _session_id: &str,
    ) -> Result<(Option<DatabaseSession<UserId, ()>>, Option<DatabaseUser<UserId, ()>>), StoreUnavailable>
    {
        Err(StoreUnavailable)
    }

    async fn get_user_sessions(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<DatabaseSession<UserId, ()>>, StoreUnavailable> {
        Err(StoreUnavailable)
    }

    async fn set_session(&self, _session: DatabaseSession<UserId, ()>) -> Result<(), StoreUnavailable> {
        Err(StoreUnavailable)
    }

    async fn update_session_expiration(
        &self,
        _session_id: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), StoreUnavailable> {
        Err(StoreUnavailable)
    }

    async fn delete_session(&self, _session_id: &str) -> Result<(), StoreUnavailable> {
        Err(StoreUnavailable)
    }

    async fn delete_user_sessions(&self, _user_id: &UserId) -> Result<(), StoreUnavailable> {
        Err(StoreUnavailable)
    }

    async fn delete_expired_sessions(&self) -> Result<(), StoreUnavailable> {
        Err(StoreUnavailable)
    }
}

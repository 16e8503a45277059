//! The persistence contract.
//!
//! Authora doesn't store anything itself. Sessions and users live in
//! whatever backend the host already has (SQL, Redis, a `HashMap` in
//! tests), reached through the [`Adapter`] trait.
//!
//! Each method is assumed to be atomic on its own. Nothing here needs a
//! transaction spanning two calls. Two concurrent renewals of the same
//! session may both call [`Adapter::update_session_expiration`]; both
//! write roughly `now + TTL`, so whichever lands last is fine.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{DatabaseSession, DatabaseUser};

/// A persisted session as seen through adapter `A`.
pub type AdapterSession<A> =
    DatabaseSession<<A as Adapter>::UserId, <A as Adapter>::SessionAttributes>;

/// A persisted user as seen through adapter `A`.
pub type AdapterUser<A> = DatabaseUser<<A as Adapter>::UserId, <A as Adapter>::UserAttributes>;

/// Storage backend for sessions and users.
///
/// The associated types pin down the id and attribute shapes of one
/// deployment, so a `SessionManager` over this adapter is fully typed at
/// the call site.
///
/// Errors are returned as [`Adapter::Error`] and reach the caller
/// unchanged inside [`AuthError::Adapter`](crate::AuthError::Adapter).
/// The core never retries.
pub trait Adapter: Send + Sync + 'static {
    type UserId: Clone + fmt::Debug + Send + Sync + 'static;
    type SessionAttributes: Send + Sync + 'static;
    type UserAttributes: Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches a session and its user in one logical lookup.
    ///
    /// Returns `(None, None)` when the session doesn't exist and
    /// `(Some(_), None)` when it exists but its user is gone.
    fn get_session_and_user(
        &self,
        session_id: &str,
    ) -> impl Future<
        Output = Result<(Option<AdapterSession<Self>>, Option<AdapterUser<Self>>), Self::Error>,
    > + Send;

    /// Every stored session of a user, expired ones included.
    fn get_user_sessions(
        &self,
        user_id: &Self::UserId,
    ) -> impl Future<Output = Result<Vec<AdapterSession<Self>>, Self::Error>> + Send;

    /// Stores a new session.
    fn set_session(
        &self,
        session: AdapterSession<Self>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn update_session_expiration(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Deletes one session. Deleting a missing session is not an error.
    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn delete_user_sessions(
        &self,
        user_id: &Self::UserId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Deletes every session whose expiry has passed, by the adapter's
    /// own notion of "now".
    fn delete_expired_sessions(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Lets the host keep a handle on its store after handing it to the manager.
impl<T: Adapter> Adapter for Arc<T> {
    type UserId = T::UserId;
    type SessionAttributes = T::SessionAttributes;
    type UserAttributes = T::UserAttributes;
    type Error = T::Error;

    fn get_session_and_user(
        &self,
        session_id: &str,
    ) -> impl Future<
        Output = Result<(Option<AdapterSession<Self>>, Option<AdapterUser<Self>>), Self::Error>,
    > + Send {
        (**self).get_session_and_user(session_id)
    }

    fn get_user_sessions(
        &self,
        user_id: &Self::UserId,
    ) -> impl Future<Output = Result<Vec<AdapterSession<Self>>, Self::Error>> + Send {
        (**self).get_user_sessions(user_id)
    }

    fn set_session(
        &self,
        session: AdapterSession<Self>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).set_session(session)
    }

    fn update_session_expiration(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).update_session_expiration(session_id, expires_at)
    }

    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).delete_session(session_id)
    }

    fn delete_user_sessions(
        &self,
        user_id: &Self::UserId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).delete_user_sessions(user_id)
    }

    fn delete_expired_sessions(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).delete_expired_sessions()
    }
}

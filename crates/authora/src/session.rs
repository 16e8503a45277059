//! Session and user records: what the adapter stores and what callers get.
//!
//! There are two views of each record:
//!
//! - **Persisted** ([`DatabaseSession`], [`DatabaseUser`]): owned by the
//!   [`Adapter`](crate::Adapter). The core reads the required fields and
//!   treats `attributes` as opaque.
//! - **Runtime** ([`Session`], [`User`]): handed to callers. Their
//!   `attributes` are whatever the manager's mapping function produced
//!   from the persisted attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Persisted records
// ---------------------------------------------------------------------------

/// A session as the adapter stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSession<Id, A> {
    pub id: String,
    pub user_id: Id,
    pub expires_at: DateTime<Utc>,
    pub attributes: A,
}

/// A user as the adapter stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseUser<Id, A> {
    pub id: Id,
    pub attributes: A,
}

// ---------------------------------------------------------------------------
// Runtime records
// ---------------------------------------------------------------------------

/// A live session returned to callers.
///
/// `fresh` is never persisted. It is `true` only on the call that created
/// or renewed the session, which is the caller's cue to send a new cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session<Id, A = ()> {
    pub id: String,
    pub user_id: Id,
    pub expires_at: DateTime<Utc>,
    pub fresh: bool,
    pub attributes: A,
}

/// The user a validated session belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User<Id, A = ()> {
    pub id: Id,
    pub attributes: A,
}

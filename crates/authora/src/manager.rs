//! The session manager: creates, validates, renews and destroys sessions.
//!
//! This is the centre of the crate. It's responsible for:
//! - Creating sessions for a user (generated or caller-chosen ids)
//! - Validating a session id on every request, with sliding renewal
//! - Self-healing: deleting expired and orphaned sessions it stumbles on
//! - Invalidating one session, all of a user's sessions, or all expired ones
//! - Building and reading the session cookie, reading bearer headers
//! - Issuing and verifying bearer tokens through its [`TokenIssuer`]
//!
//! # Sliding expiration
//!
//! A session lives for one TTL after its last renewal. Validation only
//! writes back when the session has used up half of its window:
//!
//! ```text
//!   created/renewed          half-life               expires_at
//!        │─────────── pass-through ───│──── renew ─────│── expired
//!        t                       t + TTL/2           t + TTL
//! ```
//!
//! - **pass-through**: returned with `fresh = false`, no write
//! - **renew**: `expires_at = now + TTL`, one write, `fresh = true`
//! - **expired**: deleted, nothing returned
//!
//! A busy session is therefore written about once per half-TTL rather
//! than on every request, and an idle one dies exactly one TTL after its
//! last renewal.
//!
//! # Concurrency
//!
//! The manager holds only immutable configuration. Share it behind an
//! `Arc` and call it from as many tasks as you like; all mutable state
//! lives in the [`Adapter`].

use std::sync::Arc;

use authora_cookie::{Cookie, CookieController};
use authora_token::{CreatedToken, SignOptions, TokenIssuer, VerifiedToken};
use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info};

use crate::adapter::AdapterSession;
use crate::{
    Adapter, AuthConfig, AuthError, Clock, DatabaseSession, Session, SystemClock, User,
    credentials, id,
};

type AttributeMapper<From, To> = Box<dyn Fn(&From) -> To + Send + Sync>;

/// A session together with the user it belongs to.
pub type SessionAndUser<A, S, U> = (
    Session<<A as Adapter>::UserId, S>,
    User<<A as Adapter>::UserId, U>,
);

/// Session lifecycle and credential handling over an [`Adapter`].
///
/// `S` and `U` are the caller-facing attribute types produced by the
/// mapping functions installed with
/// [`with_session_attributes`](Self::with_session_attributes) and
/// [`with_user_attributes`](Self::with_user_attributes). Both default to
/// `()`.
pub struct SessionManager<A: Adapter, S = (), U = ()> {
    /// `None` means every persistence call fails with
    /// [`AuthError::NoAdapter`].
    adapter: Option<A>,
    session_expires_in: Duration,
    session_id_entropy: usize,
    cookies: CookieController,
    tokens: TokenIssuer,
    session_attributes: AttributeMapper<A::SessionAttributes, S>,
    user_attributes: AttributeMapper<A::UserAttributes, U>,
    clock: Arc<dyn Clock>,
}

impl<A: Adapter> SessionManager<A> {
    /// Builds a manager over `adapter`.
    pub fn new(adapter: A, config: AuthConfig) -> Self {
        Self::build(Some(adapter), config)
    }

    /// Builds a manager with no adapter. It can still handle cookies and
    /// tokens, but every session operation fails with
    /// [`AuthError::NoAdapter`].
    pub fn without_adapter(config: AuthConfig) -> Self {
        Self::build(None, config)
    }

    fn build(adapter: Option<A>, config: AuthConfig) -> Self {
        let cookie_lifetime = config.session_cookie.lifetime(config.session_expires_in);
        let cookies = CookieController::new(
            config.session_cookie.name.clone(),
            config.session_cookie.attributes.resolve(),
            Some(cookie_lifetime),
        );

        Self {
            adapter,
            session_expires_in: config.session_expires_in,
            session_id_entropy: config.session_id_entropy,
            cookies,
            tokens: TokenIssuer::new(config.jwt),
            session_attributes: Box::new(|_| ()),
            user_attributes: Box::new(|_| ()),
            clock: Arc::new(SystemClock),
        }
    }
}

impl<A: Adapter, S, U> SessionManager<A, S, U> {
    // =====================================================================
    // Construction
    // =====================================================================

    /// Installs the function that turns persisted session attributes into
    /// the `attributes` of every returned [`Session`].
    pub fn with_session_attributes<S2, F>(self, map: F) -> SessionManager<A, S2, U>
    where
        F: Fn(&A::SessionAttributes) -> S2 + Send + Sync + 'static,
    {
        SessionManager {
            adapter: self.adapter,
            session_expires_in: self.session_expires_in,
            session_id_entropy: self.session_id_entropy,
            cookies: self.cookies,
            tokens: self.tokens,
            session_attributes: Box::new(map),
            user_attributes: self.user_attributes,
            clock: self.clock,
        }
    }

    /// Installs the function that turns persisted user attributes into
    /// the `attributes` of every returned [`User`].
    pub fn with_user_attributes<U2, F>(self, map: F) -> SessionManager<A, S, U2>
    where
        F: Fn(&A::UserAttributes) -> U2 + Send + Sync + 'static,
    {
        SessionManager {
            adapter: self.adapter,
            session_expires_in: self.session_expires_in,
            session_id_entropy: self.session_id_entropy,
            cookies: self.cookies,
            tokens: self.tokens,
            session_attributes: self.session_attributes,
            user_attributes: Box::new(map),
            clock: self.clock,
        }
    }

    /// Replaces the system clock, mostly for tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref()
    }

    pub fn session_expires_in(&self) -> Duration {
        self.session_expires_in
    }

    pub fn session_cookie_name(&self) -> &str {
        self.cookies.cookie_name()
    }

    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.tokens
    }

    fn require_adapter(&self) -> Result<&A, AuthError<A::Error>> {
        self.adapter.as_ref().ok_or(AuthError::NoAdapter)
    }

    // =====================================================================
    // Session lifecycle
    // =====================================================================

    /// Creates and stores a new session for `user_id`.
    ///
    /// The id is `session_id` if given, otherwise a fresh random id. The
    /// returned session is always `fresh`.
    ///
    /// # Errors
    /// - [`AuthError::NoAdapter`] if no adapter is configured
    /// - [`AuthError::Adapter`] if the write fails
    pub async fn create_session(
        &self,
        user_id: A::UserId,
        attributes: A::SessionAttributes,
        session_id: Option<String>,
    ) -> Result<Session<A::UserId, S>, AuthError<A::Error>> {
        let adapter = self.require_adapter()?;

        let id = session_id
            .unwrap_or_else(|| id::generate_id_from_entropy_size(self.session_id_entropy));
        let expires_at = self.clock.now() + self.session_expires_in;
        let mapped = (self.session_attributes)(&attributes);

        adapter
            .set_session(DatabaseSession {
                id: id.clone(),
                user_id: user_id.clone(),
                expires_at,
                attributes,
            })
            .await
            .map_err(AuthError::Adapter)?;

        info!(user_id = ?user_id, %expires_at, "session created");

        Ok(Session {
            id,
            user_id,
            expires_at,
            fresh: true,
            attributes: mapped,
        })
    }

    /// Validates a session id, renewing the session if it is past its
    /// half-life.
    ///
    /// Returns `Ok(None)` if the session doesn't exist, has expired, or
    /// belongs to a user that no longer exists. The last two cases delete
    /// the session.
    ///
    /// # Errors
    /// - [`AuthError::NoAdapter`] if no adapter is configured
    /// - [`AuthError::Adapter`] if a lookup or write fails
    pub async fn validate_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionAndUser<A, S, U>>, AuthError<A::Error>> {
        let adapter = self.require_adapter()?;
        let now = self.clock.now();

        let (db_session, db_user) = adapter
            .get_session_and_user(session_id)
            .await
            .map_err(AuthError::Adapter)?;

        let Some(db_session) = db_session else {
            debug!("session not found");
            return Ok(None);
        };

        let Some(db_user) = db_user else {
            debug!(user_id = ?db_session.user_id, "session has no user, deleting");
            adapter
                .delete_session(&db_session.id)
                .await
                .map_err(AuthError::Adapter)?;
            return Ok(None);
        };

        if db_session.expires_at <= now {
            debug!(user_id = ?db_session.user_id, "session expired, deleting");
            adapter
                .delete_session(&db_session.id)
                .await
                .map_err(AuthError::Adapter)?;
            return Ok(None);
        }

        let mut session = self.to_session(db_session);
        let half_life = session.expires_at - self.session_expires_in / 2;
        if now >= half_life {
            session.fresh = true;
            session.expires_at = now + self.session_expires_in;
            adapter
                .update_session_expiration(&session.id, session.expires_at)
                .await
                .map_err(AuthError::Adapter)?;
            debug!(
                user_id = ?session.user_id,
                expires_at = %session.expires_at,
                "session renewed"
            );
        }

        let user = User {
            attributes: (self.user_attributes)(&db_user.attributes),
            id: db_user.id,
        };

        Ok(Some((session, user)))
    }

    /// Lists a user's unexpired sessions.
    ///
    /// Expired records the adapter still holds are left out of the result
    /// but not deleted; that is left to
    /// [`delete_expired_sessions`](Self::delete_expired_sessions) or to
    /// validation of the individual session.
    pub async fn get_user_sessions(
        &self,
        user_id: &A::UserId,
    ) -> Result<Vec<Session<A::UserId, S>>, AuthError<A::Error>> {
        let adapter = self.require_adapter()?;
        let now = self.clock.now();

        let sessions = adapter
            .get_user_sessions(user_id)
            .await
            .map_err(AuthError::Adapter)?;

        Ok(sessions
            .into_iter()
            .filter(|session| session.expires_at > now)
            .map(|session| self.to_session(session))
            .collect())
    }

    /// Deletes one session.
    pub async fn invalidate_session(&self, session_id: &str) -> Result<(), AuthError<A::Error>> {
        let adapter = self.require_adapter()?;
        adapter
            .delete_session(session_id)
            .await
            .map_err(AuthError::Adapter)?;
        debug!("session invalidated");
        Ok(())
    }

    /// Deletes every session of a user ("log out everywhere").
    pub async fn invalidate_user_sessions(
        &self,
        user_id: &A::UserId,
    ) -> Result<(), AuthError<A::Error>> {
        let adapter = self.require_adapter()?;
        adapter
            .delete_user_sessions(user_id)
            .await
            .map_err(AuthError::Adapter)?;
        info!(user_id = ?user_id, "all user sessions invalidated");
        Ok(())
    }

    /// Deletes every expired session in the store.
    pub async fn delete_expired_sessions(&self) -> Result<(), AuthError<A::Error>> {
        let adapter = self.require_adapter()?;
        adapter
            .delete_expired_sessions()
            .await
            .map_err(AuthError::Adapter)?;
        info!("expired sessions deleted");
        Ok(())
    }

    fn to_session(&self, db_session: AdapterSession<A>) -> Session<A::UserId, S> {
        Session {
            attributes: (self.session_attributes)(&db_session.attributes),
            id: db_session.id,
            user_id: db_session.user_id,
            expires_at: db_session.expires_at,
            fresh: false,
        }
    }

    // =====================================================================
    // Credentials
    // =====================================================================

    /// Reads the session id out of a raw `Cookie` header.
    pub fn read_session_cookie(&self, cookie_header: &str) -> Option<String> {
        self.cookies.parse(cookie_header)
    }

    /// Reads the token out of an `Authorization: Bearer <token>` header.
    pub fn read_bearer_token<'h>(&self, authorization_header: &'h str) -> Option<&'h str> {
        credentials::read_bearer_token(authorization_header)
    }

    /// Builds the session cookie for `session_id`, expiring with the
    /// session TTL (or the fixed long lifetime if cookie expiry is off).
    pub fn create_session_cookie(&self, session_id: &str) -> Cookie {
        self.cookies.create_cookie_at(session_id, self.clock.now())
    }

    /// Builds an already-expired session cookie, for logout.
    pub fn create_blank_session_cookie(&self) -> Cookie {
        self.cookies.create_blank_cookie()
    }

    // =====================================================================
    // Tokens
    // =====================================================================

    /// See [`TokenIssuer::create_token`].
    pub fn create_token<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        options: Option<&SignOptions>,
    ) -> CreatedToken {
        self.tokens.create_token(payload, options)
    }

    /// See [`TokenIssuer::verify_token`].
    pub fn verify_token(&self, token: &str, secret: Option<&str>) -> VerifiedToken {
        self.tokens.verify_token(token, secret)
    }
}

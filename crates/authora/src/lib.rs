//! Session-based authentication core.
//!
//! This crate handles the lifecycle of opaque server-side sessions:
//!
//! 1. **Creation**: a random id bound to a user, stored through an [`Adapter`]
//! 2. **Validation**: looked up on every request, renewed once past its half-life
//! 3. **Invalidation**: one session, all of a user's, or all expired ones
//!
//! plus the credential plumbing around it: the session cookie (via
//! [`authora_cookie`]), `Authorization: Bearer` headers, and signed bearer
//! tokens (via [`authora_token`]).
//!
//! It doesn't serve HTTP and doesn't store anything itself. The host
//! server reads headers, calls the [`SessionManager`], and acts on what
//! comes back.
//!
//! # How it fits in the stack
//!
//! ```text
//! Host server (above)  ← reads Cookie / Authorization, writes Set-Cookie
//!     ↕
//! Session Layer (this crate)  ← lifecycle, sliding expiration, extraction
//!     ↕
//! Cookie / Token Layers (below)  ← attribute rendering, JWT sign/verify
//!     ↕
//! Adapter (yours)  ← persistence for sessions and users
//! ```

#![allow(async_fn_in_trait)]

mod adapter;
mod cleanup;
mod clock;
mod config;
mod credentials;
mod error;
mod id;
mod manager;
mod request;
mod session;

pub use adapter::{Adapter, AdapterSession, AdapterUser};
pub use cleanup::{MIN_CLEANUP_INTERVAL, run_cleanup, spawn_cleanup_scheduler};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AuthConfig, DEFAULT_SESSION_COOKIE_NAME, NON_EXPIRING_COOKIE_DAYS, SessionCookieAttributes,
    SessionCookieOptions,
};
pub use credentials::read_bearer_token;
pub use error::AuthError;
pub use id::{generate_id, generate_id_from_entropy_size};
pub use manager::{SessionAndUser, SessionManager};
pub use request::verify_request_origin;
pub use session::{DatabaseSession, DatabaseUser, Session, User};

pub use authora_cookie::{Cookie, CookieAttributes, SameSite};
pub use authora_token::{
    Algorithm, Claims, CreatedToken, JwtConfig, JwtOptions, SignOptions, TokenError, TokenIssuer,
    VerifiedToken, VerifyOptions,
};

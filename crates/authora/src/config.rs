//! Manager configuration.
//!
//! Build an [`AuthConfig`] once at startup and move it into the
//! [`SessionManager`](crate::SessionManager). Nothing in it can change
//! afterwards.

use authora_cookie::{CookieAttributes, SameSite};
use authora_token::JwtConfig;
use chrono::Duration;

/// Cookie name used when none is configured.
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "auth_session";

/// Cookie lifetime in days used when cookie expiry is switched off. The
/// server-side session TTL is unaffected.
pub const NON_EXPIRING_COOKIE_DAYS: i64 = 365 * 2;

// ---------------------------------------------------------------------------
// AuthConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for a session manager.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session TTL: how long a session lives after creation or its last
    /// renewal. Default: 30 days.
    pub session_expires_in: Duration,

    /// Random bytes per generated session id. Default: 25.
    pub session_id_entropy: usize,

    pub session_cookie: SessionCookieOptions,

    /// Bearer token settings. Disabled by default.
    pub jwt: JwtConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_expires_in: Duration::days(30),
            session_id_entropy: 25,
            session_cookie: SessionCookieOptions::default(),
            jwt: JwtConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionCookieOptions
// ---------------------------------------------------------------------------

/// How the session cookie is named and shaped.
#[derive(Debug, Clone)]
pub struct SessionCookieOptions {
    pub name: String,

    /// When `false`, the cookie is given a two-year lifetime instead of
    /// the session TTL, so the browser keeps it while the server still
    /// expires the session on schedule.
    pub expires: bool,

    pub attributes: SessionCookieAttributes,
}

impl Default for SessionCookieOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_SESSION_COOKIE_NAME.to_owned(),
            expires: true,
            attributes: SessionCookieAttributes::default(),
        }
    }
}

impl SessionCookieOptions {
    /// Lifetime written to created cookies for a given session TTL.
    pub fn lifetime(&self, session_expires_in: Duration) -> Duration {
        if self.expires {
            session_expires_in
        } else {
            Duration::days(NON_EXPIRING_COOKIE_DAYS)
        }
    }
}

/// Overrides for the default session cookie attributes.
///
/// Unset fields fall back to `HttpOnly`, `Secure`, `SameSite=Lax`,
/// `Path=/` and no `Domain`.
#[derive(Debug, Clone, Default)]
pub struct SessionCookieAttributes {
    pub same_site: Option<SameSite>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
}

impl SessionCookieAttributes {
    /// The full attribute set after applying defaults.
    pub fn resolve(&self) -> CookieAttributes {
        CookieAttributes {
            http_only: Some(self.http_only.unwrap_or(true)),
            secure: Some(self.secure.unwrap_or(true)),
            same_site: Some(self.same_site.unwrap_or(SameSite::Lax)),
            path: Some(self.path.clone().unwrap_or_else(|| "/".to_owned())),
            domain: self.domain.clone(),
            ..CookieAttributes::default()
        }
    }
}

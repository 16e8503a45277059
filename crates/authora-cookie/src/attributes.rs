//! Cookie attributes and `Set-Cookie` serialization.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SameSite
// ---------------------------------------------------------------------------

/// The `SameSite` policy of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Sent on same-site requests and top-level cross-site navigations.
    Lax,
    /// Sent on same-site requests only.
    Strict,
    /// Sent on every request. Browsers require `Secure` alongside it.
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lax => write!(f, "Lax"),
            Self::Strict => write!(f, "Strict"),
            Self::None => write!(f, "None"),
        }
    }
}

// ---------------------------------------------------------------------------
// CookieAttributes
// ---------------------------------------------------------------------------

/// The attribute set written after `name=value` in a `Set-Cookie` header.
///
/// Every field is optional; unset fields are simply omitted from the
/// serialized header. `max_age` is in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieAttributes {
    pub secure: Option<bool>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub same_site: Option<SameSite>,
    pub http_only: Option<bool>,
    pub max_age: Option<i64>,
    pub expires: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Cookie
// ---------------------------------------------------------------------------

/// A named cookie with its value and attributes.
///
/// Use [`Cookie::serialize`] (or `to_string()`) to get the value of a
/// `Set-Cookie` response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub attributes: CookieAttributes,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        attributes: CookieAttributes,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            attributes,
        }
    }

    /// Renders the cookie as a `Set-Cookie` header value.
    ///
    /// The value is percent-encoded, so it may hold `;`, spaces or any
    /// other byte. [`parse_cookies`](crate::parse_cookies) decodes it.
    ///
    /// Attribute order is fixed: `Domain`, `Expires`, `HttpOnly`,
    /// `Max-Age`, `Path`, `SameSite`, `Secure`. Boolean flags are only
    /// written when `Some(true)`.
    pub fn serialize(&self) -> String {
        let attrs = &self.attributes;
        let mut parts = vec![format!("{}={}", self.name, urlencoding::encode(&self.value))];

        if let Some(domain) = &attrs.domain {
            parts.push(format!("Domain={domain}"));
        }
        if let Some(expires) = &attrs.expires {
            parts.push(format!("Expires={}", http_date(expires)));
        }
        if attrs.http_only == Some(true) {
            parts.push("HttpOnly".to_owned());
        }
        if let Some(max_age) = attrs.max_age {
            parts.push(format!("Max-Age={max_age}"));
        }
        if let Some(path) = &attrs.path {
            parts.push(format!("Path={path}"));
        }
        if let Some(same_site) = attrs.same_site {
            parts.push(format!("SameSite={same_site}"));
        }
        if attrs.secure == Some(true) {
            parts.push("Secure".to_owned());
        }

        parts.join("; ")
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Formats a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
fn http_date(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

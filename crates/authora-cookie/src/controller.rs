//! A controller for one named cookie: build, blank and parse.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::{Cookie, CookieAttributes};

/// Parses a raw `Cookie` request header into a name → value map.
///
/// Pairs are separated by `;` and split on the first `=`. Values are
/// percent-decoded. Pairs with an empty name, or a value that doesn't
/// decode to UTF-8, are skipped. When a name appears twice the later
/// value wins.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for item in header.split(';') {
        let item = item.trim();
        let (name, value) = item.split_once('=').unwrap_or((item, ""));
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let Ok(value) = urlencoding::decode(value.trim()) else {
            continue;
        };
        cookies.insert(name.to_owned(), value.into_owned());
    }
    cookies
}

/// Builds and reads a single named cookie with a fixed attribute set.
///
/// The controller is immutable once built, so one instance can be shared
/// by every request handler.
#[derive(Debug, Clone)]
pub struct CookieController {
    cookie_name: String,
    base_attributes: CookieAttributes,
    expires_in: Option<Duration>,
}

impl CookieController {
    /// `expires_in` sets both `Max-Age` and `Expires` on created cookies.
    /// `None` produces session cookies (no expiry attributes).
    pub fn new(
        cookie_name: impl Into<String>,
        base_attributes: CookieAttributes,
        expires_in: Option<Duration>,
    ) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            base_attributes,
            expires_in,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in
    }

    /// Creates a cookie carrying `value`, expiring relative to the system clock.
    pub fn create_cookie(&self, value: &str) -> Cookie {
        self.create_cookie_at(value, Utc::now())
    }

    /// Creates a cookie carrying `value`, expiring relative to `now`.
    pub fn create_cookie_at(&self, value: &str, now: DateTime<Utc>) -> Cookie {
        let mut attributes = self.base_attributes.clone();
        if let Some(expires_in) = self.expires_in {
            attributes.max_age = Some(expires_in.num_seconds());
            attributes.expires = Some(now + expires_in);
        }
        Cookie::new(self.cookie_name.clone(), value, attributes)
    }

    /// Creates an empty cookie that the browser drops immediately.
    pub fn create_blank_cookie(&self) -> Cookie {
        let mut attributes = self.base_attributes.clone();
        attributes.max_age = Some(0);
        attributes.expires = Some(DateTime::UNIX_EPOCH);
        Cookie::new(self.cookie_name.clone(), "", attributes)
    }

    /// Reads this controller's cookie out of a raw `Cookie` header.
    ///
    /// Returns `None` if the cookie is missing or has an empty value.
    pub fn parse(&self, header: &str) -> Option<String> {
        parse_cookies(header)
            .remove(&self.cookie_name)
            .filter(|value| !value.is_empty())
    }
}

//! Session cookie handling for Authora.
//!
//! This crate knows how to do three things with a single named cookie:
//!
//! - **Build** it with a fixed attribute set and lifetime ([`CookieController::create_cookie`])
//! - **Blank** it for logout ([`CookieController::create_blank_cookie`])
//! - **Read** it back out of a raw `Cookie` request header ([`CookieController::parse`])
//!
//! It does not know what the cookie value means. The session layer above
//! puts a session id in it and decides what to do with the id it reads.
//!
//! ```text
//! Session Layer (authora)  ← decides lifetime and default attributes
//!     ↕
//! Cookie Layer (this crate)  ← attribute selection, Set-Cookie rendering, parsing
//! ```

mod attributes;
mod controller;

pub use attributes::{Cookie, CookieAttributes, SameSite};
pub use controller::{CookieController, parse_cookies};

//! Bearer token issuance and verification for Authora.
//!
//! Tokens are compact signed JWTs (`header.payload.signature`, each part
//! base64url). This crate configures and calls the signing primitive; it
//! does not implement any cryptography itself.
//!
//! Tokens are verified independently of server-side sessions: there is
//! no persistence here, and nothing is looked up per call.
//!
//! ```rust
//! use authora_token::{JwtConfig, SignOptions, TokenIssuer};
//! use chrono::Duration;
//! use serde_json::json;
//!
//! let issuer = TokenIssuer::new(JwtConfig::with_secret("change-me"));
//!
//! let created = issuer.create_token(
//!     &json!({ "sub": "user-1" }),
//!     Some(&SignOptions::expiring_in(Duration::minutes(15))),
//! );
//! assert!(created.status);
//!
//! let verified = issuer.verify_token(created.token.as_deref().unwrap(), None);
//! assert!(verified.status);
//! assert_eq!(verified.decoded.unwrap()["sub"], "user-1");
//! ```

mod error;
mod issuer;
mod options;

pub use error::TokenError;
pub use issuer::{Claims, CreatedToken, TokenIssuer, VerifiedToken};
pub use jsonwebtoken::Algorithm;
pub use options::{JwtConfig, JwtOptions, SignOptions, VerifyOptions};

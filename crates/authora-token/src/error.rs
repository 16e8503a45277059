//! Error types for the token layer.
//!
//! Token failures are ordinary runtime outcomes: an expired or forged
//! token shows up on nearly every unauthenticated request. So a
//! [`TokenError`] is never returned as `Err` from the issuer. It travels
//! inside [`CreatedToken`](crate::CreatedToken) or
//! [`VerifiedToken`](crate::VerifiedToken) and the caller branches on
//! `status`.

/// Everything that can go wrong while issuing or verifying a token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Tokens are switched off, or no secret is available.
    #[error("JWT is not enabled")]
    NotEnabled,

    /// Neither explicit sign options nor configured defaults were given.
    #[error("JWT options are not defined")]
    OptionsNotDefined,

    /// The payload serialized to something other than a JSON object.
    #[error("token payload must serialize to a JSON object")]
    PayloadNotObject,

    /// A sign option would overwrite a claim the payload already carries,
    /// e.g. `expires_in` on a payload that has its own `exp`.
    #[error("payload already has an \"{0}\" claim")]
    ClaimConflict(&'static str),

    /// A sign option's duration pushes the claim outside the
    /// representable time range.
    #[error("\"{0}\" is out of range")]
    InvalidDuration(&'static str),

    /// The payload could not be serialized.
    #[error("invalid token payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Signing or verification failed: bad key, bad signature, expired,
    /// malformed, wrong algorithm, claim mismatch.
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

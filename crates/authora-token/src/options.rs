//! Token configuration: the secret, the on/off switch and the default
//! sign/verify options.

use chrono::Duration;
use jsonwebtoken::Algorithm;

// ---------------------------------------------------------------------------
// SignOptions
// ---------------------------------------------------------------------------

/// How to sign a token.
///
/// Each option maps to one registered claim. `iat` is always written
/// unless `no_timestamp` is set.
#[derive(Debug, Clone)]
pub struct SignOptions {
    /// Signing algorithm. HMAC algorithms use the secret bytes directly;
    /// RSA, PSS, EC and EdDSA algorithms expect the secret to be a PEM key.
    pub algorithm: Algorithm,
    /// Lifetime of the token (`exp = now + expires_in`).
    pub expires_in: Option<Duration>,
    /// Delay before the token becomes valid (`nbf = now + not_before`).
    pub not_before: Option<Duration>,
    pub issuer: Option<String>,
    pub subject: Option<String>,
    pub audience: Option<String>,
    pub jwt_id: Option<String>,
    /// Written to the header as `kid`.
    pub key_id: Option<String>,
    /// Skip the `iat` claim.
    pub no_timestamp: bool,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256,
            expires_in: None,
            not_before: None,
            issuer: None,
            subject: None,
            audience: None,
            jwt_id: None,
            key_id: None,
            no_timestamp: false,
        }
    }
}

impl SignOptions {
    /// HS256 options with the given lifetime.
    pub fn expiring_in(expires_in: Duration) -> Self {
        Self {
            expires_in: Some(expires_in),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// VerifyOptions
// ---------------------------------------------------------------------------

/// How to verify a token.
///
/// `exp` and `nbf` are checked when the token carries them, but neither
/// is required. Empty `issuer`/`audience` lists skip those checks.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Accepted algorithms. The first one also decides how the secret is
    /// turned into a key.
    pub algorithms: Vec<Algorithm>,
    pub issuer: Vec<String>,
    pub audience: Vec<String>,
    pub subject: Option<String>,
    /// Clock skew tolerance in seconds.
    pub leeway: u64,
    pub ignore_expiration: bool,
    pub ignore_not_before: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            algorithms: vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512],
            issuer: Vec::new(),
            audience: Vec::new(),
            subject: None,
            leeway: 0,
            ignore_expiration: false,
            ignore_not_before: false,
        }
    }
}

// ---------------------------------------------------------------------------
// JwtOptions / JwtConfig
// ---------------------------------------------------------------------------

/// Default options used when a call doesn't bring its own.
#[derive(Debug, Clone, Default)]
pub struct JwtOptions {
    pub sign_options: Option<SignOptions>,
    pub verify_options: Option<VerifyOptions>,
}

/// Token configuration, fixed when the issuer is built.
///
/// The default is disabled: every issue or verify call answers
/// "JWT is not enabled" until `enabled` is set and a secret is provided.
#[derive(Debug, Clone, Default)]
pub struct JwtConfig {
    pub enabled: bool,
    pub secret: Option<String>,
    pub options: Option<JwtOptions>,
}

impl JwtConfig {
    /// Enabled configuration with the given secret and default sign options
    /// (HS256, no expiry).
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            enabled: true,
            secret: Some(secret.into()),
            options: Some(JwtOptions {
                sign_options: Some(SignOptions::default()),
                verify_options: None,
            }),
        }
    }
}

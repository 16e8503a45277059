//! Issuing and verifying signed bearer tokens.
//!
//! The issuer wraps `jsonwebtoken` behind two calls that never fail with
//! `Err`: [`TokenIssuer::create_token`] and [`TokenIssuer::verify_token`].
//! Both report the outcome through a `status` flag plus an optional
//! [`TokenError`], so a bad token on a request is just another branch in
//! the handler rather than an early return.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{JwtConfig, SignOptions, TokenError, VerifyOptions};

/// Decoded token claims.
pub type Claims = Map<String, Value>;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of [`TokenIssuer::create_token`].
///
/// Exactly one of `token` / `error` is set, and `status` says which.
#[derive(Debug)]
pub struct CreatedToken {
    pub token: Option<String>,
    /// Absolute expiry of the token, if the sign options gave it one.
    pub expires_at: Option<DateTime<Utc>>,
    pub status: bool,
    pub error: Option<TokenError>,
}

impl CreatedToken {
    fn issued(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: Some(token),
            expires_at,
            status: true,
            error: None,
        }
    }

    fn failed(error: TokenError) -> Self {
        Self {
            token: None,
            expires_at: None,
            status: false,
            error: Some(error),
        }
    }

    /// Converts into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<String, TokenError> {
        match (self.token, self.error) {
            (Some(token), None) => Ok(token),
            (_, Some(error)) => Err(error),
            (None, None) => Err(TokenError::NotEnabled),
        }
    }
}

/// Outcome of [`TokenIssuer::verify_token`].
#[derive(Debug)]
pub struct VerifiedToken {
    pub decoded: Option<Claims>,
    pub status: bool,
    pub error: Option<TokenError>,
}

impl VerifiedToken {
    fn verified(decoded: Claims) -> Self {
        Self {
            decoded: Some(decoded),
            status: true,
            error: None,
        }
    }

    fn failed(error: TokenError) -> Self {
        Self {
            decoded: None,
            status: false,
            error: Some(error),
        }
    }

    /// Deserializes the decoded claims into a caller-defined type.
    ///
    /// Returns `None` if verification failed or the claims don't fit `T`.
    pub fn claims_as<T: DeserializeOwned>(&self) -> Option<T> {
        let decoded = self.decoded.clone()?;
        serde_json::from_value(Value::Object(decoded)).ok()
    }

    /// Converts into a `Result` for callers that prefer `?`.
    pub fn into_result(self) -> Result<Claims, TokenError> {
        match (self.decoded, self.error) {
            (Some(decoded), None) => Ok(decoded),
            (_, Some(error)) => Err(error),
            (None, None) => Err(TokenError::NotEnabled),
        }
    }
}

// ---------------------------------------------------------------------------
// TokenIssuer
// ---------------------------------------------------------------------------

/// Signs and verifies tokens with a configured secret.
///
/// Holds only immutable configuration, so it is `Send + Sync` and can be
/// shared freely.
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer {
    config: JwtConfig,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Signs `payload` into a compact token.
    ///
    /// Option precedence: explicit `options`, then the configured default
    /// sign options, otherwise [`TokenError::OptionsNotDefined`]. With
    /// tokens disabled or no secret configured the result is
    /// [`TokenError::NotEnabled`].
    pub fn create_token<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        options: Option<&SignOptions>,
    ) -> CreatedToken {
        let secret = match (self.config.enabled, &self.config.secret) {
            (true, Some(secret)) => secret,
            _ => return CreatedToken::failed(TokenError::NotEnabled),
        };

        let defaults = self
            .config
            .options
            .as_ref()
            .and_then(|opts| opts.sign_options.as_ref());
        let Some(options) = options.or(defaults) else {
            return CreatedToken::failed(TokenError::OptionsNotDefined);
        };

        match sign(payload, secret, options, Utc::now()) {
            Ok((token, expires_at)) => CreatedToken::issued(token, expires_at),
            Err(err) => {
                tracing::debug!(error = %err, "token signing failed");
                CreatedToken::failed(err)
            }
        }
    }

    /// Verifies a token's signature and registered claims.
    ///
    /// `secret` overrides the configured secret for this call; an empty
    /// override is ignored. Validation
    /// uses the configured verify options, or [`VerifyOptions::default`].
    pub fn verify_token(&self, token: &str, secret: Option<&str>) -> VerifiedToken {
        if !self.config.enabled {
            return VerifiedToken::failed(TokenError::NotEnabled);
        }
        let secret = secret
            .filter(|secret| !secret.is_empty())
            .or(self.config.secret.as_deref());
        let Some(secret) = secret else {
            return VerifiedToken::failed(TokenError::NotEnabled);
        };

        let default_options = VerifyOptions::default();
        let options = self
            .config
            .options
            .as_ref()
            .and_then(|opts| opts.verify_options.as_ref())
            .unwrap_or(&default_options);

        match verify(token, secret, options) {
            Ok(decoded) => VerifiedToken::verified(decoded),
            Err(err) => {
                tracing::debug!(error = %err, "token verification failed");
                VerifiedToken::failed(err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Signing internals
// ---------------------------------------------------------------------------

fn sign<T: Serialize + ?Sized>(
    payload: &T,
    secret: &str,
    options: &SignOptions,
    now: DateTime<Utc>,
) -> Result<(String, Option<DateTime<Utc>>), TokenError> {
    let Value::Object(mut claims) = serde_json::to_value(payload)? else {
        return Err(TokenError::PayloadNotObject);
    };

    if !options.no_timestamp {
        claims.insert("iat".into(), now.timestamp().into());
    }

    let expires_at = options
        .expires_in
        .map(|ttl| offset(now, ttl, "expires_in"))
        .transpose()?;
    if let Some(exp) = expires_at {
        set_claim(&mut claims, "exp", exp.timestamp().into())?;
    }
    if let Some(delay) = options.not_before {
        let nbf = offset(now, delay, "not_before")?;
        set_claim(&mut claims, "nbf", nbf.timestamp().into())?;
    }
    if let Some(iss) = &options.issuer {
        set_claim(&mut claims, "iss", iss.clone().into())?;
    }
    if let Some(sub) = &options.subject {
        set_claim(&mut claims, "sub", sub.clone().into())?;
    }
    if let Some(aud) = &options.audience {
        set_claim(&mut claims, "aud", aud.clone().into())?;
    }
    if let Some(jti) = &options.jwt_id {
        set_claim(&mut claims, "jti", jti.clone().into())?;
    }

    let mut header = Header::new(options.algorithm);
    header.kid = options.key_id.clone();

    let key = encoding_key(options.algorithm, secret)?;
    let token = jsonwebtoken::encode(&header, &claims, &key)?;
    Ok((token, expires_at))
}

fn offset(
    now: DateTime<Utc>,
    by: Duration,
    option: &'static str,
) -> Result<DateTime<Utc>, TokenError> {
    now.checked_add_signed(by)
        .ok_or(TokenError::InvalidDuration(option))
}

fn set_claim(
    claims: &mut Claims,
    name: &'static str,
    value: Value,
) -> Result<(), TokenError> {
    if claims.contains_key(name) {
        return Err(TokenError::ClaimConflict(name));
    }
    claims.insert(name.to_owned(), value);
    Ok(())
}

fn verify(token: &str, secret: &str, options: &VerifyOptions) -> Result<Claims, TokenError> {
    let algorithm = options.algorithms.first().copied().unwrap_or(Algorithm::HS256);

    let mut validation = Validation::new(algorithm);
    if !options.algorithms.is_empty() {
        validation.algorithms = options.algorithms.clone();
    }
    validation.leeway = options.leeway;
    validation.validate_exp = !options.ignore_expiration;
    validation.validate_nbf = !options.ignore_not_before;
    validation.set_required_spec_claims::<&str>(&[]);
    if !options.issuer.is_empty() {
        validation.set_issuer(&options.issuer);
    }
    if options.audience.is_empty() {
        validation.validate_aud = false;
    } else {
        validation.set_audience(&options.audience);
    }
    validation.sub = options.subject.clone();

    let key = decoding_key(algorithm, secret)?;
    let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}

fn encoding_key(algorithm: Algorithm, secret: &str) -> Result<EncodingKey, TokenError> {
    let bytes = secret.as_bytes();
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => EncodingKey::from_secret(bytes),
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(bytes)?,
        Algorithm::EdDSA => EncodingKey::from_ed_pem(bytes)?,
        _ => EncodingKey::from_rsa_pem(bytes)?,
    };
    Ok(key)
}

fn decoding_key(algorithm: Algorithm, secret: &str) -> Result<DecodingKey, TokenError> {
    let bytes = secret.as_bytes();
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => DecodingKey::from_secret(bytes),
        Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(bytes)?,
        Algorithm::EdDSA => DecodingKey::from_ed_pem(bytes)?,
        _ => DecodingKey::from_rsa_pem(bytes)?,
    };
    Ok(key)
}

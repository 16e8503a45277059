//! Integration tests for the create/verify contract of `TokenIssuer`.

use authora_token::{
    JwtConfig, JwtOptions, SignOptions, TokenError, TokenIssuer, VerifyOptions,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::json;

const SECRET: &str = "integration-secret";

// =========================================================================
// Helpers
// =========================================================================

fn enabled_issuer() -> TokenIssuer {
    TokenIssuer::new(JwtConfig::with_secret(SECRET))
}

/// Enabled with a secret, but no default sign options.
fn issuer_without_defaults() -> TokenIssuer {
    TokenIssuer::new(JwtConfig {
        enabled: true,
        secret: Some(SECRET.into()),
        options: None,
    })
}

/// Flips one character in the signature segment.
fn tamper(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    let last = chars.len() - 2;
    chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AppClaims {
    sub: String,
    role: String,
}

// =========================================================================
// create_token()
// =========================================================================

#[test]
fn test_create_token_disabled_returns_not_enabled() {
    let issuer = TokenIssuer::new(JwtConfig::default());

    let created = issuer.create_token(&json!({"sub": "u1"}), None);

    assert!(!created.status);
    assert!(created.token.is_none());
    assert!(created.expires_at.is_none());
    let error = created.error.expect("error should be set");
    assert!(matches!(error, TokenError::NotEnabled));
    assert_eq!(error.to_string(), "JWT is not enabled");
}

#[test]
fn test_create_token_enabled_without_secret_returns_not_enabled() {
    let issuer = TokenIssuer::new(JwtConfig {
        enabled: true,
        secret: None,
        options: Some(JwtOptions {
            sign_options: Some(SignOptions::default()),
            verify_options: None,
        }),
    });

    let created = issuer.create_token(&json!({}), Some(&SignOptions::default()));

    assert!(matches!(created.error, Some(TokenError::NotEnabled)));
}

#[test]
fn test_create_token_without_any_options_returns_options_not_defined() {
    let issuer = issuer_without_defaults();

    let created = issuer.create_token(&json!({"sub": "u1"}), None);

    assert!(!created.status);
    let error = created.error.expect("error should be set");
    assert_eq!(error.to_string(), "JWT options are not defined");
}

#[test]
fn test_create_token_explicit_options_take_precedence() {
    // The configured defaults have no expiry; the explicit ones do.
    let issuer = enabled_issuer();

    let created = issuer.create_token(
        &json!({"sub": "u1"}),
        Some(&SignOptions::expiring_in(Duration::minutes(10))),
    );

    assert!(created.status);
    assert!(created.expires_at.is_some());
}

#[test]
fn test_create_token_falls_back_to_default_options() {
    let issuer = enabled_issuer();

    let created = issuer.create_token(&json!({"sub": "u1"}), None);

    assert!(created.status);
    assert!(created.error.is_none());
    assert!(created.expires_at.is_none(), "defaults set no expiry");
}

#[test]
fn test_create_token_has_three_segments() {
    let token = enabled_issuer()
        .create_token(&json!({"sub": "u1"}), None)
        .into_result()
        .expect("should sign");

    assert_eq!(token.split('.').count(), 3);
}

#[test]
fn test_create_token_signing_failure_is_returned_not_thrown() {
    // RS256 needs a PEM private key; a plain string secret can't sign.
    let issuer = enabled_issuer();
    let options = SignOptions {
        algorithm: authora_token::Algorithm::RS256,
        ..Default::default()
    };

    let created = issuer.create_token(&json!({"sub": "u1"}), Some(&options));

    assert!(!created.status);
    assert!(matches!(created.error, Some(TokenError::Jwt(_))));
}

// =========================================================================
// verify_token()
// =========================================================================

#[test]
fn test_create_token_huge_expiry_is_returned_not_thrown() {
    let issuer = enabled_issuer();

    let created = issuer.create_token(
        &json!({"sub": "u1"}),
        Some(&SignOptions::expiring_in(Duration::MAX)),
    );

    assert!(!created.status);
    assert!(created.token.is_none());
    assert!(matches!(
        created.error,
        Some(TokenError::InvalidDuration("expires_in"))
    ));
}

#[test]
fn test_round_trip_decoded_equals_payload() {
    let issuer = enabled_issuer();
    let payload = json!({"sub": "u1", "role": "admin"});
    let options = SignOptions {
        no_timestamp: true,
        ..Default::default()
    };

    let token = issuer
        .create_token(&payload, Some(&options))
        .into_result()
        .unwrap();
    let verified = issuer.verify_token(&token, None);

    assert!(verified.status, "error: {:?}", verified.error);
    assert_eq!(serde_json::Value::Object(verified.decoded.unwrap()), payload);
}

#[test]
fn test_round_trip_typed_claims() {
    let issuer = enabled_issuer();
    let claims = AppClaims {
        sub: "u1".into(),
        role: "editor".into(),
    };

    let token = issuer
        .create_token(&claims, Some(&SignOptions::expiring_in(Duration::hours(1))))
        .into_result()
        .unwrap();
    let verified = issuer.verify_token(&token, None);

    assert_eq!(verified.claims_as::<AppClaims>(), Some(claims));
    let decoded = verified.decoded.unwrap();
    assert!(decoded.contains_key("iat"));
    assert!(decoded.contains_key("exp"));
}

#[test]
fn test_verify_tampered_token_fails() {
    let issuer = enabled_issuer();
    let token = issuer
        .create_token(&json!({"sub": "u1"}), None)
        .into_result()
        .unwrap();

    let verified = issuer.verify_token(&tamper(&token), None);

    assert!(!verified.status);
    assert!(verified.decoded.is_none());
    assert!(verified.error.is_some());
}

#[test]
fn test_verify_expired_token_fails() {
    let issuer = enabled_issuer();
    let token = issuer
        .create_token(
            &json!({"sub": "u1"}),
            Some(&SignOptions::expiring_in(Duration::minutes(-5))),
        )
        .into_result()
        .unwrap();

    let verified = issuer.verify_token(&token, None);

    assert!(!verified.status);
}

#[test]
fn test_verify_malformed_token_fails() {
    let verified = enabled_issuer().verify_token("not-a-token", None);

    assert!(!verified.status);
    assert!(matches!(verified.error, Some(TokenError::Jwt(_))));
}

#[test]
fn test_verify_with_secret_override() {
    let other = TokenIssuer::new(JwtConfig::with_secret("other-secret"));
    let token = other
        .create_token(&json!({"sub": "u1"}), None)
        .into_result()
        .unwrap();
    let issuer = enabled_issuer();

    assert!(!issuer.verify_token(&token, None).status);
    assert!(issuer.verify_token(&token, Some("other-secret")).status);
}

#[test]
fn test_verify_empty_override_falls_back_to_configured_secret() {
    let issuer = enabled_issuer();
    let token = issuer
        .create_token(&json!({"sub": "u1"}), None)
        .into_result()
        .unwrap();

    let verified = issuer.verify_token(&token, Some(""));

    assert!(verified.status, "{:?}", verified.error);
}

#[test]
fn test_verify_disabled_returns_not_enabled_even_with_override() {
    let issuer = TokenIssuer::new(JwtConfig::default());

    let verified = issuer.verify_token("a.b.c", Some(SECRET));

    assert!(matches!(verified.error, Some(TokenError::NotEnabled)));
}

#[test]
fn test_verify_without_any_secret_returns_not_enabled() {
    let issuer = TokenIssuer::new(JwtConfig {
        enabled: true,
        secret: None,
        options: None,
    });

    let verified = issuer.verify_token("a.b.c", None);

    assert!(matches!(verified.error, Some(TokenError::NotEnabled)));
}

#[test]
fn test_verify_uses_configured_verify_options() {
    let issuer = TokenIssuer::new(JwtConfig {
        enabled: true,
        secret: Some(SECRET.into()),
        options: Some(JwtOptions {
            sign_options: Some(SignOptions {
                audience: Some("mobile".into()),
                ..Default::default()
            }),
            verify_options: Some(VerifyOptions {
                audience: vec!["web".into()],
                ..Default::default()
            }),
        }),
    });
    let token = issuer
        .create_token(&json!({"sub": "u1"}), None)
        .into_result()
        .unwrap();

    let verified = issuer.verify_token(&token, None);

    assert!(!verified.status, "audience mismatch should be rejected");
}

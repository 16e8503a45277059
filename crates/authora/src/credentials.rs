//! Pulling credentials out of request headers.

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The header is split on single spaces. The first part must be exactly
/// `Bearer` (case-sensitive); the second part is the token. Anything
/// after a further space is ignored.
pub fn read_bearer_token(authorization_header: &str) -> Option<&str> {
    let mut parts = authorization_header.split(' ');
    if parts.next()? != "Bearer" {
        return None;
    }
    parts.next().filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bearer_token_returns_token() {
        assert_eq!(read_bearer_token("Bearer abc123"), Some("abc123"));
    }

    #[test]
    fn test_read_bearer_token_other_scheme_returns_none() {
        assert_eq!(read_bearer_token("Basic abc123"), None);
    }

    #[test]
    fn test_read_bearer_token_scheme_is_case_sensitive() {
        assert_eq!(read_bearer_token("bearer abc123"), None);
    }

    #[test]
    fn test_read_bearer_token_missing_token_returns_none() {
        assert_eq!(read_bearer_token("Bearer"), None);
        assert_eq!(read_bearer_token("Bearer "), None);
        assert_eq!(read_bearer_token(""), None);
    }

    #[test]
    fn test_read_bearer_token_ignores_trailing_parts() {
        assert_eq!(read_bearer_token("Bearer abc extra"), Some("abc"));
    }
}

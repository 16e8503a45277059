//! Error types for the session layer.

/// Errors returned by [`SessionManager`](crate::SessionManager) operations
/// that touch persistence.
///
/// Token problems never show up here; they are carried as values by
/// [`CreatedToken`](crate::CreatedToken) and
/// [`VerifiedToken`](crate::VerifiedToken).
#[derive(Debug, thiserror::Error)]
pub enum AuthError<E> {
    /// The manager was built without an [`Adapter`](crate::Adapter).
    ///
    /// This is a programming error, reported on every call that needs
    /// persistence rather than only the first one.
    #[error("no adapter provided")]
    NoAdapter,

    /// The adapter failed. Its error is passed through untouched.
    #[error(transparent)]
    Adapter(E),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset")]
    struct StoreDown;

    #[test]
    fn test_no_adapter_message() {
        let err: AuthError<StoreDown> = AuthError::NoAdapter;

        assert_eq!(err.to_string(), "no adapter provided");
    }

    #[test]
    fn test_adapter_error_is_transparent() {
        let err = AuthError::Adapter(StoreDown);

        assert_eq!(err.to_string(), "connection reset");
    }
}

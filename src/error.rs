//! Error taxonomy for content fetching.
//!
//! An empty page is never an error: it comes back as an `Ok` result with
//! zero items. Everything that actually failed is a [`FetchError`], so the
//! navigator can keep the last good view on screen and decide per category
//! whether to show a notice or demand re-authentication.

use thiserror::Error;

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("not signed in to this forum")]
    NotAuthenticated,

    #[error("session expired")]
    SessionExpired,

    #[error("access denied")]
    AccessDenied,
}

/// Anything that can go wrong while fetching or writing forum content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure: connect, DNS, timeout, TLS.
    #[error("network error: {0}")]
    Network(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The server answered but rejected the request.
    #[error("api error: {message}")]
    Api { message: String },

    /// The addressed content no longer exists.
    #[error("content not found")]
    NotFound,

    /// The response body did not match any known shape.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn api(message: impl Into<String>) -> Self {
        FetchError::Api {
            message: message.into(),
        }
    }

    /// Transient errors a caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }

    /// Whether recovery requires signing in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            FetchError::Auth(AuthError::NotAuthenticated | AuthError::SessionExpired)
        )
    }

    /// Short message suitable for a transient notice.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => {
                "Unable to reach the forum. Please check your connection.".to_string()
            }
            FetchError::Auth(AuthError::AccessDenied) => {
                "You do not have permission to view this.".to_string()
            }
            FetchError::Auth(_) => "Please sign in again.".to_string(),
            FetchError::Api { message } => format!("The forum rejected the request: {}", message),
            FetchError::NotFound => "This content is no longer available.".to_string(),
            FetchError::Decode(_) => "The forum sent an unreadable response.".to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return match status.as_u16() {
                401 => AuthError::SessionExpired.into(),
                403 => AuthError::AccessDenied.into(),
                404 => FetchError::NotFound,
                code => FetchError::Api {
                    message: format!("HTTP {}", code),
                },
            };
        }
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Network("timeout".into()).is_retryable());
        assert!(!FetchError::NotFound.is_retryable());
        assert!(!FetchError::api("bad request").is_retryable());
        assert!(!FetchError::Auth(AuthError::SessionExpired).is_retryable());
    }

    #[test]
    fn test_reauth_detection() {
        assert!(FetchError::Auth(AuthError::NotAuthenticated).requires_reauth());
        assert!(FetchError::Auth(AuthError::SessionExpired).requires_reauth());
        assert!(!FetchError::Auth(AuthError::AccessDenied).requires_reauth());
        assert!(!FetchError::Network("down".into()).requires_reauth());
    }

    #[test]
    fn test_display_messages() {
        let err = FetchError::api("closed board");
        assert_eq!(err.to_string(), "api error: closed board");
        assert!(err.user_message().contains("closed board"));

        let auth: FetchError = AuthError::NotAuthenticated.into();
        assert_eq!(auth.to_string(), "not signed in to this forum");
    }

    #[test]
    fn test_user_message_never_empty() {
        let errors = vec![
            FetchError::Network("x".into()),
            FetchError::Auth(AuthError::NotAuthenticated),
            FetchError::Auth(AuthError::AccessDenied),
            FetchError::api("x"),
            FetchError::NotFound,
            FetchError::Decode("x".into()),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}

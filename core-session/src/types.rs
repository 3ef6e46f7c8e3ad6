use core_api::User;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token issued by the backend at login.
///
/// The value is opaque to the client: it is never inspected, refreshed
/// or expired locally, only attached to requests until the backend
/// starts rejecting it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token received from the backend
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the raw value
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(\"[REDACTED]\")")
    }
}

/// The authentication state of this client.
///
/// A session is all-or-nothing: signed in with both a user and a
/// token, or signed out with neither. This is also the shape that gets
/// persisted, so [`is_consistent`](Session::is_consistent) guards
/// rehydration against partial records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<AuthToken>,
    pub authenticated: bool,
}

impl Session {
    /// The signed-out state
    pub fn empty() -> Self {
        Self {
            user: None,
            token: None,
            authenticated: false,
        }
    }

    /// A session for a freshly authenticated user
    pub fn signed_in(user: User, token: AuthToken) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            authenticated: true,
        }
    }

    /// Whether a user is currently signed in
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether the three fields agree.
    ///
    /// Signed in means user and token are both present; signed out
    /// means both are absent. Anything else is a partial record that
    /// must not be trusted.
    pub fn is_consistent(&self) -> bool {
        match (self.authenticated, &self.user, &self.token) {
            (true, Some(_), Some(_)) => true,
            (false, None, None) => true,
            _ => false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_api::UserId;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1),
            name: "user".to_string(),
            email: "user@example.com".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_auth_token_debug_redacts() {
        let token = AuthToken::new("secret_session_token");
        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret_session_token"));
    }

    #[test]
    fn test_auth_token_serializes_transparently() {
        let token = AuthToken::new("t-123");
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""t-123""#);
        assert_eq!(token.as_str(), "t-123");
        assert_eq!(token.into_inner(), "t-123");
    }

    #[test]
    fn test_empty_and_signed_in_are_consistent() {
        assert!(Session::empty().is_consistent());
        assert!(!Session::empty().is_authenticated());

        let session = Session::signed_in(sample_user(), AuthToken::new("t-123"));
        assert!(session.is_consistent());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_partial_records_are_inconsistent() {
        let flag_without_data = Session {
            user: None,
            token: None,
            authenticated: true,
        };
        assert!(!flag_without_data.is_consistent());

        let data_without_flag = Session {
            user: Some(sample_user()),
            token: Some(AuthToken::new("t-123")),
            authenticated: false,
        };
        assert!(!data_without_flag.is_consistent());

        let missing_token = Session {
            user: Some(sample_user()),
            token: None,
            authenticated: true,
        };
        assert!(!missing_token.is_consistent());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::signed_in(sample_user(), AuthToken::new("secret_session_token"));
        let debug_str = format!("{:?}", session);
        assert!(!debug_str.contains("secret_session_token"));
    }
}

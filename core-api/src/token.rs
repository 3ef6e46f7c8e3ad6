use async_trait::async_trait;

/// Supplies the bearer token attached to authenticated requests.
///
/// [`ApiClient`](crate::ApiClient) asks its token source immediately
/// before each send, so a login or logout that happens while a call is
/// in flight is reflected by the next request. Returning `None` sends
/// the request anonymously.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current bearer token, if a session is active
    async fn bearer_token(&self) -> Option<String>;
}

/// Fixed token source for tests and one-off scripts.
#[derive(Debug, Clone)]
pub struct StaticTokenSource(Option<String>);

impl StaticTokenSource {
    /// Always supply the given token
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// Never supply a token
    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by backend API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    ///
    /// The message is the backend's own wording when the response body
    /// carried one, so it can be shown to the user as-is.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response arrived but its body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a server rejection, if there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the request as unauthenticated
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        ApiError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    // Transparent so the backend's own message reaches the user as-is
    #[error(transparent)]
    Api(#[from] core_api::ApiError),
}

pub type Result<T> = std::result::Result<T, CoreError>;

use thiserror::Error;

/// Errors produced while assembling or operating the runtime layer.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required bridge implementation was not provided.
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

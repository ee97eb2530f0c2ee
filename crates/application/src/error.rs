use scopecap_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("failed to read frame: {0}")]
    ReadFailure(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("corrupt manifest: {0}")]
    CorruptManifest(String),
    #[error("image codec error: {0}")]
    Codec(String),
}

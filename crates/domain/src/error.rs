use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("project name must not be empty")]
    EmptyProjectName,
    #[error("project name must be a single path component, got {0:?}")]
    InvalidProjectName(String),
    #[error("file name must be a single path component, got {0:?}")]
    InvalidFileName(String),
    #[error("capture sequence must start at 1, got {0}")]
    InvalidSequence(u32),
    #[error("unrecognized image extension: {0:?}")]
    UnrecognizedExtension(String),
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    FrameSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("image dimension must be at least 1 pixel")]
    ZeroDimension,
    #[error("crop rectangle is empty after clamping to the image")]
    EmptyCrop,
    #[error("stroke width must be at least 1 pixel")]
    ZeroStrokeWidth,
    #[error("stroke width must be at most {max} pixels, got {width}")]
    StrokeTooWide { width: u32, max: u32 },
}

mod pattern;

#[cfg(feature = "native-camera")]
mod native;

#[cfg(feature = "native-camera")]
pub use native::NativeCameraProvider;
pub use pattern::{PatternCameraProvider, DEFAULT_PATTERN_HEIGHT, DEFAULT_PATTERN_WIDTH};

pub mod camera;
pub mod fs;
pub mod imaging;
pub mod json;
pub mod presenters;

#[cfg(feature = "native-camera")]
pub use camera::NativeCameraProvider;
pub use camera::PatternCameraProvider;
pub use fs::{FsProjectStorage, SystemClock};
pub use imaging::{read_frame, ImageCrateCodec, ImageCrateEditor, ImageEditSession};
pub use json::JsonCatalogStore;
pub use presenters::{
    present_capture, present_dimensions, present_project_details, present_project_row,
};

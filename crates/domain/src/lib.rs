mod edit;
mod error;
mod image;
mod project;

pub use edit::{
    clip_segment, resized_height, CropRect, PixelRect, Point, Stroke, ZoomLevel,
    DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH, MAX_ZOOM_STEPS, ZOOM_STEP,
};
pub use error::DomainError;
pub use image::{
    capture_file_name, detect_image_kind, is_recognized_image, Frame, ImageKind,
    CAPTURE_TIMESTAMP_FORMAT,
};
pub use project::{validate_file_name, ProjectName, ProjectRecord, SyncStatus, CREATED_AT_FORMAT};

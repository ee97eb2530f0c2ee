use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use scopecap_domain::{CropRect, Frame, ProjectName, ProjectRecord, Stroke};

use crate::ApplicationError;

/// Sole owner of the project manifest. Callers load the whole catalog,
/// mutate it in memory and save it back; the last save wins.
pub trait CatalogStore {
    /// Writes an empty manifest if none exists. Never touches an existing one.
    fn initialize(&self) -> Result<(), ApplicationError>;

    /// An absent manifest reads as an empty catalog; an unparseable one is
    /// `CorruptManifest`.
    fn load(&self) -> Result<Vec<ProjectRecord>, ApplicationError>;

    /// Replaces the manifest. Readers never observe a partial write.
    fn save(&self, records: &[ProjectRecord]) -> Result<(), ApplicationError>;
}

/// Filesystem side of the project tree: one flat directory per project.
pub trait ProjectStorage {
    fn initialize(&self) -> Result<(), ApplicationError>;

    fn project_exists(&self, project: &ProjectName) -> Result<bool, ApplicationError>;

    /// Creates an empty directory for the project. An existing empty
    /// directory is adopted; an existing non-empty one is `AlreadyExists`.
    fn create_project_dir(&self, project: &ProjectName) -> Result<(), ApplicationError>;

    /// Recursively removes the directory. Returns `false` when it was already
    /// missing.
    fn remove_project_dir(&self, project: &ProjectName) -> Result<bool, ApplicationError>;

    /// Names of regular files directly inside the project directory, in
    /// enumeration order. Names that are not valid UTF-8 are left out. A
    /// missing directory is `NotFound`.
    fn list_files(&self, project: &ProjectName) -> Result<Vec<String>, ApplicationError>;

    /// Number of regular files directly inside the project directory,
    /// whatever their names. Symlinks to files count. A missing directory is
    /// `NotFound`.
    fn count_files(&self, project: &ProjectName) -> Result<u64, ApplicationError>;

    fn file_exists(&self, project: &ProjectName, file_name: &str)
        -> Result<bool, ApplicationError>;

    /// Removes one regular file; a missing file is `NotFound`.
    fn remove_file(&self, project: &ProjectName, file_name: &str) -> Result<(), ApplicationError>;

    fn file_path(&self, project: &ProjectName, file_name: &str) -> PathBuf;
}

/// An open camera device. Dropping the handle releases the device as well.
pub trait CameraHandle {
    fn device_index(&self) -> u32;

    fn read_frame(&mut self) -> Result<Frame, ApplicationError>;

    fn close(self: Box<Self>);
}

pub trait CameraProvider {
    fn open(&self, device_index: u32) -> Result<Box<dyn CameraHandle>, ApplicationError>;

    /// Probes indices `0..probe_limit` and returns the ones that open.
    fn enumerate(&self, probe_limit: u32) -> Vec<u32> {
        (0..probe_limit)
            .filter(|index| match self.open(*index) {
                Ok(handle) => {
                    handle.close();
                    true
                }
                Err(_) => false,
            })
            .collect()
    }
}

pub trait ImageCodec {
    /// Encodes the frame to `path`; the format follows the file extension.
    fn write_frame(&self, frame: &Frame, path: &Path) -> Result<(), ApplicationError>;
}

/// In-memory editing state for one decoded image.
pub trait EditSession {
    fn source_path(&self) -> &Path;

    /// Dimensions of the working buffer, i.e. what `save` writes at 1x.
    fn dimensions(&self) -> (u32, u32);

    /// Dimensions at the current zoom.
    fn display_dimensions(&self) -> (u32, u32);

    fn crop(&mut self, rect: CropRect) -> Result<(), ApplicationError>;

    fn draw_stroke(&mut self, stroke: &Stroke) -> Result<(), ApplicationError>;

    fn resize_to_width(&mut self, new_width: u32) -> Result<(), ApplicationError>;

    fn zoom_in(&mut self);

    fn zoom_out(&mut self);

    fn save(&self, path: &Path, at_display_scale: bool) -> Result<(), ApplicationError>;

    /// `{stem}-edited.jpg`, the name proposed when saving.
    fn default_save_name(&self) -> String {
        let stem = self
            .source_path()
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("image");
        format!("{stem}-edited.jpg")
    }
}

pub trait ImageEditor {
    fn open(&self, path: &Path) -> Result<Box<dyn EditSession>, ApplicationError>;
}

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

mod capture;
mod catalog;
mod error;
mod ports;
mod service;
#[cfg(test)]
mod testing;
mod use_cases;

pub use capture::CaptureSession;
pub use catalog::find_by_name;
pub use error::ApplicationError;
pub use ports::{
    CameraHandle, CameraProvider, CatalogStore, Clock, EditSession, ImageCodec, ImageEditor,
    ProjectStorage,
};
pub use service::ProjectService;
pub use use_cases::{
    BeginSyncCommand, BootstrapCommand, CaptureCommand, CaptureReport, CreateProjectCommand,
    DeleteImageCommand, DeleteProjectCommand, ListImagesCommand, ListProjectsCommand,
    OpenEditorCommand, PreviewFrame, ReconcileProjectCommand, ShowProjectCommand,
};

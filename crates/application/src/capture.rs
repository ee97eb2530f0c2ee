use log::{debug, info, warn};
use scopecap_domain::{capture_file_name, Frame, ImageKind, ProjectName};

use crate::service::parse_project_name;
use crate::{
    ApplicationError, CameraHandle, CameraProvider, CaptureCommand, CaptureReport, Clock,
    ImageCodec, PreviewFrame, ProjectService, ShowProjectCommand,
};

/// Owns the one open camera handle and turns grabbed frames into project
/// images.
pub struct CaptureSession {
    cameras: Box<dyn CameraProvider>,
    codec: Box<dyn ImageCodec>,
    clock: Box<dyn Clock>,
    extension: String,
    handle: Option<Box<dyn CameraHandle>>,
}

impl CaptureSession {
    pub fn new(
        cameras: Box<dyn CameraProvider>,
        codec: Box<dyn ImageCodec>,
        clock: Box<dyn Clock>,
        extension: &str,
    ) -> Result<Self, ApplicationError> {
        if ImageKind::from_extension(extension).is_none() {
            return Err(ApplicationError::InvalidInput(format!(
                "capture extension {extension:?} is not an image format"
            )));
        }
        Ok(Self {
            cameras,
            codec,
            clock,
            extension: extension.to_ascii_lowercase(),
            handle: None,
        })
    }

    pub fn enumerate_devices(&self, probe_limit: u32) -> Vec<u32> {
        self.cameras.enumerate(probe_limit)
    }

    /// Opens `device_index`, releasing whichever device was held before.
    pub fn connect(&mut self, device_index: u32) -> Result<(), ApplicationError> {
        self.disconnect();
        let handle = self.cameras.open(device_index)?;
        info!("connected camera {device_index}");
        self.handle = Some(handle);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(handle) = self.handle.take() {
            let index = handle.device_index();
            handle.close();
            info!("released camera {index}");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    pub fn connected_device(&self) -> Option<u32> {
        self.handle.as_ref().map(|handle| handle.device_index())
    }

    /// One frame for the live view. Read-only with respect to the catalog.
    pub fn preview_frame(&mut self) -> Result<PreviewFrame, ApplicationError> {
        let handle = self.connected_handle()?;
        let frame = handle.read_frame()?;
        Ok(PreviewFrame {
            device_index: handle.device_index(),
            frame,
        })
    }

    /// Grabs a frame and stores it in the project in two steps: reserve the
    /// sequence number in the catalog, then write the file. A failed write
    /// is followed by a reconcile so `total_data` matches the directory again.
    pub fn capture(
        &mut self,
        projects: &ProjectService,
        command: CaptureCommand,
    ) -> Result<CaptureReport, ApplicationError> {
        let name = parse_project_name(&command.project)?;
        let handle = self.connected_handle()?;
        projects.find_project(ShowProjectCommand {
            name: name.as_str().to_string(),
        })?;
        let frame = handle.read_frame()?;

        let sequence = projects.record_capture(&name)?;
        let file_name = match self.write_frame(projects, &name, sequence, &frame) {
            Ok(file_name) => file_name,
            Err(error) => {
                restore_count(projects, &name);
                return Err(error);
            }
        };

        let record = projects.find_project(ShowProjectCommand {
            name: name.as_str().to_string(),
        })?;
        info!("captured {file_name} into {name}");
        Ok(CaptureReport {
            project: record.name,
            file_name,
            sequence,
            total_data: record.total_data,
        })
    }

    fn write_frame(
        &self,
        projects: &ProjectService,
        name: &ProjectName,
        sequence: u32,
        frame: &Frame,
    ) -> Result<String, ApplicationError> {
        let file_name = capture_file_name(self.clock.now(), sequence, &self.extension)?;
        if projects.image_exists(name, &file_name)? {
            return Err(ApplicationError::AlreadyExists(format!(
                "image {file_name} in project {name}"
            )));
        }
        let path = projects.image_path(name, &file_name);
        debug!("writing frame {}x{} to {path:?}", frame.width(), frame.height());
        self.codec.write_frame(frame, &path)?;
        Ok(file_name)
    }

    fn connected_handle(&mut self) -> Result<&mut Box<dyn CameraHandle>, ApplicationError> {
        self.handle
            .as_mut()
            .ok_or_else(|| ApplicationError::DeviceUnavailable("no camera connected".to_string()))
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn restore_count(projects: &ProjectService, name: &ProjectName) {
    if let Err(error) = projects.reconcile(name) {
        warn!("could not reconcile {name} after failed capture: {error}");
    }
}

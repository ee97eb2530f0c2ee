use log::{debug, warn};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use scopecap_application::{ApplicationError, CameraHandle, CameraProvider};
use scopecap_domain::Frame;

/// Webcams reached through the platform capture API (V4L2, Media
/// Foundation, AVFoundation). Each device opens at its highest resolution
/// and streams RGB.
#[derive(Debug, Default)]
pub struct NativeCameraProvider;

impl NativeCameraProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CameraProvider for NativeCameraProvider {
    fn open(&self, device_index: u32) -> Result<Box<dyn CameraHandle>, ApplicationError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(device_index), requested).map_err(
            |error| {
                ApplicationError::DeviceUnavailable(format!(
                    "failed to open camera {device_index}: {error}"
                ))
            },
        )?;
        camera.open_stream().map_err(|error| {
            ApplicationError::DeviceUnavailable(format!(
                "camera {device_index} refused to stream: {error}"
            ))
        })?;
        debug!("opened camera {device_index} at {}", camera.resolution());
        Ok(Box::new(NativeCamera {
            index: device_index,
            camera,
        }))
    }
}

struct NativeCamera {
    index: u32,
    camera: Camera,
}

impl CameraHandle for NativeCamera {
    fn device_index(&self) -> u32 {
        self.index
    }

    fn read_frame(&mut self) -> Result<Frame, ApplicationError> {
        let image = self
            .camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>())
            .map_err(|error| {
                ApplicationError::ReadFailure(format!("camera {}: {error}", self.index))
            })?;
        let (width, height) = (image.width(), image.height());
        Frame::from_rgb(width, height, image.into_raw())
            .map_err(|error| ApplicationError::ReadFailure(error.to_string()))
    }

    fn close(mut self: Box<Self>) {
        if let Err(error) = self.camera.stop_stream() {
            warn!("camera {} did not stop cleanly: {error}", self.index);
        }
        debug!("closed camera {}", self.index);
    }
}

use log::debug;
use scopecap_application::{ApplicationError, CameraHandle, CameraProvider};
use scopecap_domain::Frame;

pub const DEFAULT_PATTERN_WIDTH: u32 = 640;
pub const DEFAULT_PATTERN_HEIGHT: u32 = 480;

/// Camera backend that renders a moving test pattern instead of talking to
/// hardware. Only the listed device indices open.
#[derive(Debug, Clone)]
pub struct PatternCameraProvider {
    devices: Vec<u32>,
    width: u32,
    height: u32,
}

impl PatternCameraProvider {
    pub fn new(devices: Vec<u32>) -> Self {
        Self {
            devices,
            width: DEFAULT_PATTERN_WIDTH,
            height: DEFAULT_PATTERN_HEIGHT,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl CameraProvider for PatternCameraProvider {
    fn open(&self, device_index: u32) -> Result<Box<dyn CameraHandle>, ApplicationError> {
        if !self.devices.contains(&device_index) {
            return Err(ApplicationError::DeviceUnavailable(format!(
                "failed to open camera {device_index}"
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ApplicationError::DeviceUnavailable(format!(
                "camera {device_index} reports an empty resolution"
            )));
        }
        debug!(
            "opened pattern camera {device_index} at {}x{}",
            self.width, self.height
        );
        Ok(Box::new(PatternCamera {
            index: device_index,
            width: self.width,
            height: self.height,
            tick: 0,
        }))
    }
}

#[derive(Debug)]
struct PatternCamera {
    index: u32,
    width: u32,
    height: u32,
    tick: u32,
}

impl CameraHandle for PatternCamera {
    fn device_index(&self) -> u32 {
        self.index
    }

    fn read_frame(&mut self) -> Result<Frame, ApplicationError> {
        let shift = self.tick;
        self.tick = self.tick.wrapping_add(1);
        let mut pixels = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push((x.wrapping_add(shift) % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push((self.index.wrapping_mul(64) % 256) as u8);
            }
        }
        Frame::from_rgb(self.width, self.height, pixels)
            .map_err(|error| ApplicationError::ReadFailure(error.to_string()))
    }

    fn close(self: Box<Self>) {
        debug!("closed pattern camera {}", self.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_listed_devices_open() {
        let provider = PatternCameraProvider::new(vec![0, 2]);
        assert!(provider.open(0).is_ok());
        assert!(matches!(
            provider.open(1),
            Err(ApplicationError::DeviceUnavailable(_))
        ));
        assert_eq!(provider.enumerate(4), vec![0, 2]);
    }

    #[test]
    fn frames_move_between_reads() {
        let provider = PatternCameraProvider::new(vec![0]).with_resolution(4, 3);
        let mut camera = provider.open(0).expect("open");

        let first = camera.read_frame().expect("frame");
        let second = camera.read_frame().expect("frame");

        assert_eq!((first.width(), first.height()), (4, 3));
        assert_eq!(first.pixels()[0], 0);
        assert_eq!(second.pixels()[0], 1);
        camera.close();
    }
}

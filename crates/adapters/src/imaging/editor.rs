use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::debug;
use scopecap_application::{ApplicationError, EditSession, ImageEditor};
use scopecap_domain::{clip_segment, resized_height, CropRect, Point, Stroke, ZoomLevel};

use super::{codec_error, decode_rgb, output_format};

/// Largest zoomed copy `save` will render, in pixels.
pub const MAX_DISPLAY_PIXELS: u64 = 1 << 28;

#[derive(Debug, Default)]
pub struct ImageCrateEditor;

impl ImageEditor for ImageCrateEditor {
    fn open(&self, path: &Path) -> Result<Box<dyn EditSession>, ApplicationError> {
        Ok(Box::new(ImageEditSession::open(path)?))
    }
}

/// Working copy of one image. Crop, strokes and resize change the buffer;
/// zoom only changes how big it is shown.
#[derive(Debug, Clone)]
pub struct ImageEditSession {
    source: PathBuf,
    buffer: RgbImage,
    zoom: ZoomLevel,
}

impl ImageEditSession {
    pub fn open(path: &Path) -> Result<Self, ApplicationError> {
        let buffer = decode_rgb(path)?;
        debug!(
            "opened {} for editing at {}x{}",
            path.display(),
            buffer.width(),
            buffer.height()
        );
        Ok(Self::from_buffer(path.to_path_buf(), buffer))
    }

    pub fn from_buffer(source: PathBuf, buffer: RgbImage) -> Self {
        Self {
            source,
            buffer,
            zoom: ZoomLevel::default(),
        }
    }

    pub fn buffer(&self) -> &RgbImage {
        &self.buffer
    }

    /// The buffer as shown at the current zoom. Fails with `InvalidInput`
    /// above `MAX_DISPLAY_PIXELS`.
    pub fn display_buffer(&self) -> Result<RgbImage, ApplicationError> {
        if self.zoom.is_identity() {
            return Ok(self.buffer.clone());
        }
        let (width, height) = self.display_dimensions();
        if u64::from(width) * u64::from(height) > MAX_DISPLAY_PIXELS {
            return Err(ApplicationError::InvalidInput(format!(
                "zoomed image would be {width}x{height}, zoom out before saving"
            )));
        }
        Ok(imageops::resize(&self.buffer, width, height, FilterType::Triangle))
    }

    fn stamp(&mut self, center: Point, radius: i64, color: Rgb<u8>) {
        let width = i64::from(self.buffer.width());
        let height = i64::from(self.buffer.height());
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius + radius {
                    continue;
                }
                let x = center.x + dx;
                let y = center.y + dy;
                if (0..width).contains(&x) && (0..height).contains(&y) {
                    self.buffer.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Walks the segment with Bresenham after clipping it to the canvas grown
    /// by `radius`, so only stamps that can touch a pixel are visited.
    fn draw_segment(&mut self, from: Point, to: Point, radius: i64, color: Rgb<u8>) {
        let min = Point::new(-radius, -radius);
        let max = Point::new(
            i64::from(self.buffer.width()) - 1 + radius,
            i64::from(self.buffer.height()) - 1 + radius,
        );
        let Some((from, to)) = clip_segment(from, to, min, max) else {
            return;
        };
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let step_x = if from.x < to.x { 1 } else { -1 };
        let step_y = if from.y < to.y { 1 } else { -1 };
        let mut error = dx + dy;
        let mut current = from;
        loop {
            self.stamp(current, radius, color);
            if current == to {
                break;
            }
            let doubled = 2 * error;
            if doubled >= dy {
                error += dy;
                current.x += step_x;
            }
            if doubled <= dx {
                error += dx;
                current.y += step_y;
            }
        }
    }
}

impl EditSession for ImageEditSession {
    fn source_path(&self) -> &Path {
        &self.source
    }

    fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    fn display_dimensions(&self) -> (u32, u32) {
        let (width, height) = self.buffer.dimensions();
        self.zoom.scale(width, height)
    }

    fn crop(&mut self, rect: CropRect) -> Result<(), ApplicationError> {
        let (width, height) = self.buffer.dimensions();
        let area = rect
            .clamp_to(width, height)
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;
        self.buffer =
            imageops::crop_imm(&self.buffer, area.x, area.y, area.width, area.height).to_image();
        Ok(())
    }

    fn draw_stroke(&mut self, stroke: &Stroke) -> Result<(), ApplicationError> {
        stroke
            .validate()
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;
        let radius = (i64::from(stroke.width) - 1) / 2;
        let color = Rgb(stroke.color);
        for (from, to) in stroke.segments() {
            self.draw_segment(from, to, radius, color);
        }
        Ok(())
    }

    fn resize_to_width(&mut self, new_width: u32) -> Result<(), ApplicationError> {
        let (width, height) = self.buffer.dimensions();
        let new_height = resized_height(width, height, new_width)
            .map_err(|error| ApplicationError::InvalidInput(error.to_string()))?;
        self.buffer = imageops::resize(&self.buffer, new_width, new_height, FilterType::Triangle);
        Ok(())
    }

    fn zoom_in(&mut self) {
        self.zoom.zoom_in();
    }

    fn zoom_out(&mut self) {
        self.zoom.zoom_out();
    }

    fn save(&self, path: &Path, at_display_scale: bool) -> Result<(), ApplicationError> {
        let format = output_format(path)?;
        let result = if at_display_scale {
            self.display_buffer()?.save_with_format(path, format)
        } else {
            self.buffer.save_with_format(path, format)
        };
        result.map_err(|error| codec_error(path, error))?;
        debug!("saved edited image to {}", path.display());
        Ok(())
    }
}

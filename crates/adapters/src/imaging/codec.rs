use std::path::Path;

use image::RgbImage;
use scopecap_application::{ApplicationError, ImageCodec};
use scopecap_domain::Frame;

use super::{codec_error, decode_rgb, output_format};

#[derive(Debug, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn write_frame(&self, frame: &Frame, path: &Path) -> Result<(), ApplicationError> {
        let format = output_format(path)?;
        let buffer = RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
            .ok_or_else(|| {
                ApplicationError::Codec(format!(
                    "frame buffer does not match {}x{}",
                    frame.width(),
                    frame.height()
                ))
            })?;
        buffer
            .save_with_format(path, format)
            .map_err(|error| codec_error(path, error))
    }
}

/// Decodes any supported image file into an RGB frame.
pub fn read_frame(path: &Path) -> Result<Frame, ApplicationError> {
    let image = decode_rgb(path)?;
    let (width, height) = image.dimensions();
    Ok(Frame::from_rgb(width, height, image.into_raw())?)
}

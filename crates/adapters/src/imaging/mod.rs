mod codec;
mod editor;

pub use codec::{read_frame, ImageCrateCodec};
pub use editor::{ImageCrateEditor, ImageEditSession};

use std::path::Path;

use image::{ImageFormat, ImageReader, RgbImage};
use scopecap_application::ApplicationError;
use scopecap_domain::{detect_image_kind, ImageKind};

fn output_format(path: &Path) -> Result<ImageFormat, ApplicationError> {
    match detect_image_kind(path) {
        Some(ImageKind::Png) => Ok(ImageFormat::Png),
        Some(ImageKind::Jpeg) => Ok(ImageFormat::Jpeg),
        Some(ImageKind::Bmp) => Ok(ImageFormat::Bmp),
        Some(ImageKind::Gif) => Ok(ImageFormat::Gif),
        None => Err(ApplicationError::InvalidInput(format!(
            "cannot tell image format from {}",
            path.display()
        ))),
    }
}

fn codec_error(path: &Path, error: image::ImageError) -> ApplicationError {
    match error {
        image::ImageError::IoError(error) => io_error(path, error),
        other => ApplicationError::Codec(format!("{}: {other}", path.display())),
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ApplicationError {
    ApplicationError::Io(format!("{}: {error}", path.display()))
}

/// Decodes a file of any supported format into an RGB buffer. The format is
/// sniffed from the content, not the extension.
fn decode_rgb(path: &Path) -> Result<RgbImage, ApplicationError> {
    Ok(ImageReader::open(path)
        .map_err(|error| io_error(path, error))?
        .with_guessed_format()
        .map_err(|error| io_error(path, error))?
        .decode()
        .map_err(|error| codec_error(path, error))?
        .to_rgb8())
}

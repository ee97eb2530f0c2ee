use std::path::Path;

use chrono::NaiveDateTime;

use crate::DomainError;

/// Format of the timestamp prefix of captured file names.
pub const CAPTURE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Bmp,
    Gif,
}

impl ImageKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }
}

pub fn detect_image_kind(path: &Path) -> Option<ImageKind> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageKind::from_extension)
}

pub fn is_recognized_image(file_name: &str) -> bool {
    detect_image_kind(Path::new(file_name)).is_some()
}

/// Builds `{YYYYMMDD}-{HHMMSS}-{sequence:05}.{ext}`.
pub fn capture_file_name(
    taken_at: NaiveDateTime,
    sequence: u32,
    extension: &str,
) -> Result<String, DomainError> {
    if sequence == 0 {
        return Err(DomainError::InvalidSequence(sequence));
    }
    if ImageKind::from_extension(extension).is_none() {
        return Err(DomainError::UnrecognizedExtension(extension.to_string()));
    }
    Ok(format!(
        "{}-{sequence:05}.{extension}",
        taken_at.format(CAPTURE_TIMESTAMP_FORMAT)
    ))
}

/// A single RGB8 frame grabbed from a camera, row-major, no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::ZeroDimension);
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(DomainError::FrameSizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

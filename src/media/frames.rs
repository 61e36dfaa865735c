use image::RgbImage;
use std::path::Path;

use crate::errors::FrameError;

// @module: Decoded frame images

/// A decoded frame that can be written to disk
pub trait FrameImage {
    /// Encode the frame to `path`; the extension selects the format
    fn save(&self, path: &Path) -> Result<(), FrameError>;
}

// @struct: Packed 8-bit RGB frame
#[derive(Debug, Clone)]
pub struct RgbFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbFrame {
    /// Wrap a packed RGB buffer; returns None when the size does not match
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != Self::byte_len(width, height) {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Size in bytes of one packed RGB frame
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl FrameImage for RgbFrame {
    fn save(&self, path: &Path) -> Result<(), FrameError> {
        let save_error = |message: String| FrameError::Save {
            path: path.to_path_buf(),
            message,
        };

        let image = RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| save_error("pixel buffer does not match frame size".to_string()))?;

        image.save(path).map_err(|e| save_error(e.to_string()))
    }
}

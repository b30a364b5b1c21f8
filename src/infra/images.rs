//! Production image pipeline: decode, resize to a fixed square, encode PNG.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;

use crate::application::images::{IMAGE_EDGE, ImageError, ImageProcessor};

pub struct PngScaler {
    edge: u32,
}

impl PngScaler {
    pub fn new() -> Self {
        Self { edge: IMAGE_EDGE }
    }
}

impl Default for PngScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageProcessor for PngScaler {
    fn process(&self, data: &[u8]) -> Result<Bytes, ImageError> {
        let decoded = image::load_from_memory(data).map_err(|_| ImageError::Malformed)?;
        let resized = decoded.resize_exact(self.edge, self.edge, FilterType::Triangle);

        let mut buffer = Cursor::new(Vec::new());
        resized
            .write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|err| ImageError::Encoding(err.to_string()))?;
        Ok(Bytes::from(buffer.into_inner()))
    }
}

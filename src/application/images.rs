//! Image-processing collaborator seam.
//!
//! Uploaded avatars and covers pass through an [`ImageProcessor`] that must
//! yield a 250×250 PNG buffer. The production implementation lives in
//! `infra::images`; tests substitute a stub.

use bytes::Bytes;
use thiserror::Error;

pub const IMAGE_EDGE: u32 = 250;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported or corrupt image data")]
    Malformed,
    #[error("image encoding failed: {0}")]
    Encoding(String),
}

pub trait ImageProcessor: Send + Sync {
    /// Decode `data`, resize to [`IMAGE_EDGE`]², and encode as PNG.
    fn process(&self, data: &[u8]) -> Result<Bytes, ImageError>;
}

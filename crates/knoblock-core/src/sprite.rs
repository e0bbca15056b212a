#![forbid(unsafe_code)]

//! Sprite sheet decoding and frame extraction.
//!
//! A sheet is a single horizontal strip of square frames: frame `i` is the
//! region `[i * frame_size, 0, frame_size, frame_size]`. The frame count is
//! derived from the strip geometry (`width / height`), so a malformed image
//! whose width is not a multiple of its height is rejected at construction.
//!
//! Decoding failures are recoverable I/O errors; an out-of-range frame
//! index is a caller bug and asserts.

use image::{RgbaImage, imageops};
use std::sync::Arc;

/// A horizontal strip of equal-width square frames.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pixels: RgbaImage,
    frame_size: u32,
    frame_count: u32,
}

impl SpriteSheet {
    /// Decode a sheet from encoded image bytes (PNG).
    pub fn from_bytes(bytes: &[u8]) -> Result<Arc<Self>, SpriteError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_image(decoded.to_rgba8())
    }

    /// Build a sheet from an already-decoded RGBA strip.
    pub fn from_image(pixels: RgbaImage) -> Result<Arc<Self>, SpriteError> {
        let frame_size = pixels.height();
        if frame_size == 0 || pixels.width() % frame_size != 0 {
            return Err(SpriteError::NotAStrip {
                width: pixels.width(),
                height: pixels.height(),
            });
        }
        let frame_count = pixels.width() / frame_size;
        Ok(Arc::new(Self {
            pixels,
            frame_size,
            frame_count,
        }))
    }

    /// Build an all-transparent sheet. Used by headless embeddings and
    /// tests that never present pixels anywhere.
    #[must_use]
    pub fn blank(frame_size: u32, frame_count: u32) -> Arc<Self> {
        assert!(frame_size > 0, "frame size must be non-zero");
        assert!(frame_count > 0, "frame count must be non-zero");
        Arc::new(Self {
            pixels: RgbaImage::new(frame_size * frame_count, frame_size),
            frame_size,
            frame_count,
        })
    }

    /// Number of frames in the strip.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Side length of one (square) frame, in pixels.
    #[inline]
    #[must_use]
    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    /// Copy frame `index` out of the strip.
    ///
    /// # Panics
    /// Panics if `index >= frame_count()` — an out-of-range frame is a
    /// caller-side contract breach, not a runtime condition.
    #[must_use]
    pub fn frame(&self, index: u32) -> RgbaImage {
        assert!(
            index < self.frame_count,
            "frame index {index} out of range (count {})",
            self.frame_count
        );
        imageops::crop_imm(
            &self.pixels,
            index * self.frame_size,
            0,
            self.frame_size,
            self.frame_size,
        )
        .to_image()
    }
}

/// Errors raised while building a sprite sheet.
#[derive(Debug)]
pub enum SpriteError {
    /// The image bytes could not be decoded.
    Decode(image::ImageError),
    /// The decoded image is not a horizontal strip of square frames.
    NotAStrip { width: u32, height: u32 },
}

impl From<image::ImageError> for SpriteError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err)
    }
}

impl std::fmt::Display for SpriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "sprite decode error: {err}"),
            Self::NotAStrip { width, height } => {
                write!(f, "{width}x{height} image is not a square-frame strip")
            }
        }
    }
}

impl std::error::Error for SpriteError {}

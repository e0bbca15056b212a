#![forbid(unsafe_code)]

//! Animated element: a state→visual projector.
//!
//! An [`AnimatedElement`] pairs a shared [`SpriteSheet`] with one display
//! [`Surface`] and remembers which frame is currently shown. It has no
//! timing of its own — [`crate::Animation`] (or anything else) tells it
//! which frame to show and it crops and presents that region.

use std::sync::Arc;

use crate::host::Surface;
use crate::sprite::SpriteSheet;

/// One displayable element showing a single frame of a sprite sheet.
pub struct AnimatedElement {
    sheet: Arc<SpriteSheet>,
    surface: Box<dyn Surface>,
    frame: u32,
}

impl std::fmt::Debug for AnimatedElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedElement")
            .field("frame", &self.frame)
            .field("frame_count", &self.sheet.frame_count())
            .finish_non_exhaustive()
    }
}

impl AnimatedElement {
    /// Create an element showing `initial_frame` on the given surface.
    ///
    /// # Panics
    /// Panics if `initial_frame` is out of range for the sheet.
    #[must_use]
    pub fn new(sheet: Arc<SpriteSheet>, initial_frame: u32, surface: Box<dyn Surface>) -> Self {
        let mut element = Self {
            sheet,
            surface,
            frame: 0,
        };
        element.set_frame(initial_frame);
        element
    }

    /// Show frame `frame`, presenting the cropped region to the surface.
    ///
    /// # Panics
    /// Panics if `frame >= frame_count()`.
    pub fn set_frame(&mut self, frame: u32) {
        assert!(
            frame < self.sheet.frame_count(),
            "frame {frame} out of range (count {})",
            self.sheet.frame_count()
        );
        self.frame = frame;
        self.surface.present(&self.sheet.frame(frame));
    }

    /// The currently shown frame.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Number of frames the backing sheet holds.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.sheet.frame_count()
    }
}

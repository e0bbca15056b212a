#![forbid(unsafe_code)]

//! Contracts toward the rendering toolkit.
//!
//! The engine never talks to a widget toolkit directly. It needs exactly
//! two things from one: somewhere to put pixels ([`Surface`]) and a
//! two-dimensional cell container that hands out surfaces at grid
//! coordinates ([`GridHost`]). Click handling is deliberately absent —
//! the host resolves an activation to a `(col, row)` coordinate and the
//! caller routes it into the engine, so no visual element ever stores a
//! callback into engine state.
//!
//! [`HeadlessGrid`] is the toolkit-free implementation used by tests and
//! by embeddings that only care about logical state.

use image::RgbaImage;

/// A display target for one element's current frame.
pub trait Surface {
    /// Show the given frame pixels. Called once per frame change.
    fn present(&mut self, frame: &RgbaImage);
}

/// A two-dimensional cell container the engine populates with elements.
///
/// `clear` and `place` bracket a rebuild: the engine clears the host, then
/// places one surface per visual element. Row 0 holds the locks; rows
/// `1..=size` hold the knob grid.
pub trait GridHost {
    /// Drop all placed surfaces (board rebuild or resize).
    fn clear(&mut self);

    /// Create a surface for the cell at `(col, row)`.
    fn place(&mut self, col: u32, row: u32) -> Box<dyn Surface>;
}

/// A surface that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn present(&mut self, _frame: &RgbaImage) {}
}

/// A grid host with no toolkit behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessGrid;

impl GridHost for HeadlessGrid {
    fn clear(&mut self) {}

    fn place(&mut self, _col: u32, _row: u32) -> Box<dyn Surface> {
        Box::new(NullSurface)
    }
}

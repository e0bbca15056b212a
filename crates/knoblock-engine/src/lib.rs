#![forbid(unsafe_code)]

//! Engine: the knoblock puzzle state machine.
//!
//! # Role in knoblock
//! `knoblock-engine` owns the grid of knobs and locks, the cascading
//! toggle algorithm, the undo/redo history, the animation queue, and the
//! elapsed-time clock. A periodic external tick (the host's timer, target
//! ~20ms) drives [`Puzzle::update`]; everything else happens synchronously
//! inside [`Puzzle::turn_knob`], [`Puzzle::undo`], [`Puzzle::redo`], and
//! [`Puzzle::reset`].
//!
//! # Primary responsibilities
//! - **Board**: knob/lock state, cascade, field generation.
//! - **History**: linear undo/redo with branch-discarding.
//! - **Puzzle**: busy/solved gating and the spent-time clock.
//!
//! # How it fits in the system
//! Visuals come from `knoblock-core`; the engine only ever sees the
//! [`knoblock_core::GridHost`] contract, so it runs identically under a
//! real toolkit or [`knoblock_core::HeadlessGrid`].

pub mod board;
pub mod clock;
pub mod puzzle;
pub mod undo;

pub use board::{Board, MAX_SIZE, MIN_SIZE};
pub use clock::format_clock;
pub use puzzle::{Puzzle, PuzzleCmd};
pub use undo::{Command, History};

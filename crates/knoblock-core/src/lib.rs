#![forbid(unsafe_code)]

//! Core: visual and timing primitives for the knoblock puzzle.
//!
//! # Role in knoblock
//! `knoblock-core` is the leaf layer. It knows nothing about grids, locks,
//! or history — it owns sprite-sheet decoding, the frame-projecting
//! [`element::AnimatedElement`], and the [`animation::Animation`] tween that
//! drives one element between two frames over time.
//!
//! # Primary responsibilities
//! - **SpriteSheet**: decode a horizontal strip of square frames and
//!   extract frame `i` as an addressable region.
//! - **AnimatedElement**: project a discrete frame index onto a display
//!   [`host::Surface`].
//! - **Animation**: delay + duration linear interpolation between two
//!   frames, advanced by an external tick.
//! - **Host traits**: the narrow contracts the engine needs from a
//!   rendering toolkit, plus a headless stand-in.
//!
//! # How it fits in the system
//! The engine (`knoblock-engine`) owns collections of elements and live
//! animations and ticks them from its `update(dt)`; this crate never reads
//! a clock on its own.

pub mod animation;
pub mod element;
pub mod host;
pub mod sprite;

pub use animation::Animation;
pub use element::AnimatedElement;
pub use host::{GridHost, HeadlessGrid, NullSurface, Surface};
pub use sprite::{SpriteError, SpriteSheet};

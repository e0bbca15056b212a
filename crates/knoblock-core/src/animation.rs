#![forbid(unsafe_code)]

//! Frame tween: a time-driven linear interpolation between two frames.
//!
//! An [`Animation`] waits `delay`, then sweeps a target element from
//! `start_frame` to `end_frame` over `duration`. It is advanced purely by
//! [`Animation::update`] calls carrying a time delta — there is no
//! internal clock.
//!
//! # Invariants
//!
//! 1. The interpolation factor for a tick is computed from the elapsed
//!    time *before* that tick's delta is accumulated. The first call sees
//!    `elapsed == 0`, so an animation observably finishes one tick after
//!    `delay + duration` has accumulated — callers and tests rely on this
//!    exact accounting.
//! 2. At `elapsed == delay` the shown frame is `start_frame` (the strict
//!    `>` comparison keeps the boundary on the idle side).
//! 3. Once the factor exceeds 1 the target snaps to `end_frame` and the
//!    animation reports finished; it is then pruned by its owner, so a
//!    finished animation is never ticked again.
//! 4. Increasing and decreasing frame ranges interpolate asymmetrically:
//!    `start + floor((end-start)*factor)` going up,
//!    `end + floor((start-end)*(1-factor))` going down. Both directions of
//!    a toggle animate correctly through the same code path only because
//!    of this pairing; do not "simplify" it.
//!
//! # Failure Modes
//!
//! - Oversized delta: a large `dt` fast-forwards the animation; the next
//!   call snaps to `end_frame` and finishes. No wall-clock drift handling
//!   beyond that.

use std::time::Duration;

use crate::element::AnimatedElement;

/// A linear frame sweep over one target element.
#[derive(Debug, Clone)]
pub struct Animation {
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
    start_frame: u32,
    end_frame: u32,
}

impl Animation {
    /// Create a tween from `start_frame` to `end_frame`, starting after
    /// `delay` and sweeping over `duration`.
    ///
    /// # Panics
    /// Panics if `duration` is zero.
    #[must_use]
    pub fn new(delay: Duration, duration: Duration, start_frame: u32, end_frame: u32) -> Self {
        assert!(!duration.is_zero(), "animation duration must be non-zero");
        Self {
            delay,
            duration,
            elapsed: Duration::ZERO,
            start_frame,
            end_frame,
        }
    }

    /// Advance by `dt`, applying the current frame to `target`.
    ///
    /// Returns `true` when the sweep has completed (the target has been
    /// snapped to the end frame); the animation should then be discarded.
    pub fn update(&mut self, dt: Duration, target: &mut AnimatedElement) -> bool {
        let factor = if self.elapsed > self.delay {
            (self.elapsed - self.delay).as_secs_f32() / self.duration.as_secs_f32()
        } else {
            0.0
        };
        if factor > 1.0 {
            target.set_frame(self.end_frame);
            return true;
        }
        let frame = if self.end_frame > self.start_frame {
            self.start_frame + ((self.end_frame - self.start_frame) as f32 * factor) as u32
        } else {
            self.end_frame + ((self.start_frame - self.end_frame) as f32 * (1.0 - factor)) as u32
        };
        target.set_frame(frame);
        self.elapsed += dt;
        false
    }
}

#![forbid(unsafe_code)]

//! Grid state and the cascading toggle algorithm.
//!
//! A [`Board`] owns the N×N knobs, the N per-column locks, the visual
//! elements behind them, and the queue of live animations. Logical state
//! (the `checked`/`locked` flags) flips immediately inside the cascade;
//! animations are purely cosmetic lag and never gate correctness.
//!
//! # Invariants
//!
//! 1. `knobs.len() == size²`, `locks.len() == size` after every rebuild.
//! 2. A lock's `locked` flag is always `!(all knobs in its column
//!    checked)` after a cascade completes.
//! 3. Field generation never produces a fully-checked column, so a fresh
//!    board is never pre-solved.
//! 4. At most one live animation per element under correct use: the
//!    engine refuses input while any animation is in flight, and one
//!    cascade touches each element at most once.

use std::sync::Arc;
use std::time::Duration;

use knoblock_core::{AnimatedElement, Animation, GridHost, SpriteSheet};
use rand::Rng;
use tracing::trace;

/// Smallest playable grid edge.
pub const MIN_SIZE: u32 = 4;
/// Largest playable grid edge.
pub const MAX_SIZE: u32 = 10;

/// Delay unit between neighbouring cells in a cascade.
pub(crate) const ANIMATION_DELAY: Duration = Duration::from_millis(150);
/// Sweep time of a single toggle animation.
pub(crate) const ANIMATION_DURATION: Duration = Duration::from_millis(250);

// Knob sheets carry three frame bands: checked rests at the start frame,
// unchecked at the middle, and the end frame closes the unchecked->checked
// sweep (visually identical to the start frame).
const KNOB_START_FRAME: u32 = 0;
const KNOB_MIDDLE_FRAME: u32 = 6;
const KNOB_END_FRAME: u32 = 12;

const LOCK_START_FRAME: u32 = 0;
const LOCK_END_FRAME: u32 = 6;

/// Minimum frame count a knob sheet must carry.
pub const KNOB_FRAME_COUNT: u32 = KNOB_END_FRAME + 1;
/// Minimum frame count a lock sheet must carry.
pub const LOCK_FRAME_COUNT: u32 = LOCK_END_FRAME + 1;

/// Index of an element in the board's element slab.
///
/// Animations hold these instead of references to the long-lived grid
/// elements, so the live-animation queue owns nothing it must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ElementId(usize);

#[derive(Debug)]
struct Knob {
    element: ElementId,
    checked: bool,
}

#[derive(Debug)]
struct Lock {
    element: ElementId,
    locked: bool,
}

/// A queued animation paired with its target element.
struct Live {
    animation: Animation,
    target: ElementId,
}

/// The N×N knob grid, its locks, and their in-flight animations.
pub struct Board {
    size: u32,
    knobs: Vec<Knob>,
    locks: Vec<Lock>,
    elements: Vec<AnimatedElement>,
    animations: Vec<Live>,
    knob_sheet: Arc<SpriteSheet>,
    lock_sheet: Arc<SpriteSheet>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("size", &self.size)
            .field("knobs", &self.knobs.len())
            .field("locks", &self.locks.len())
            .field("live_animations", &self.animations.len())
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Create an empty board over the given sprite sheets.
    ///
    /// The board holds no cells until [`Board::rebuild`] runs.
    ///
    /// # Panics
    /// Panics if either sheet carries fewer frames than its sweep needs
    /// ([`KNOB_FRAME_COUNT`] / [`LOCK_FRAME_COUNT`]).
    #[must_use]
    pub fn new(knob_sheet: Arc<SpriteSheet>, lock_sheet: Arc<SpriteSheet>) -> Self {
        assert!(
            knob_sheet.frame_count() >= KNOB_FRAME_COUNT,
            "knob sheet needs at least {KNOB_FRAME_COUNT} frames, got {}",
            knob_sheet.frame_count()
        );
        assert!(
            lock_sheet.frame_count() >= LOCK_FRAME_COUNT,
            "lock sheet needs at least {LOCK_FRAME_COUNT} frames, got {}",
            lock_sheet.frame_count()
        );
        Self {
            size: 0,
            knobs: Vec::new(),
            locks: Vec::new(),
            elements: Vec::new(),
            animations: Vec::new(),
            knob_sheet,
            lock_sheet,
        }
    }

    /// Grid edge length (0 before the first rebuild).
    #[inline]
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Whether any animation is still playing.
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Whether every lock is open.
    ///
    /// This is the raw flag check; the solved/busy interaction lives in
    /// [`crate::Puzzle::is_solved`].
    #[must_use]
    pub fn all_unlocked(&self) -> bool {
        self.locks.iter().all(|lock| !lock.locked)
    }

    /// Number of knobs (`size²`).
    #[must_use]
    pub fn knob_count(&self) -> usize {
        self.knobs.len()
    }

    /// Number of locks (`size`).
    #[must_use]
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// The `checked` flag of the knob at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    #[must_use]
    pub fn knob_checked(&self, x: u32, y: u32) -> bool {
        assert!(x < self.size && y < self.size, "knob ({x},{y}) out of range");
        self.knobs[(y * self.size + x) as usize].checked
    }

    /// The `locked` flag of column `x`'s lock.
    ///
    /// # Panics
    /// Panics if `x` is out of range.
    #[must_use]
    pub fn lock_locked(&self, x: u32) -> bool {
        assert!(x < self.size, "lock {x} out of range");
        self.locks[x as usize].locked
    }

    /// Snapshot of all knob flags in row-major order. Cheap; used by the
    /// reversibility tests to compare exact states.
    #[must_use]
    pub fn knob_states(&self) -> Vec<bool> {
        self.knobs.iter().map(|knob| knob.checked).collect()
    }

    /// Snapshot of all lock flags, left to right.
    #[must_use]
    pub fn lock_states(&self) -> Vec<bool> {
        self.locks.iter().map(|lock| lock.locked).collect()
    }

    /// Tear down and re-randomize the grid at the given size.
    ///
    /// Clears all cells and live animations, re-places every element on
    /// the host (locks on row 0, knobs below), and guarantees the new
    /// field is not already solved: a randomized column that comes out
    /// fully checked gets one random knob flipped back.
    ///
    /// # Panics
    /// Panics if `size` is outside `[MIN_SIZE, MAX_SIZE]`.
    pub fn rebuild(&mut self, size: u32, host: &mut dyn GridHost, rng: &mut impl Rng) {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "size {size} outside [{MIN_SIZE}, {MAX_SIZE}]"
        );

        self.animations.clear();
        self.knobs.clear();
        self.locks.clear();
        self.elements.clear();
        host.clear();

        self.size = size;
        self.generate_field(host, rng);
    }

    fn generate_field(&mut self, host: &mut dyn GridHost, rng: &mut impl Rng) {
        let size = self.size;
        self.knobs.reserve((size * size) as usize);
        // Flags are decided column by column before any visuals exist, so a
        // fully-checked column can still be retouched.
        let mut checked = vec![false; (size * size) as usize];

        for ix in 0..size {
            let mut column_checked = true;
            for iy in 0..size {
                let value = rng.random_bool(0.5);
                checked[(iy * size + ix) as usize] = value;
                column_checked = column_checked && value;
            }
            // A fully-checked column would start unlocked; flip one knob
            // back so the puzzle is never trivially pre-solved.
            if column_checked {
                let iy = rng.random_range(0..size);
                let index = (iy * size + ix) as usize;
                checked[index] = !checked[index];
            }
        }

        for ix in 0..size {
            let element = self.add_element(
                Arc::clone(&self.lock_sheet),
                LOCK_START_FRAME,
                host.place(ix, 0),
            );
            self.locks.push(Lock {
                element,
                locked: true,
            });
        }
        for iy in 0..size {
            for ix in 0..size {
                let value = checked[(iy * size + ix) as usize];
                let element = self.add_element(
                    Arc::clone(&self.knob_sheet),
                    if value { KNOB_START_FRAME } else { KNOB_MIDDLE_FRAME },
                    host.place(ix, iy + 1),
                );
                self.knobs.push(Knob {
                    element,
                    checked: value,
                });
            }
        }
    }

    fn add_element(
        &mut self,
        sheet: Arc<SpriteSheet>,
        frame: u32,
        surface: Box<dyn knoblock_core::Surface>,
    ) -> ElementId {
        self.elements.push(AnimatedElement::new(sheet, frame, surface));
        ElementId(self.elements.len() - 1)
    }

    /// Run the cascade triggered by activating the knob at `(x, y)`.
    ///
    /// Toggles the activated knob with zero delay, every other knob in its
    /// row and column with a delay proportional to its distance along that
    /// axis, then re-derives every lock, animating the ones that changed
    /// with a shared delay proportional to the activated cell's farthest
    /// sweep distance.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    pub fn turn_knob_action(&mut self, x: u32, y: u32) {
        assert!(x < self.size && y < self.size, "knob ({x},{y}) out of range");
        let size = self.size;

        // Start from the activated knob.
        let center = (y * size + x) as usize;
        self.toggle_knob(center, Duration::ZERO);
        // Sweep the rest of its row and column. The two index sets only
        // intersect at the excluded center, so no knob toggles twice.
        for i in 0..size {
            let horizontal = (y * size + i) as usize;
            if horizontal != center {
                self.toggle_knob(horizontal, distance(x, i) * ANIMATION_DELAY);
            }
            let vertical = (i * size + x) as usize;
            if vertical != center {
                self.toggle_knob(vertical, distance(y, i) * ANIMATION_DELAY);
            }
        }

        // All lock reactions share one delay: roughly when the cascade has
        // finished sweeping to the farthest edge. Saturating keeps the
        // formula total, though legal sizes never reach the clamp.
        let spread = distance(x, 0)
            .max(distance(x, size - 1))
            .max(distance(y, 0))
            .max(distance(y, size - 1));
        let lock_delay = spread.saturating_sub(1) * ANIMATION_DELAY;

        for ix in 0..size {
            let unlocked = (0..size).all(|iy| self.knobs[(iy * size + ix) as usize].checked);
            if self.locks[ix as usize].locked != !unlocked {
                self.toggle_lock(ix as usize, lock_delay);
            }
        }
        trace!(x, y, live = self.animations.len(), "cascade");
    }

    fn toggle_knob(&mut self, index: usize, delay: Duration) {
        let knob = &mut self.knobs[index];
        // Checked rests at the start band and sweeps to the middle;
        // unchecked rests at the middle and sweeps to the end.
        let (start, end) = if knob.checked {
            (KNOB_START_FRAME, KNOB_MIDDLE_FRAME)
        } else {
            (KNOB_MIDDLE_FRAME, KNOB_END_FRAME)
        };
        self.animations.push(Live {
            animation: Animation::new(delay, ANIMATION_DURATION, start, end),
            target: knob.element,
        });
        knob.checked = !knob.checked;
    }

    fn toggle_lock(&mut self, index: usize, delay: Duration) {
        let lock = &mut self.locks[index];
        let (start, end) = if lock.locked {
            (LOCK_START_FRAME, LOCK_END_FRAME)
        } else {
            (LOCK_END_FRAME, LOCK_START_FRAME)
        };
        self.animations.push(Live {
            animation: Animation::new(delay, ANIMATION_DURATION, start, end),
            target: lock.element,
        });
        lock.locked = !lock.locked;
    }

    /// Advance every live animation by `dt`, pruning finished ones.
    ///
    /// Removal is unordered (`swap_remove`) — ordering among concurrently
    /// playing animations is not observable.
    pub fn step(&mut self, dt: Duration) {
        let mut i = 0;
        while i < self.animations.len() {
            let live = &mut self.animations[i];
            let target = &mut self.elements[live.target.0];
            if live.animation.update(dt, target) {
                self.animations.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Absolute distance between two axis indices.
fn distance(a: u32, b: u32) -> u32 {
    a.abs_diff(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use knoblock_core::HeadlessGrid;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn board(size: u32, seed: u64) -> Board {
        let mut board = Board::new(
            SpriteSheet::blank(8, KNOB_FRAME_COUNT),
            SpriteSheet::blank(8, LOCK_FRAME_COUNT),
        );
        board.rebuild(size, &mut HeadlessGrid, &mut SmallRng::seed_from_u64(seed));
        board
    }

    fn settle(board: &mut Board) {
        board.step(Duration::from_secs(60));
        board.step(Duration::from_secs(1));
        assert!(!board.is_busy());
    }

    #[test]
    fn rebuild_shapes_the_grid() {
        for size in MIN_SIZE..=MAX_SIZE {
            let board = board(size, 7);
            assert_eq!(board.knob_count(), (size * size) as usize);
            assert_eq!(board.lock_count(), size as usize);
            assert!(!board.is_busy());
        }
    }

    #[test]
    fn generation_never_yields_a_checked_column() {
        for seed in 0..40 {
            for size in MIN_SIZE..=MAX_SIZE {
                let board = board(size, seed);
                for ix in 0..size {
                    assert!(
                        (0..size).any(|iy| !board.knob_checked(ix, iy)),
                        "fully-checked column {ix} at size {size}, seed {seed}"
                    );
                    assert!(board.lock_locked(ix));
                }
                assert!(!board.all_unlocked());
            }
        }
    }

    #[test]
    fn cascade_toggles_row_and_column_once() {
        let mut board = board(5, 3);
        let before = board.knob_states();

        board.turn_knob_action(2, 1);

        for y in 0..5 {
            for x in 0..5 {
                let index = (y * 5 + x) as usize;
                let expected = if x == 2 || y == 1 {
                    !before[index]
                } else {
                    before[index]
                };
                assert_eq!(board.knob_checked(x, y), expected, "knob ({x},{y})");
            }
        }
    }

    #[test]
    fn cascade_queues_one_animation_per_touched_cell() {
        let mut board = board(6, 11);
        let locks_before = board.lock_states();

        board.turn_knob_action(3, 2);

        let lock_changes = board
            .lock_states()
            .iter()
            .zip(&locks_before)
            .filter(|(a, b)| a != b)
            .count();
        // 2N-1 knobs in the activated row and column, plus one animation
        // per flipped lock.
        assert_eq!(board.animations.len(), 11 + lock_changes);
        assert!(board.is_busy());

        settle(&mut board);
    }

    #[test]
    fn cascade_is_self_inverse_on_flags() {
        let mut board = board(7, 21);
        let knobs = board.knob_states();
        let locks = board.lock_states();

        board.turn_knob_action(4, 5);
        settle(&mut board);
        board.turn_knob_action(4, 5);
        settle(&mut board);

        assert_eq!(board.knob_states(), knobs);
        assert_eq!(board.lock_states(), locks);
    }

    #[test]
    fn locks_track_column_state() {
        let mut board = board(4, 2);
        board.turn_knob_action(1, 1);
        settle(&mut board);

        for ix in 0..4 {
            let unlocked = (0..4).all(|iy| board.knob_checked(ix, iy));
            assert_eq!(board.lock_locked(ix), !unlocked, "lock {ix}");
        }
    }

    #[test]
    fn step_prunes_finished_animations() {
        let mut board = board(4, 5);
        board.turn_knob_action(0, 0);
        assert!(board.is_busy());

        // One oversized step fast-forwards every animation; the next tick
        // observes completion and prunes.
        board.step(Duration::from_secs(60));
        board.step(Duration::from_millis(20));
        assert!(!board.is_busy());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_coordinate_panics() {
        let mut board = board(4, 0);
        board.turn_knob_action(4, 0);
    }

    #[test]
    #[should_panic(expected = "size 3 outside [4, 10]")]
    fn rebuild_below_min_size_panics() {
        let mut board = board(4, 0);
        board.rebuild(3, &mut HeadlessGrid, &mut SmallRng::seed_from_u64(0));
    }

    #[test]
    #[should_panic(expected = "size 11 outside [4, 10]")]
    fn rebuild_above_max_size_panics() {
        let mut board = board(4, 0);
        board.rebuild(11, &mut HeadlessGrid, &mut SmallRng::seed_from_u64(0));
    }

    #[test]
    #[should_panic(expected = "knob sheet needs at least 13 frames")]
    fn short_knob_sheet_panics() {
        let _ = Board::new(SpriteSheet::blank(8, 12), SpriteSheet::blank(8, 7));
    }
}

#![forbid(unsafe_code)]

//! The puzzle facade: busy/solved gating, history routing, and the clock.
//!
//! [`Puzzle`] owns a [`Board`], the undo/redo [`History`], the grid host,
//! the RNG, and the spent-time accumulator. It is the only place input
//! gating happens:
//!
//! - `turn_knob`/`undo`/`redo` are ignored while any animation is in
//!   flight, so cascades can never interleave and corrupt history order
//!   or frame sequencing.
//! - `is_solved()` treats a busy board as unsolved, so victory is never
//!   declared mid-cascade even though the logical flags flip immediately.
//!
//! Time only advances inside [`Puzzle::update`], fed by an external
//! periodic tick (target ~20ms). The engine never reads a wall clock.

use std::sync::Arc;
use std::time::Duration;

use knoblock_core::{GridHost, HeadlessGrid, SpriteSheet};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;

use crate::board::{Board, KNOB_FRAME_COUNT, LOCK_FRAME_COUNT, MAX_SIZE, MIN_SIZE};
use crate::undo::{Command, History};

/// The single action kind the puzzle records: toggling a knob.
///
/// Toggling is a pure flip, so apply and revert are the same cascade —
/// the default [`Command::revert`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleCmd {
    TurnKnob { x: u32, y: u32 },
}

impl Command for PuzzleCmd {
    type Target = Board;

    fn apply(&self, board: &mut Board) {
        match *self {
            Self::TurnKnob { x, y } => board.turn_knob_action(x, y),
        }
    }
}

/// The knobs-and-locks puzzle engine.
pub struct Puzzle {
    board: Board,
    history: History<PuzzleCmd>,
    host: Box<dyn GridHost>,
    rng: SmallRng,
    spent: Duration,
}

impl std::fmt::Debug for Puzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puzzle")
            .field("board", &self.board)
            .field("undos", &self.history.undo_depth())
            .field("redos", &self.history.redo_depth())
            .field("spent", &self.spent)
            .finish_non_exhaustive()
    }
}

impl Puzzle {
    /// Create a puzzle over the given sprite sheets and grid host, with
    /// an OS-seeded RNG.
    ///
    /// # Panics
    /// Panics if `size` is outside `[MIN_SIZE, MAX_SIZE]` or a sheet is
    /// too short for its sweep.
    #[must_use]
    pub fn new(
        size: u32,
        knob_sheet: Arc<SpriteSheet>,
        lock_sheet: Arc<SpriteSheet>,
        host: Box<dyn GridHost>,
    ) -> Self {
        Self::with_rng(size, knob_sheet, lock_sheet, host, SmallRng::from_os_rng())
    }

    /// Create a puzzle with a caller-supplied RNG (deterministic boards
    /// for tests and replays).
    #[must_use]
    pub fn with_rng(
        size: u32,
        knob_sheet: Arc<SpriteSheet>,
        lock_sheet: Arc<SpriteSheet>,
        host: Box<dyn GridHost>,
        rng: SmallRng,
    ) -> Self {
        let mut puzzle = Self {
            board: Board::new(knob_sheet, lock_sheet),
            history: History::new(),
            host,
            rng,
            spent: Duration::ZERO,
        };
        puzzle.reset(size);
        puzzle
    }

    /// Create a toolkit-free puzzle with blank sheets and a seeded RNG.
    #[must_use]
    pub fn headless(size: u32, seed: u64) -> Self {
        Self::with_rng(
            size,
            SpriteSheet::blank(8, KNOB_FRAME_COUNT),
            SpriteSheet::blank(8, LOCK_FRAME_COUNT),
            Box::new(HeadlessGrid),
            SmallRng::seed_from_u64(seed),
        )
    }

    /// Tear down and re-randomize the board, clearing history and the
    /// clock.
    ///
    /// # Panics
    /// Panics if `size` is outside `[MIN_SIZE, MAX_SIZE]`.
    pub fn reset(&mut self, size: u32) {
        assert!(
            (MIN_SIZE..=MAX_SIZE).contains(&size),
            "size {size} outside [{MIN_SIZE}, {MAX_SIZE}]"
        );
        self.history.clear();
        self.board.rebuild(size, &mut *self.host, &mut self.rng);
        self.spent = Duration::ZERO;
        debug!(size, "reset");
    }

    /// Activate the knob at `(x, y)`.
    ///
    /// Ignored while busy — overlapping cascades would corrupt history
    /// and animation bookkeeping. Otherwise records a command (discarding
    /// pending redos) and runs the cascade.
    ///
    /// # Panics
    /// Panics if the coordinate is out of range.
    pub fn turn_knob(&mut self, x: u32, y: u32) {
        let size = self.board.size();
        assert!(x < size && y < size, "knob ({x},{y}) out of range");

        if self.is_busy() {
            return;
        }
        debug!(x, y, "turn knob");
        self.history
            .record(PuzzleCmd::TurnKnob { x, y }, &mut self.board);
    }

    /// Revert the most recent action. No-op while busy or with an empty
    /// undo stack.
    pub fn undo(&mut self) {
        if self.is_busy() {
            return;
        }
        if self.history.undo(&mut self.board) {
            debug!(redos = self.history.redo_depth(), "undo");
        }
    }

    /// Re-apply the most recently undone action. No-op while busy or with
    /// an empty redo stack.
    pub fn redo(&mut self) {
        if self.is_busy() {
            return;
        }
        if self.history.redo(&mut self.board) {
            debug!(undos = self.history.undo_depth(), "redo");
        }
    }

    /// Whether any action can be undone.
    #[must_use]
    pub fn has_undos(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether any undone action can be redone.
    #[must_use]
    pub fn has_redos(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether any animation is still playing. Busy gates all input.
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.board.is_busy()
    }

    /// Whether the puzzle is solved: every lock open and nothing still
    /// animating. A pending animation always reads as unsolved.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.is_busy() && self.board.all_unlocked()
    }

    /// Advance animations by `dt` and, while unsolved, the spent-time
    /// clock. The solved check runs after pruning, so the tick that
    /// completes the final cascade already stops the clock.
    pub fn update(&mut self, dt: Duration) {
        self.board.step(dt);
        if !self.is_solved() {
            self.spent += dt;
        }
    }

    /// Total unsolved play time.
    #[must_use]
    pub fn spent_time(&self) -> Duration {
        self.spent
    }

    /// Total unsolved play time in whole seconds.
    #[must_use]
    pub fn spent_time_secs(&self) -> u32 {
        self.spent.as_secs() as u32
    }

    /// Read access to the grid state.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(20);

    fn settle(puzzle: &mut Puzzle) {
        puzzle.update(Duration::from_secs(60));
        puzzle.update(TICK);
        assert!(!puzzle.is_busy());
    }

    #[test]
    fn reset_invariants_hold_for_all_sizes() {
        for size in MIN_SIZE..=MAX_SIZE {
            let puzzle = Puzzle::headless(size, 1);
            assert_eq!(puzzle.board().knob_count(), (size * size) as usize);
            assert_eq!(puzzle.board().lock_count(), size as usize);
            assert!(!puzzle.is_busy());
            assert!(!puzzle.is_solved());
            assert_eq!(puzzle.spent_time(), Duration::ZERO);
            assert!(!puzzle.has_undos());
            assert!(!puzzle.has_redos());
        }
    }

    #[test]
    #[should_panic(expected = "size 3 outside [4, 10]")]
    fn reset_below_min_size_panics() {
        let _ = Puzzle::headless(3, 0);
    }

    #[test]
    #[should_panic(expected = "size 11 outside [4, 10]")]
    fn reset_above_max_size_panics() {
        let mut puzzle = Puzzle::headless(4, 0);
        puzzle.reset(11);
    }

    #[test]
    fn input_is_ignored_while_busy() {
        let mut puzzle = Puzzle::headless(5, 9);
        puzzle.turn_knob(2, 2);
        let mid = puzzle.board().knob_states();
        assert!(puzzle.is_busy());

        // A second activation while busy must not cascade or record.
        puzzle.turn_knob(0, 0);
        assert_eq!(puzzle.board().knob_states(), mid);
        assert_eq!(puzzle.history.undo_depth(), 1);

        // Undo/redo are gated the same way.
        puzzle.undo();
        assert_eq!(puzzle.board().knob_states(), mid);
        assert!(puzzle.has_undos());

        settle(&mut puzzle);
        puzzle.turn_knob(0, 0);
        assert_eq!(puzzle.history.undo_depth(), 2);
    }

    #[test]
    fn undo_redo_restore_exact_states() {
        let mut puzzle = Puzzle::headless(6, 17);
        let initial_knobs = puzzle.board().knob_states();
        let initial_locks = puzzle.board().lock_states();

        puzzle.turn_knob(1, 4);
        settle(&mut puzzle);
        let after_knobs = puzzle.board().knob_states();
        let after_locks = puzzle.board().lock_states();

        puzzle.undo();
        settle(&mut puzzle);
        assert_eq!(puzzle.board().knob_states(), initial_knobs);
        assert_eq!(puzzle.board().lock_states(), initial_locks);

        puzzle.redo();
        settle(&mut puzzle);
        assert_eq!(puzzle.board().knob_states(), after_knobs);
        assert_eq!(puzzle.board().lock_states(), after_locks);
    }

    #[test]
    fn new_action_discards_redos() {
        let mut puzzle = Puzzle::headless(4, 3);
        puzzle.turn_knob(0, 1);
        settle(&mut puzzle);
        puzzle.undo();
        settle(&mut puzzle);
        assert!(puzzle.has_redos());

        puzzle.turn_knob(3, 3);
        assert!(!puzzle.has_redos());
    }

    #[test]
    fn clock_accumulates_while_unsolved() {
        let mut puzzle = Puzzle::headless(4, 5);
        for _ in 0..50 {
            puzzle.update(TICK);
        }
        assert_eq!(puzzle.spent_time(), Duration::from_secs(1));
        assert_eq!(puzzle.spent_time_secs(), 1);
    }

    #[test]
    fn seeded_boards_are_reproducible() {
        let a = Puzzle::headless(8, 1234);
        let b = Puzzle::headless(8, 1234);
        assert_eq!(a.board().knob_states(), b.board().knob_states());
    }
}

#![forbid(unsafe_code)]

//! History stacks for undo/redo operations.
//!
//! [`History`] maintains dual stacks of commands (newest at the back).
//!
//! # Invariants
//!
//! 1. Recording a new command clears the redo stack (no branching).
//! 2. `undo` moves the top of the undo stack to the redo stack and runs
//!    its revert action; `redo` is symmetric with the apply action.
//! 3. A command is owned by exactly one stack at a time.
//!
//! ```text
//! record(cmd3)
//! ┌───────────────────────────────────┐
//! │ Undos: [cmd1, cmd2, cmd3]         │
//! │ Redos: []                         │
//! └───────────────────────────────────┘
//!
//! undo() x2
//! ┌───────────────────────────────────┐
//! │ Undos: [cmd1]                     │
//! │ Redos: [cmd3, cmd2]               │
//! └───────────────────────────────────┘
//!
//! record(cmd4)  <-- new branch, clears redos
//! ┌───────────────────────────────────┐
//! │ Undos: [cmd1, cmd4]               │
//! │ Redos: []                         │
//! └───────────────────────────────────┘
//! ```
//!
//! Gating that is situational rather than structural — such as refusing
//! input while animations are in flight — belongs to the history's owner,
//! not here.

use super::command::Command;

/// Linear undo/redo history over commands of one type.
#[derive(Debug, Clone)]
pub struct History<C> {
    /// Commands available for undo (newest at the back).
    undos: Vec<C>,
    /// Commands available for redo (newest at the back).
    redos: Vec<C>,
}

impl<C> Default for History<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> History<C> {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            undos: Vec::new(),
            redos: Vec::new(),
        }
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undos.is_empty()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    /// Number of commands available for undo.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undos.len()
    }

    /// Number of commands available for redo.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redos.len()
    }

    /// Drop all history (both stacks).
    pub fn clear(&mut self) {
        self.undos.clear();
        self.redos.clear();
    }
}

impl<C: Command> History<C> {
    /// Execute `cmd` against `target` and push it onto the undo stack.
    ///
    /// Clears the redo stack first: recording starts a new branch and
    /// stale redos must not survive it.
    pub fn record(&mut self, cmd: C, target: &mut C::Target) {
        self.redos.clear();
        cmd.apply(target);
        self.undos.push(cmd);
    }

    /// Revert the most recent command, moving it to the redo stack.
    ///
    /// Returns `false` (and does nothing) if there is nothing to undo.
    pub fn undo(&mut self, target: &mut C::Target) -> bool {
        let Some(cmd) = self.undos.pop() else {
            return false;
        };
        cmd.revert(target);
        self.redos.push(cmd);
        true
    }

    /// Re-apply the most recently undone command, moving it back to the
    /// undo stack.
    ///
    /// Returns `false` (and does nothing) if there is nothing to redo.
    pub fn redo(&mut self, target: &mut C::Target) -> bool {
        let Some(cmd) = self.redos.pop() else {
            return false;
        };
        cmd.apply(target);
        self.undos.push(cmd);
        true
    }
}

#![forbid(unsafe_code)]

//! Undo/redo command history framework.
//!
//! Reversible operations for the puzzle, implemented as the Command
//! pattern over an explicit mutation target:
//!
//! - **Reversibility**: every command can be applied and reverted
//! - **Linear history**: dual stacks, no branching — recording a new
//!   command discards pending redos
//! - **Context-passing**: commands do not store references to the state
//!   they mutate; the target is threaded through every history call
//!
//! # Design Notes
//!
//! ## Why Commands Take a Target Parameter
//!
//! Commands need to mutate engine state, but storing a reference to that
//! state inside each command would either fight the borrow checker or
//! force shared-mutability wrappers. The history is instead generic over
//! [`Command::Target`], and whoever owns both the history and the target
//! passes the target into [`History::record`]/[`History::undo`]/
//! [`History::redo`]. Commands stay plain owned data.
//!
//! ## Why Redo Is Discarded on New Input
//!
//! Stale redo entries could replay a state that no longer reflects
//! intervening edits; discarding them on record matches standard
//! editor-undo semantics and keeps the history linear.

pub mod command;
pub mod history;

pub use command::Command;
pub use history::History;

#![forbid(unsafe_code)]

//! The reversible-command contract.
//!
//! # Invariants
//!
//! - `apply()` followed by `revert()` restores the target's prior state
//!   exactly
//! - `revert()` followed by `apply()` restores the applied state exactly
//!
//! Commands are owned data; the mutation target is passed in by the
//! caller on every invocation (see the module docs on `undo`).

/// A reversible operation over some mutation target.
///
/// Implementations are typically small `Copy` variants (an action kind
/// plus its parameters) rather than one type per action.
pub trait Command {
    /// The state this command mutates.
    type Target;

    /// Apply the command's effect.
    fn apply(&self, target: &mut Self::Target);

    /// Revert the command's effect.
    ///
    /// The default assumes the operation is self-inverse, which holds for
    /// every command in this puzzle (toggling is a pure flip).
    fn revert(&self, target: &mut Self::Target) {
        self.apply(target);
    }
}

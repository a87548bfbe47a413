use thiserror::Error;

/// Preconditions of the normalisation algorithms that the given automaton
/// violated. Patterns that merely do not match are never reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("Epsilon transition {from} -> {to} with outputs leads into a final state")]
    EpsilonOutputIntoFinal { from: String, to: String },

    #[error("Cannot determinize the non-ground or guarded transition {transition}")]
    NonGroundTransition { transition: String },

    #[error("Cannot determinize transitions from {state} on {symbol} with different outputs")]
    ConflictingOutputs { state: String, symbol: String },
}

//!
//! A crate implementing symbolic finite-state transducers: automata whose
//! transitions read symbols matching a pattern, possibly binding variables, and
//! write sequences of output symbols.
//!
//! Besides running transducers with [Automaton::translate], the crate provides
//! the language algebra (union, concatenation, intersection, complement and
//! subtraction) and the normalisation algorithms for epsilon transitions and
//! non-determinism.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod algebra;
mod automaton;
mod complement;
mod copier;
mod determinize;
mod display_dot;
mod epsilon;
mod error;
mod expand;
mod intersection;
mod match_context;
mod random_automaton;
mod reachability;
mod rename;
mod state;
mod symbol;
mod transition;
mod transition_set;

pub use algebra::*;
pub use automaton::*;
pub use complement::*;
pub use copier::*;
pub use determinize::*;
pub use display_dot::*;
pub use epsilon::*;
pub use error::*;
pub use expand::*;
pub use intersection::*;
pub use match_context::*;
pub use random_automaton::*;
pub use reachability::*;
pub use rename::*;
pub use state::*;
pub use symbol::*;
pub use transition::*;
pub use transition_set::*;

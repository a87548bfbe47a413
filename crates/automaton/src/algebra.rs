use log::debug;
use rustc_hash::FxHashMap;
use symfst_utilities::UniqueNames;

use crate::Automaton;
use crate::STATE_PREFIX;
use crate::ShallowCopier;
use crate::State;
use crate::Symbol;
use crate::Transition;
use crate::collect_state_names;
use crate::use_unique_states;

/// Returns the concatenation of both automata, which accepts `uv` whenever
/// `first` accepts `u` and `second` accepts `v`.
///
/// The states of `second` are renamed apart from those of `first`, the
/// associations are recorded in `mapping`. The result shares its states and
/// symbols with the inputs.
pub fn create_concatenation(first: &Automaton, second: &Automaton, mapping: &mut FxHashMap<State, State>) -> Automaton {
    let second = use_unique_states(second, first, mapping);

    let mut result = first.copy(&ShallowCopier);
    create_simple_concatenation(&mut result, &second);
    debug!("Concatenation has {} transitions", result.transitions().len());
    result
}

/// Appends `second` to `first` in place, assuming that the states of both automata are disjoint.
///
/// Every final state of `first` gets an epsilon transition to the initial
/// state of `second`, and the final states become those of `second`.
pub fn create_simple_concatenation(first: &mut Automaton, second: &Automaton) {
    let initial = second.initial_state();

    let links: Vec<Transition> = first
        .final_states()
        .iter()
        .filter(|state| *state != initial)
        .map(|state| Transition::epsilon(state.clone(), initial.clone()))
        .collect();

    first.transitions_mut().extend(links);
    first.transitions_mut().extend(second.transitions().iter().cloned());
    *first.final_states_mut() = second.final_states().clone();
}

/// Returns the union of both automata, which accepts the words accepted by either of them.
///
/// The states of `second` are renamed apart from those of `first`, the
/// associations are recorded in `mapping`. The result has a fresh initial
/// state with epsilon transitions to both initial states, so it generally has
/// to be normalised before it is queried efficiently.
pub fn create_union(first: &Automaton, second: &Automaton, mapping: &mut FxHashMap<State, State>) -> Automaton {
    let second = use_unique_states(second, first, mapping);

    let mut result = first.copy(&ShallowCopier);
    create_simple_union(&mut result, &second);
    debug!("Union has {} transitions", result.transitions().len());
    result
}

/// Adds `second` to `first` in place, assuming that the states of both automata are disjoint.
pub fn create_simple_union(first: &mut Automaton, second: &Automaton) {
    first.final_states_mut().extend(second.final_states().iter().cloned());
    first.transitions_mut().extend(second.transitions().iter().cloned());

    let initial = State::new(&UniqueNames::new(STATE_PREFIX, collect_state_names(first)).fresh());
    let left = Transition::epsilon(initial.clone(), first.initial_state().clone());
    let right = Transition::epsilon(initial.clone(), second.initial_state().clone());

    first.set_initial_state(initial);
    first.transitions_mut().insert(left);
    first.transitions_mut().insert(right);
}

/// Returns the automaton that accepts exactly the given sequence of symbols,
/// with states `s0` up to `s<n>`.
pub fn create_sequence_automaton(symbols: &[Symbol]) -> Automaton {
    let states: Vec<State> = (0..=symbols.len()).map(|i| State::new(&format!("s{i}"))).collect();

    let transitions = symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| Transition::new(states[i].clone(), states[i + 1].clone(), symbol.clone()));

    Automaton::new(states[0].clone(), [states[symbols.len()].clone()], transitions)
}

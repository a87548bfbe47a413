use std::collections::BTreeSet;
use std::collections::VecDeque;

use log::debug;

use crate::Automaton;
use crate::State;

/// Returns the states reachable from the initial state, following transitions
/// regardless of their input.
pub fn collect_reachable_states(automaton: &Automaton) -> BTreeSet<State> {
    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();

    visited.insert(automaton.initial_state().clone());
    queue.push_back(automaton.initial_state().clone());

    // BFS from the initial state
    while let Some(state) = queue.pop_front() {
        for transition in automaton.outgoing(&state) {
            if visited.insert(transition.to().clone()) {
                queue.push_back(transition.to().clone());
            }
        }
    }

    visited
}

/// Removes the transitions and final states that are not reachable from the
/// initial state.
pub fn eliminate_unreachable_states(automaton: &mut Automaton) {
    let reachable = collect_reachable_states(automaton);

    let num_of_transitions = automaton.transitions().len();
    automaton
        .transitions_mut()
        .retain(|transition| reachable.contains(transition.from()) && reachable.contains(transition.to()));
    automaton.final_states_mut().retain(|state| reachable.contains(state));

    debug!(
        "Removed {} unreachable transitions",
        num_of_transitions - automaton.transitions().len()
    );
}

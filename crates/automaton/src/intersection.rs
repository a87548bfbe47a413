use log::debug;
use log::trace;
use rustc_hash::FxHashMap;
use symfst_utilities::UniqueNames;

use crate::Automaton;
use crate::AutomatonError;
use crate::STATE_PREFIX;
use crate::ShallowCopier;
use crate::State;
use crate::Transition;
use crate::eliminate_epsilon_transitions;

/// Computes the product automaton, which accepts the words that are accepted
/// by both automata.
///
/// # Details
///
/// Epsilon transitions are eliminated from (copies of) both automata first.
/// The product states are the pairs of states reachable from the pair of
/// initial states, named `s1`, `s2`, ... in the order of discovery. A pair is
/// final iff both of its components are final.
///
/// Two plain transitions with ground inputs synchronise iff their inputs are
/// equal. Any other pair of transitions synchronises on an intersection
/// transition that admits the symbols admitted by both. In both cases the
/// outputs are those of the transition of `left`.
pub fn create_intersection(left: &Automaton, right: &Automaton) -> Result<Automaton, AutomatonError> {
    let mut left = left.copy(&ShallowCopier);
    let mut right = right.copy(&ShallowCopier);
    eliminate_epsilon_transitions(&mut left)?;
    eliminate_epsilon_transitions(&mut right)?;

    let mut names = UniqueNames::new(STATE_PREFIX, Vec::<String>::new());
    let mut discovered: FxHashMap<(State, State), State> = FxHashMap::default();

    let initial_pair = (left.initial_state().clone(), right.initial_state().clone());
    let initial = State::new(&names.fresh());
    discovered.insert(initial_pair.clone(), initial.clone());

    let mut working = vec![initial_pair];
    let mut transitions = Vec::new();
    let mut finals = Vec::new();

    while let Some((left_state, right_state)) = working.pop() {
        let product_state = discovered
            .get(&(left_state.clone(), right_state.clone()))
            .cloned()
            .expect("Every pair on the stack has been discovered");

        trace!("Considering ({left_state}, {right_state}) as {product_state}");
        if left.is_final(&left_state) && right.is_final(&right_state) {
            finals.push(product_state.clone());
        }

        for left_transition in left.outgoing(&left_state) {
            for right_transition in right.outgoing(&right_state) {
                if !may_synchronise(left_transition, right_transition) {
                    continue;
                }

                let target_pair = (left_transition.to().clone(), right_transition.to().clone());
                let target = match discovered.get(&target_pair) {
                    Some(target) => target.clone(),
                    None => {
                        let target = State::new(&names.fresh());
                        trace!("Adding ({}, {}) as {target}", target_pair.0, target_pair.1);
                        discovered.insert(target_pair.clone(), target.clone());
                        working.push(target_pair);
                        target
                    }
                };

                transitions.push(synchronise(left_transition, right_transition, product_state.clone(), target));
            }
        }
    }

    debug!(
        "Intersection has {} states and {} transitions",
        discovered.len(),
        transitions.len()
    );

    Ok(Automaton::new(initial, finals, transitions))
}

/// Returns false when both transitions are known to never admit the same symbol.
fn may_synchronise(left: &Transition, right: &Transition) -> bool {
    match (left.input(), right.input()) {
        (Some(left_input), Some(right_input)) => {
            !(is_literal(left) && is_literal(right)) || left_input == right_input
        }
        _ => false,
    }
}

/// Returns the product transition for two transitions that may synchronise.
fn synchronise(left: &Transition, right: &Transition, from: State, to: State) -> Transition {
    match left.input() {
        Some(input) if is_literal(left) && is_literal(right) => {
            Transition::new(from, to, input.clone()).with_outputs(left.outputs().iter().cloned())
        }
        Some(input) => Transition::intersection(
            from,
            to,
            input.clone(),
            left.outputs().to_vec(),
            left.hooks().cloned().unwrap_or_default(),
            vec![left.clone(), right.clone()],
        ),
        None => unreachable!("Epsilon transitions have been eliminated"),
    }
}

/// Returns true iff the transition admits exactly the symbol equal to its input.
fn is_literal(transition: &Transition) -> bool {
    transition.is_plain() && transition.input().is_some_and(|input| input.is_ground())
}

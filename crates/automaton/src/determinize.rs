use std::collections::BTreeMap;
use std::collections::BTreeSet;

use log::debug;
use log::trace;
use rustc_hash::FxHashMap;
use symfst_utilities::UniqueNames;
use symfst_utilities::VecSet;
use symfst_utilities::debug_trace;

use crate::Automaton;
use crate::AutomatonError;
use crate::STATE_PREFIX;
use crate::ShallowCopier;
use crate::State;
use crate::Symbol;
use crate::Transition;
use crate::collect_reachable_states;
use crate::collect_state_names;
use crate::eliminate_epsilon_transitions;

/// Makes the automaton deterministic using the subset construction, new states
/// are named so that they do not collide with existing state names.
///
/// See [eliminate_non_deterministics_with] for the details.
pub fn eliminate_non_deterministics(automaton: &mut Automaton) -> Result<(), AutomatonError> {
    let names = UniqueNames::new(STATE_PREFIX, collect_state_names(automaton));
    eliminate_non_deterministics_with(automaton, names)
}

/// Makes the automaton deterministic using the subset construction, taking the
/// names of the merged states from `names`.
///
/// # Details
///
/// Epsilon transitions are eliminated first. Afterwards every set of states
/// reachable by the same input sequence is represented by a single state: a
/// set with one element keeps the original state, larger sets get a fresh
/// name. A merged state is final iff one of its members is final. States that
/// are unreachable from the initial state are removed.
///
/// Only plain transitions with ground inputs are supported. Merged transitions
/// on the same symbol keep their outputs when these are equal, otherwise the
/// translation cannot be preserved and an error is returned. The automaton is
/// only changed when the construction succeeds.
pub fn eliminate_non_deterministics_with(
    automaton: &mut Automaton,
    mut names: UniqueNames,
) -> Result<(), AutomatonError> {
    check_ground_transitions(automaton)?;

    let mut epsilon_free = automaton.copy(&ShallowCopier);
    eliminate_epsilon_transitions(&mut epsilon_free)?;

    let initial = epsilon_free.initial_state().clone();
    let initial_subset = VecSet::singleton(initial.clone());

    let mut discovered: FxHashMap<VecSet<State>, State> = FxHashMap::default();
    discovered.insert(initial_subset.clone(), initial);

    let mut working = vec![initial_subset];
    let mut transitions = Vec::new();
    let mut finals = BTreeSet::new();

    while let Some(subset) = working.pop() {
        let state = discovered
            .get(&subset)
            .cloned()
            .expect("Every subset on the stack has been discovered");

        trace!("Considering {state} = {subset:?}");
        if subset.iter().any(|member| epsilon_free.is_final(member)) {
            finals.insert(state.clone());
        }

        // Group the outgoing transitions of all members by their input symbol.
        let mut groups: BTreeMap<Symbol, Vec<&Transition>> = BTreeMap::new();
        for member in subset.iter() {
            for transition in epsilon_free.outgoing(member) {
                match transition.input() {
                    Some(input) if transition.is_plain() && input.is_ground() => {
                        groups.entry(input.clone()).or_default().push(transition);
                    }
                    _ => {
                        return Err(AutomatonError::NonGroundTransition {
                            transition: transition.to_string(),
                        });
                    }
                }
            }
        }

        for (symbol, group) in groups {
            let outputs = group[0].outputs();
            if group.iter().any(|transition| transition.outputs() != outputs) {
                return Err(AutomatonError::ConflictingOutputs {
                    state: state.to_string(),
                    symbol: symbol.to_string(),
                });
            }

            let target: VecSet<State> = group.iter().map(|transition| transition.to().clone()).collect();
            let target_state = match discovered.get(&target) {
                Some(target_state) => target_state.clone(),
                None => {
                    let target_state = match target.as_singleton() {
                        Some(member) => member.clone(),
                        None => State::new(&names.fresh()),
                    };

                    debug_trace!("Discovered {target_state} = {target:?}");
                    discovered.insert(target.clone(), target_state.clone());
                    working.push(target);
                    target_state
                }
            };

            transitions.push(
                Transition::new(state.clone(), target_state, symbol).with_outputs(outputs.iter().cloned()),
            );
        }
    }

    debug!(
        "Determinised into {} states and {} transitions",
        discovered.len(),
        transitions.len()
    );

    *automaton.transitions_mut() = transitions.into_iter().collect();
    *automaton.final_states_mut() = finals;
    Ok(())
}

/// Returns an error for the first reachable transition that is neither an
/// epsilon transition nor a plain transition on a ground input.
fn check_ground_transitions(automaton: &Automaton) -> Result<(), AutomatonError> {
    let reachable = collect_reachable_states(automaton);

    let unsupported = automaton.transitions().iter().find(|transition| {
        reachable.contains(transition.from())
            && !transition.is_epsilon()
            && !(transition.is_plain() && transition.input().is_some_and(Symbol::is_ground))
    });

    match unsupported {
        Some(transition) => Err(AutomatonError::NonGroundTransition {
            transition: transition.to_string(),
        }),
        None => Ok(()),
    }
}

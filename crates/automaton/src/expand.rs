use log::debug;

use crate::Automaton;
use crate::MatchContext;
use crate::Symbol;
use crate::Transition;

/// Returns a copy of the automaton in which every non-epsilon transition is
/// replaced by one plain transition per symbol of the alphabet that it admits.
///
/// The outputs of the new transitions are fixed to what the original writes
/// for that symbol. The result only contains ground transitions, so it can be
/// determinised, but it only translates words over the given alphabet.
pub fn expand(automaton: &Automaton, symbols: &[Symbol]) -> Automaton {
    let mut transitions = Vec::new();
    for transition in automaton.transitions() {
        if transition.is_epsilon() {
            transitions.push(transition.clone());
            continue;
        }

        for symbol in symbols {
            let mut ctx = MatchContext::new();
            if transition.accept(symbol, &mut ctx) {
                let outputs = transition.transit_with(symbol, &ctx);
                transitions.push(
                    Transition::new(transition.from().clone(), transition.to().clone(), symbol.clone())
                        .with_outputs(outputs),
                );
            }
        }
    }

    debug!(
        "Expanded {} transitions into {}",
        automaton.transitions().len(),
        transitions.len()
    );

    Automaton::new(
        automaton.initial_state().clone(),
        automaton.final_states().iter().cloned(),
        transitions,
    )
}

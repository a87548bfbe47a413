use std::collections::BTreeSet;

use log::debug;
use log::trace;
use symfst_utilities::debug_trace;

use crate::Automaton;
use crate::AutomatonError;
use crate::State;
use crate::Symbol;
use crate::Transition;

/// Removes all epsilon transitions from the automaton, preserving its translation.
///
/// Every non-epsilon transition reachable through a chain of epsilon
/// transitions is copied to the start of the chain, with the outputs of the
/// chain prepended to its own. Every distinct chain contributes its own copy,
/// so chains with different outputs that join in the same state are all
/// preserved. A state becomes final when a final state is reachable through
/// epsilon transitions. Guarded transitions are folded as a whole, the folded
/// outputs are written before their filtered output.
///
/// # Details
///
/// A chain never uses the same epsilon transition twice, which guarantees
/// termination on epsilon cycles. A guarded transition reached again through
/// an epsilon cycle back to its own source is folded onto every state of that
/// cycle, so it can be taken repeatedly afterwards.
///
/// Fails when an epsilon transition with outputs leads to a final state, since
/// accepting in its source would lose these outputs. The automaton is left
/// unchanged in that case.
pub fn eliminate_epsilon_transitions(automaton: &mut Automaton) -> Result<(), AutomatonError> {
    let added_finals = final_state_closure(automaton)?;

    // Epsilon self loops have no effect.
    automaton
        .transitions_mut()
        .retain(|transition| !(transition.is_epsilon() && transition.from() == transition.to()));

    if !added_finals.is_empty() {
        trace!("Final through epsilon transitions: {added_finals:?}");
        automaton.final_states_mut().extend(added_finals);
    }

    let epsilons: Vec<Transition> = automaton
        .transitions()
        .iter()
        .filter(|transition| transition.is_epsilon())
        .cloned()
        .collect();

    let mut folded = Vec::new();
    for epsilon in &epsilons {
        folded.extend(fold_epsilon_transition(automaton, epsilon));
    }

    debug!(
        "Replaced {} epsilon transitions by {} transitions",
        epsilons.len(),
        folded.len()
    );

    automaton.transitions_mut().extend(folded);
    automaton.transitions_mut().retain(|transition| !transition.is_epsilon());
    Ok(())
}

/// Removes the given epsilon transition, which must be part of the automaton,
/// by folding it into the transitions that follow it.
pub fn eliminate_epsilon_transition(automaton: &mut Automaton, epsilon: &Transition) -> Result<(), AutomatonError> {
    debug_assert!(epsilon.is_epsilon(), "Only epsilon transitions can be eliminated");

    if automaton.is_final(epsilon.to()) {
        if epsilon.has_outputs() {
            return Err(epsilon_output_error(epsilon));
        }

        automaton.final_states_mut().insert(epsilon.from().clone());
    }

    let folded = fold_epsilon_transition(automaton, epsilon);
    automaton.transitions_mut().remove(epsilon);
    automaton.transitions_mut().extend(folded);
    Ok(())
}

/// Returns the states that are not final, but reach a final state through
/// epsilon transitions. Epsilon self loops are ignored.
fn final_state_closure(automaton: &Automaton) -> Result<Vec<State>, AutomatonError> {
    let mut finals: BTreeSet<&State> = automaton.final_states().iter().collect();
    let mut added = Vec::new();

    loop {
        let mut changed = false;
        for transition in automaton.transitions() {
            if !transition.is_epsilon() || transition.from() == transition.to() || !finals.contains(transition.to()) {
                continue;
            }

            if transition.has_outputs() {
                return Err(epsilon_output_error(transition));
            }

            if finals.insert(transition.from()) {
                added.push(transition.from().clone());
                changed = true;
            }
        }

        if !changed {
            return Ok(added);
        }
    }
}

/// Returns the non-epsilon transitions reachable by following `epsilon` and the
/// epsilon transitions after it, moved to the source of `epsilon`.
fn fold_epsilon_transition(automaton: &Automaton, epsilon: &Transition) -> Vec<Transition> {
    let mut result = Vec::new();

    // Every chain carries the epsilon transitions it has taken.
    let mut working: Vec<(&Transition, Vec<Symbol>, Vec<&Transition>)> = vec![(epsilon, Vec::new(), Vec::new())];

    while let Some((transition, mut outputs, mut chain)) = working.pop() {
        if transition.is_epsilon() {
            if chain.contains(&transition) {
                continue;
            }

            chain.push(transition);
            outputs.extend(transition.epsilon_outputs());
            let next: Vec<&Transition> = automaton.outgoing(transition.to()).collect();
            for next_transition in next.into_iter().rev() {
                working.push((next_transition, outputs.clone(), chain.clone()));
            }
        } else {
            let mut moved = transition.clone();
            moved.set_from(epsilon.from().clone());
            moved.prepend_outputs(&outputs);

            debug_trace!("Folded {transition} into {moved}");
            result.push(moved);
        }
    }

    result
}

fn epsilon_output_error(transition: &Transition) -> AutomatonError {
    AutomatonError::EpsilonOutputIntoFinal {
        from: transition.from().to_string(),
        to: transition.to().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::Guard;
    use crate::OutputFilter;
    use crate::ShallowCopier;
    use crate::State;

    fn s(name: &str) -> State {
        State::new(name)
    }

    fn sym(name: &str) -> Symbol {
        Symbol::named(name)
    }

    /// Upper cases the first output, and only admits the character `c`.
    fn upper_case_c(from: State, to: State) -> Transition {
        Transition::filtered(
            from,
            to,
            Symbol::variable("x"),
            vec![Symbol::variable("x")],
            Some(OutputFilter::new(|_, outputs| {
                outputs
                    .first()
                    .map(|output| Symbol::chars(&output.name().to_uppercase()))
                    .unwrap_or_default()
            })),
            Some(Guard::new(|symbol, _| *symbol == Symbol::char('c'))),
        )
    }

    #[test]
    fn test_eliminate_epsilon_chain() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::epsilon(s("s1"), s("s2")).with_outputs([sym("A")]),
                Transition::new(s("s2"), s("s3"), sym("b")).with_outputs([sym("B")]),
                Transition::new(s("s2"), s("s2"), sym("0")).with_outputs([sym("0")]),
            ],
        );

        let expected = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::new(s("s1"), s("s3"), sym("b")).with_outputs([sym("A"), sym("B")]),
                Transition::new(s("s1"), s("s2"), sym("0")).with_outputs([sym("A"), sym("0")]),
                Transition::new(s("s2"), s("s3"), sym("b")).with_outputs([sym("B")]),
                Transition::new(s("s2"), s("s2"), sym("0")).with_outputs([sym("0")]),
            ],
        );

        eliminate_epsilon_transitions(&mut automaton).unwrap();
        assert_eq!(automaton, expected);
    }

    #[test]
    fn test_eliminate_epsilon_self_loop() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::epsilon(s("s1"), s("s2")).with_outputs([sym("A")]),
                Transition::new(s("s2"), s("s3"), sym("b")).with_outputs([sym("B")]),
                Transition::epsilon(s("s2"), s("s2")).with_outputs([sym("0")]),
            ],
        );

        let expected = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::new(s("s1"), s("s3"), sym("b")).with_outputs([sym("A"), sym("B")]),
                Transition::new(s("s2"), s("s3"), sym("b")).with_outputs([sym("B")]),
            ],
        );

        eliminate_epsilon_transitions(&mut automaton).unwrap();
        assert_eq!(automaton, expected);
    }

    #[test]
    fn test_eliminate_epsilon_cycle() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::new(s("s1"), s("s2"), sym("a")).with_outputs([sym("A")]),
                Transition::epsilon(s("s2"), s("s3")),
                Transition::new(s("s3"), s("s4"), sym("b")).with_outputs([sym("B")]),
                Transition::epsilon(s("s4"), s("s3")),
            ],
        );

        let expected = Automaton::new(
            s("s1"),
            [s("s2"), s("s3"), s("s4")],
            [
                Transition::new(s("s1"), s("s2"), sym("a")).with_outputs([sym("A")]),
                Transition::new(s("s2"), s("s4"), sym("b")).with_outputs([sym("B")]),
                Transition::new(s("s3"), s("s4"), sym("b")).with_outputs([sym("B")]),
                Transition::new(s("s4"), s("s4"), sym("b")).with_outputs([sym("B")]),
            ],
        );

        eliminate_epsilon_transitions(&mut automaton).unwrap();
        assert_eq!(automaton, expected);
    }

    #[test]
    fn test_eliminate_epsilon_before_filtered() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::epsilon(s("s1"), s("s2")).with_outputs([Symbol::char('0')]),
                upper_case_c(s("s2"), s("s3")),
            ],
        );

        eliminate_epsilon_transitions(&mut automaton).unwrap();
        assert!(automaton.transitions().iter().all(|t| !t.is_epsilon()));

        assert!(automaton.translate(&Symbol::chars("a")).is_empty());
        assert_eq!(automaton.translate(&Symbol::chars("c")), vec![Symbol::chars("0C")]);
        assert!(automaton.translate(&Symbol::chars("cc")).is_empty());
    }

    #[test]
    fn test_eliminate_epsilon_cycle_after_filtered() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                upper_case_c(s("s1"), s("s2")),
                Transition::epsilon(s("s2"), s("s3")),
                Transition::epsilon(s("s3"), s("s1")),
            ],
        );

        eliminate_epsilon_transitions(&mut automaton).unwrap();

        assert!(automaton.translate(&Symbol::chars("a")).is_empty());
        assert_eq!(automaton.translate(&Symbol::chars("c")), vec![Symbol::chars("C")]);
        assert_eq!(automaton.translate(&Symbol::chars("ccc")), vec![Symbol::chars("CCC")]);
    }

    #[test]
    fn test_eliminate_joining_epsilon_paths() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s5")],
            [
                Transition::epsilon(s("s1"), s("s2")),
                Transition::epsilon(s("s2"), s("s4")).with_outputs([sym("A")]),
                Transition::epsilon(s("s2"), s("s3")).with_outputs([sym("B")]),
                Transition::epsilon(s("s3"), s("s4")),
                Transition::new(s("s4"), s("s5"), sym("c")).with_outputs([sym("C")]),
            ],
        );

        let mut before = automaton.translate(&[sym("c")]);
        before.sort();
        assert_eq!(before, vec![vec![sym("A"), sym("C")], vec![sym("B"), sym("C")]]);

        eliminate_epsilon_transitions(&mut automaton).unwrap();
        assert!(automaton.transitions().iter().all(|t| !t.is_epsilon()));

        let mut after = automaton.translate(&[sym("c")]);
        after.sort();
        assert_eq!(after, before);
    }

    #[test]
    fn test_epsilon_output_into_final() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s2")],
            [Transition::epsilon(s("s1"), s("s2")).with_outputs([sym("A")])],
        );

        assert_eq!(
            eliminate_epsilon_transitions(&mut automaton),
            Err(AutomatonError::EpsilonOutputIntoFinal {
                from: "s1".to_string(),
                to: "s2".to_string()
            })
        );
    }

    #[test]
    fn test_failed_elimination_keeps_automaton() {
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s4")],
            [
                Transition::epsilon(s("s1"), s("s1")),
                Transition::epsilon(s("s3"), s("s4")),
                Transition::epsilon(s("s2"), s("s3")).with_outputs([sym("A")]),
                Transition::new(s("s1"), s("s2"), sym("a")),
            ],
        );
        let original = automaton.copy(&ShallowCopier);

        assert!(eliminate_epsilon_transitions(&mut automaton).is_err());
        assert_eq!(automaton, original);
        assert_eq!(automaton.final_states(), original.final_states());
    }

    #[test]
    fn test_eliminate_single_epsilon_transition() {
        let epsilon = Transition::epsilon(s("s1"), s("s2"));
        let mut automaton = Automaton::new(
            s("s1"),
            [s("s2"), s("s3")],
            [
                epsilon.clone(),
                Transition::new(s("s2"), s("s3"), sym("a")).with_outputs([sym("A")]),
            ],
        );

        eliminate_epsilon_transition(&mut automaton, &epsilon).unwrap();

        assert!(automaton.is_final(&s("s1")));
        assert!(!automaton.transitions().contains(&epsilon));
        assert!(
            automaton
                .transitions()
                .contains(&Transition::new(s("s1"), s("s3"), sym("a")).with_outputs([sym("A")]))
        );
        assert_eq!(automaton.translate(&[sym("a")]), vec![vec![sym("A")]]);
    }
}

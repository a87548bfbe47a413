use log::debug;
use symfst_utilities::UniqueNames;

use crate::Automaton;
use crate::AutomatonError;
use crate::OutputFilter;
use crate::STATE_PREFIX;
use crate::ShallowCopier;
use crate::State;
use crate::Symbol;
use crate::Transition;
use crate::collect_state_names;
use crate::create_intersection;
use crate::create_unique_state;
use crate::eliminate_non_deterministics_with;
use crate::expand;

/// Makes the automaton total: it is determinised, after which every state gets
/// a transition to `fail` that admits exactly the symbols matching `catch_all`
/// that none of its other transitions admit.
///
/// These transitions write `outputs` with the bindings of `catch_all`
/// substituted, post-processed by the optional `filter`.
pub fn complete_automaton(
    automaton: &mut Automaton,
    fail: &State,
    catch_all: &Symbol,
    outputs: &[Symbol],
    filter: Option<OutputFilter>,
) -> Result<(), AutomatonError> {
    let mut names = UniqueNames::new(STATE_PREFIX, collect_state_names(automaton));
    names.reserve(fail.name());
    eliminate_non_deterministics_with(automaton, names)?;

    let completions: Vec<Transition> = automaton
        .states()
        .into_iter()
        .map(|state| {
            let excluded = automaton.transitions_from(&state);
            Transition::complement(
                state,
                fail.clone(),
                catch_all.clone(),
                outputs.to_vec(),
                filter.clone(),
                excluded,
            )
        })
        .collect();

    debug!("Completed automaton with {} transitions", completions.len());
    automaton.transitions_mut().extend(completions);
    Ok(())
}

/// Returns an automaton with the same transitions in which exactly the
/// non-final states are final.
///
/// This is the complement of a total automaton, for which every state admits
/// every symbol.
pub fn invert_final_states(automaton: &Automaton) -> Automaton {
    let mut result = automaton.copy(&ShallowCopier);
    let finals = automaton
        .states()
        .into_iter()
        .filter(|state| !automaton.is_final(state))
        .collect();

    *result.final_states_mut() = finals;
    result
}

/// Returns the complement of the automaton, which accepts exactly the words
/// that the automaton rejects.
///
/// The automaton is completed with a fresh sink state and the catch-all
/// variable `_`, see [create_complement_with]. Fails when the automaton cannot
/// be determinised.
pub fn create_complement(automaton: &Automaton) -> Result<Automaton, AutomatonError> {
    create_complement_with(automaton, create_unique_state(automaton), Symbol::variable("_"), None)
}

/// Returns the complement of the automaton, using the given sink state and
/// catch-all pattern to complete it.
///
/// The sink state loops on every symbol matching `catch_all`, and the final
/// states are inverted over all states including the sink. The optional filter
/// is applied on the transitions into and within the sink.
pub fn create_complement_with(
    automaton: &Automaton,
    fail: State,
    catch_all: Symbol,
    filter: Option<OutputFilter>,
) -> Result<Automaton, AutomatonError> {
    let mut result = automaton.copy(&ShallowCopier);
    complete_automaton(&mut result, &fail, &catch_all, &[], filter.clone())?;

    let mut finals = result.states();
    finals.insert(fail.clone());
    finals.retain(|state| !result.is_final(state));

    let sink = Transition::filtered(fail.clone(), fail, catch_all, Vec::new(), filter, None);
    result.transitions_mut().insert(sink);
    *result.final_states_mut() = finals;
    Ok(result)
}

/// Returns the complement of the automaton relative to the given alphabet, by
/// first replacing its transitions by ground transitions with [expand].
///
/// This makes automata with variable or guarded transitions amenable to complementation.
pub fn create_complement_over(automaton: &Automaton, symbols: &[Symbol]) -> Result<Automaton, AutomatonError> {
    create_complement(&expand(automaton, symbols))
}

/// Returns an automaton that accepts the words accepted by `first` and rejected by `second`.
pub fn create_subtraction(first: &Automaton, second: &Automaton) -> Result<Automaton, AutomatonError> {
    create_intersection(first, &create_complement(second)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::Guard;
    use crate::MatchContext;

    fn s(name: &str) -> State {
        State::new(name)
    }

    fn sym(name: &str) -> Symbol {
        Symbol::named(name)
    }

    fn two_step() -> Automaton {
        Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::new(s("s1"), s("s2"), sym("a")),
                Transition::new(s("s2"), s("s3"), sym("b")),
            ],
        )
    }

    #[test]
    fn test_create_complement() {
        let automaton = two_step();
        let complement = create_complement(&automaton).unwrap();

        assert!(!complement.accept(&[sym("a"), sym("b")]));
        assert!(complement.accept(&[sym("a"), sym("B")]));
        assert!(complement.accept(&[sym("A"), sym("B")]));
        assert!(complement.accept(&[]));
        assert!(complement.accept(&[sym("a"), sym("b"), sym("c")]));

        // The input is not modified.
        assert_eq!(automaton, two_step());
    }

    #[test]
    fn test_complete_automaton() {
        let mut automaton = two_step();
        let fail = s("fail");
        let catch_all = Symbol::variable("_");
        complete_automaton(&mut automaton, &fail, &catch_all, &[catch_all.clone()], None).unwrap();

        for state in [s("s1"), s("s2"), s("s3")] {
            for symbol in [sym("a"), sym("b"), sym("z")] {
                assert_eq!(
                    automaton.accept_transitions(&state, &symbol).len(),
                    1,
                    "State {state} is not total on {symbol}"
                );
            }
        }

        // The transitions to the fail state echo the symbol.
        let to_fail = automaton.accept_transitions(&s("s1"), &sym("z"));
        assert_eq!(to_fail[0].to(), &fail);
        assert_eq!(to_fail[0].transit(&sym("z")), vec![sym("z")]);
        assert!(!to_fail[0].accept(&sym("a"), &mut MatchContext::new()));
    }

    #[test]
    fn test_invert_final_states() {
        let automaton = two_step();
        let inverted = invert_final_states(&automaton);

        assert_eq!(inverted.final_states().len(), 2);
        assert!(inverted.accept(&[sym("a")]));
        assert!(!inverted.accept(&[sym("a"), sym("b")]));
        assert_eq!(inverted.transitions(), automaton.transitions());
    }

    #[test]
    fn test_create_complement_of_patterns() {
        let automaton = Automaton::new(
            s("s1"),
            [s("s2")],
            [Transition::new(s("s1"), s("s2"), Symbol::variable("x")).with_guard(Guard::new(|symbol, _| {
                *symbol != Symbol::named("b")
            }))],
        );

        assert!(matches!(
            create_complement(&automaton),
            Err(AutomatonError::NonGroundTransition { .. })
        ));

        let complement = create_complement_over(&automaton, &[sym("a"), sym("b")]).unwrap();
        assert!(!complement.accept(&[sym("a")]));
        assert!(complement.accept(&[sym("b")]));
        assert!(complement.accept(&[sym("a"), sym("a")]));
    }

    #[test]
    fn test_create_subtraction() {
        let first = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::new(s("s1"), s("s2"), sym("a")),
                Transition::new(s("s2"), s("s3"), sym("b")),
                Transition::new(s("s1"), s("s2"), sym("A")),
                Transition::new(s("s2"), s("s3"), sym("B")),
            ],
        );
        let second = Automaton::new(
            s("s1"),
            [s("s3")],
            [
                Transition::new(s("s1"), s("s2"), sym("A")),
                Transition::new(s("s2"), s("s3"), sym("B")),
            ],
        );

        let result = create_subtraction(&first, &second).unwrap();
        assert!(result.accept(&[sym("a"), sym("b")]));
        assert!(result.accept(&[sym("A"), sym("b")]));
        assert!(result.accept(&[sym("a"), sym("B")]));
        assert!(!result.accept(&[sym("A"), sym("B")]));
        assert!(!result.accept(&[sym("a")]));
    }
}

use rand::Rng;

use crate::Automaton;
use crate::State;
use crate::Symbol;
use crate::Transition;

/// Generates a random automaton with the desired number of states, labels and
/// out degree, without outputs.
///
/// The states are named `s1` up to `s<num_of_states>` with `s1` as the initial
/// state. The first label is epsilon, the others are the ground symbols `a`,
/// `b` and so forth.
pub fn random_automaton(rng: &mut impl Rng, num_of_states: usize, num_of_labels: u32, outdegree: usize) -> Automaton {
    assert!(
        (1..=26).contains(&num_of_labels),
        "Between one and 26 labels are supported, since we only use alphabetic labels."
    );

    let num_of_states = num_of_states.max(1);
    let states: Vec<State> = (1..=num_of_states).map(|i| State::new(&format!("s{i}"))).collect();

    // The label at index zero is epsilon.
    let mut labels: Vec<Option<Symbol>> = vec![None];
    for i in 0..(num_of_labels - 1) {
        let c = char::from(b'a' + i as u8);
        labels.push(Some(Symbol::named(c.to_string())));
    }

    let mut transitions = Vec::new();
    for from in &states {
        // Introduce outgoing transitions for this state based on the desired out degree.
        for _ in 0..rng.random_range(0..outdegree.max(1)) {
            let label = &labels[rng.random_range(0..labels.len())];
            let to = states[rng.random_range(0..num_of_states)].clone();

            transitions.push(match label {
                Some(symbol) => Transition::new(from.clone(), to, symbol.clone()),
                None => Transition::epsilon(from.clone(), to),
            });
        }
    }

    let finals: Vec<State> = states.iter().filter(|_| rng.random_bool(0.3)).cloned().collect();

    Automaton::new(states[0].clone(), finals, transitions)
}

/// Returns all sequences over the alphabet with at most the given length,
/// shortest first.
pub fn enumerate_words(alphabet: &[Symbol], max_length: usize) -> Vec<Vec<Symbol>> {
    let mut words = vec![Vec::new()];
    let mut previous = vec![Vec::new()];

    for _ in 0..max_length {
        let mut next = Vec::new();
        for word in &previous {
            for symbol in alphabet {
                let mut extended: Vec<Symbol> = word.clone();
                extended.push(symbol.clone());
                next.push(extended);
            }
        }

        words.extend(next.iter().cloned());
        previous = next;
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use symfst_utilities::random_test;

    #[test]
    fn test_random_automaton() {
        random_test(100, |rng| {
            let automaton = random_automaton(rng, 10, 3, 3);

            assert_eq!(automaton.initial_state(), &State::new("s1"));
            assert!(automaton.states().len() <= 10);
            assert!(automaton.transitions().iter().all(|t| t.outputs().is_empty()));

            // Translating is defined on every input, also with epsilon cycles.
            for word in enumerate_words(&[Symbol::named("a"), Symbol::named("b")], 3) {
                assert_eq!(automaton.accept(&word), !automaton.translate(&word).is_empty());
            }
        });
    }

    #[test]
    fn test_enumerate_words() {
        let words = enumerate_words(&[Symbol::named("a"), Symbol::named("b")], 2);

        assert_eq!(words.len(), 7);
        assert!(words[0].is_empty());
        assert_eq!(words[6], vec![Symbol::named("b"), Symbol::named("b")]);
    }
}

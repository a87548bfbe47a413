use std::collections::BTreeSet;

use log::debug;
use rustc_hash::FxHashMap;
use symfst_utilities::UniqueNames;

use crate::Automaton;
use crate::Copier;
use crate::State;
use crate::Symbol;

/// The prefix of generated state names.
pub const STATE_PREFIX: &str = "s";

/// The prefix of generated input symbol names.
pub const INPUT_SYMBOL_PREFIX: &str = "i";

/// Returns the names of all states of the automaton.
pub fn collect_state_names(automaton: &Automaton) -> BTreeSet<String> {
    automaton.states().iter().map(|state| state.name().to_string()).collect()
}

/// Returns the input patterns of all non-epsilon transitions.
pub fn collect_input_symbols(automaton: &Automaton) -> BTreeSet<Symbol> {
    automaton
        .transitions()
        .iter()
        .filter_map(|transition| transition.input().cloned())
        .collect()
}

/// Returns the names of the input patterns of all non-epsilon transitions.
pub fn collect_input_symbol_names(automaton: &Automaton) -> BTreeSet<String> {
    collect_input_symbols(automaton).iter().map(Symbol::name).collect()
}

/// Returns a state whose name is not used by the automaton.
pub fn create_unique_state(automaton: &Automaton) -> State {
    State::new(&UniqueNames::new(STATE_PREFIX, collect_state_names(automaton)).fresh())
}

/// Returns a ground symbol whose name is not used by any input pattern of the automaton.
pub fn create_unique_input_symbol(automaton: &Automaton) -> Symbol {
    Symbol::named(UniqueNames::new(INPUT_SYMBOL_PREFIX, collect_input_symbol_names(automaton)).fresh())
}

/// Renames states according to a fixed mapping, sharing everything else.
struct StateRenamer<'a> {
    mapping: &'a FxHashMap<State, State>,
}

impl Copier for StateRenamer<'_> {
    fn copy_state(&self, state: &State) -> State {
        self.mapping.get(state).cloned().unwrap_or_else(|| state.clone())
    }

    fn copy_symbol(&self, symbol: &Symbol) -> Option<Symbol> {
        Some(symbol.clone())
    }
}

/// Returns a copy of `target` in which every state has a fresh name that is
/// used by neither `target` nor `base`. The old to new associations are
/// recorded in `mapping`.
///
/// Symbols are shared with `target`.
pub fn use_unique_states(target: &Automaton, base: &Automaton, mapping: &mut FxHashMap<State, State>) -> Automaton {
    let mut names = UniqueNames::new(STATE_PREFIX, collect_state_names(base));
    for name in collect_state_names(target) {
        names.reserve(name);
    }

    for state in target.states() {
        let renamed = State::new(&names.fresh());
        mapping.insert(state, renamed);
    }

    debug!("Renamed {} states", mapping.len());
    target.copy(&StateRenamer { mapping })
}

/// Returns a copy of `target` in which every ground input symbol is replaced by
/// a fresh symbol whose name is used by neither `target` nor `base`. Variable
/// input patterns are kept. The old to new associations are recorded in
/// `mapping`.
pub fn use_unique_input_symbols(
    target: &Automaton,
    base: &Automaton,
    mapping: &mut FxHashMap<Symbol, Symbol>,
) -> Automaton {
    let mut names = UniqueNames::new(INPUT_SYMBOL_PREFIX, collect_input_symbol_names(base));
    for name in collect_input_symbol_names(target) {
        names.reserve(name);
    }

    for symbol in collect_input_symbols(target) {
        if symbol.is_ground() {
            mapping.insert(symbol, Symbol::named(names.fresh()));
        }
    }

    let transitions = target.transitions().iter().map(|transition| {
        let mut renamed = transition.clone();
        if let Some(symbol) = transition.input().and_then(|input| mapping.get(input)) {
            renamed.set_input(Some(symbol.clone()));
        }
        renamed
    });

    Automaton::new(
        target.initial_state().clone(),
        target.final_states().iter().cloned(),
        transitions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::Transition;

    fn s(name: &str) -> State {
        State::new(name)
    }

    fn sym(name: &str) -> Symbol {
        Symbol::named(name)
    }

    fn example() -> Automaton {
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
    fn test_use_unique_states() {
        let automaton = example();
        let mut mapping = FxHashMap::default();
        let renamed = use_unique_states(&automaton, &automaton, &mut mapping);

        let expected = BTreeSet::from([s("s4"), s("s5"), s("s6")]);
        assert_eq!(renamed.states(), expected);
        assert!(expected.contains(renamed.initial_state()));
        assert!(renamed.final_states().is_subset(&expected));

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get(&s("s1")), Some(renamed.initial_state()));
        assert!(renamed.accept(&[sym("a"), sym("b")]));
    }

    #[test]
    fn test_use_unique_input_symbols() {
        let automaton = example();
        let mut mapping = FxHashMap::default();
        let renamed = use_unique_input_symbols(&automaton, &automaton, &mut mapping);

        let expected = BTreeSet::from([sym("i1"), sym("i2")]);
        assert_eq!(collect_input_symbols(&renamed), expected);
        assert_eq!(mapping.len(), 2);
        assert!(expected.contains(&mapping[&sym("a")]));
        assert!(expected.contains(&mapping[&sym("b")]));
        assert_ne!(mapping[&sym("a")], mapping[&sym("b")]);
    }

    #[test]
    fn test_use_unique_input_symbols_keeps_variables() {
        let automaton = Automaton::new(
            s("s1"),
            [s("s2")],
            [Transition::new(s("s1"), s("s2"), Symbol::variable("x")).with_outputs([Symbol::variable("x")])],
        );
        let mut mapping = FxHashMap::default();
        let renamed = use_unique_input_symbols(&automaton, &automaton, &mut mapping);

        assert!(mapping.is_empty());
        assert_eq!(renamed, automaton);
    }

    #[test]
    fn test_unique_names() {
        let automaton = example();

        assert_eq!(create_unique_state(&automaton), s("s4"));
        assert_eq!(create_unique_input_symbol(&automaton), sym("i1"));
        assert_eq!(collect_input_symbol_names(&automaton), BTreeSet::from(["a".to_string(), "b".to_string()]));
    }
}

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use log::trace;

use crate::Copier;
use crate::MatchContext;
use crate::State;
use crate::Symbol;
use crate::Transition;
use crate::TransitionSet;

/// A symbolic finite-state transducer.
///
/// The states are not stored explicitly, they consist of the initial state,
/// the final states and all endpoints of the transitions. The transition set is
/// exposed mutably through [Automaton::transitions_mut], changes to it are
/// visible to all subsequent queries.
#[derive(PartialEq, Eq)]
pub struct Automaton {
    initial: State,
    finals: BTreeSet<State>,
    transitions: TransitionSet,
}

/// One branch of the non-deterministic exploration in [Automaton::translate].
struct Branch {
    state: State,

    /// The number of input symbols consumed so far.
    position: usize,
    output: Vec<Symbol>,

    /// The states visited by epsilon transitions since the last consumed symbol.
    epsilon_visited: Vec<State>,
}

impl Automaton {
    /// Creates an automaton with the given initial state, final states and transitions.
    pub fn new<F, T>(initial: State, finals: F, transitions: T) -> Self
    where
        F: IntoIterator<Item = State>,
        T: IntoIterator<Item = Transition>,
    {
        Self {
            initial,
            finals: finals.into_iter().collect(),
            transitions: transitions.into_iter().collect(),
        }
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn set_initial_state(&mut self, initial: State) {
        self.initial = initial;
    }

    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.finals
    }

    pub fn final_states_mut(&mut self) -> &mut BTreeSet<State> {
        &mut self.finals
    }

    pub fn is_final(&self, state: &State) -> bool {
        self.finals.contains(state)
    }

    /// Returns the live set of transitions.
    pub fn transitions(&self) -> &TransitionSet {
        &self.transitions
    }

    /// Returns the live set of transitions, modifications change this automaton.
    pub fn transitions_mut(&mut self) -> &mut TransitionSet {
        &mut self.transitions
    }

    /// Iterates over the transitions leaving the given state.
    pub fn outgoing<'a>(&'a self, state: &'a State) -> impl Iterator<Item = &'a Transition> + 'a {
        self.transitions.iter().filter(move |t| t.from() == state)
    }

    /// Returns the transitions leaving the given state.
    pub fn transitions_from(&self, state: &State) -> Vec<Transition> {
        self.outgoing(state).cloned().collect()
    }

    /// Returns the transitions leaving the given state whose input pattern is
    /// equal to the given one, where `None` selects the epsilon transitions.
    pub fn transitions_on(&self, state: &State, input: Option<&Symbol>) -> Vec<Transition> {
        self.outgoing(state).filter(|t| t.input() == input).cloned().collect()
    }

    /// Returns the transitions leaving the given state that accept the given symbol.
    pub fn accept_transitions(&self, state: &State, symbol: &Symbol) -> Vec<Transition> {
        self.outgoing(state)
            .filter(|t| t.accept(symbol, &mut MatchContext::new()))
            .cloned()
            .collect()
    }

    /// Returns all states of the automaton.
    pub fn states(&self) -> BTreeSet<State> {
        let mut states = BTreeSet::new();
        states.insert(self.initial.clone());
        states.extend(self.finals.iter().cloned());
        for transition in &self.transitions {
            states.insert(transition.from().clone());
            states.insert(transition.to().clone());
        }

        states
    }

    /// Returns true iff the automaton has at least one accepting run on the input.
    pub fn accept(&self, input: &[Symbol]) -> bool {
        !self.translate(input).is_empty()
    }

    /// Returns the outputs of all accepting runs on the given input.
    ///
    /// A run ends as soon as the input is consumed in a final state. Epsilon
    /// transitions are followed at most once per state between two consumed
    /// symbols, so epsilon cycles terminate.
    pub fn translate(&self, input: &[Symbol]) -> Vec<Vec<Symbol>> {
        let mut results = Vec::new();
        let mut working = vec![Branch {
            state: self.initial.clone(),
            position: 0,
            output: Vec::new(),
            epsilon_visited: vec![self.initial.clone()],
        }];

        while let Some(branch) = working.pop() {
            if branch.position == input.len() && self.is_final(&branch.state) {
                trace!("Accepted in {} with output {:?}", branch.state, branch.output);
                results.push(branch.output);
                continue;
            }

            let mut successors = Vec::new();
            for transition in self.outgoing(&branch.state) {
                if transition.is_epsilon() {
                    if branch.epsilon_visited.contains(transition.to()) {
                        continue;
                    }

                    let mut output = branch.output.clone();
                    output.extend(transition.transit_epsilon());

                    let mut epsilon_visited = branch.epsilon_visited.clone();
                    epsilon_visited.push(transition.to().clone());

                    successors.push(Branch {
                        state: transition.to().clone(),
                        position: branch.position,
                        output,
                        epsilon_visited,
                    });
                } else if let Some(symbol) = input.get(branch.position) {
                    let mut ctx = MatchContext::new();
                    if transition.accept(symbol, &mut ctx) {
                        let mut output = branch.output.clone();
                        output.extend(transition.transit_with(symbol, &ctx));

                        successors.push(Branch {
                            state: transition.to().clone(),
                            position: branch.position + 1,
                            output,
                            epsilon_visited: vec![transition.to().clone()],
                        });
                    }
                }
            }

            // Explore the successors in the order of the transitions.
            working.extend(successors.into_iter().rev());
        }

        results
    }

    /// Copies this automaton using the given copier. The containers of the
    /// result are always new.
    pub fn copy(&self, copier: &impl Copier) -> Automaton {
        Automaton {
            initial: copier.copy_state(&self.initial),
            finals: self.finals.iter().map(|state| copier.copy_state(state)).collect(),
            transitions: self.transitions.iter().map(|t| copier.copy_transition(t)).collect(),
        }
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of states: {}", self.states().len())?;
        writeln!(f, "Number of final states: {}", self.finals.len())?;
        write!(f, "Number of transitions: {}", self.transitions.len())
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial state: {}", self.initial)?;
        writeln!(f, "Final states: {{{}}}", self.finals.iter().format(", "))?;

        for transition in &self.transitions {
            writeln!(f, "{transition}")?;
        }

        Ok(())
    }
}

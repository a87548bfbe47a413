use std::fmt;

use itertools::Itertools;

use crate::Automaton;
use crate::Transition;

/// Helper to render an automaton in Graphviz DOT format.
///
/// Edges are labelled with `input/[outputs]` and emitted in sorted order, so
/// that equal automata are rendered identically.
pub struct AutomatonDot<'a> {
    pub automaton: &'a Automaton,
}

impl<'a> AutomatonDot<'a> {
    /// Creates a new AutomatonDot Display for the given automaton.
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }
}

/// Escapes the characters that are not allowed in a quoted DOT string.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn edge_label(transition: &Transition) -> String {
    let input = match transition.input() {
        Some(input) => input.to_string(),
        None => "ε".to_string(),
    };

    format!("{input}/[{}]", transition.epsilon_outputs().iter().format(", "))
}

impl fmt::Display for AutomatonDot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph automaton {{")?;
        writeln!(f, "  rankdir=LR;")?;

        // Emit a small incoming arrow to the initial state
        writeln!(f, "  init [shape=point, label=\"\"];")?;
        writeln!(f, "  init -> \"{}\";", escape(self.automaton.initial_state().name()))?;

        for state in self.automaton.final_states() {
            writeln!(f, "  \"{}\" [shape=doublecircle];", escape(state.name()))?;
        }

        let edges: Vec<String> = self
            .automaton
            .transitions()
            .iter()
            .map(|transition| {
                format!(
                    "  \"{}\" -> \"{}\" [label=\"{}\"];",
                    escape(transition.from().name()),
                    escape(transition.to().name()),
                    escape(&edge_label(transition))
                )
            })
            .sorted()
            .collect();

        for edge in edges {
            writeln!(f, "{edge}")?;
        }

        writeln!(f, "}}")
    }
}

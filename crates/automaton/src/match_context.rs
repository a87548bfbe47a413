use rustc_hash::FxHashMap;

use crate::Symbol;

/// The variable bindings of a single matching attempt.
///
/// A variable is either unbound, bound to a symbol, or explicitly bound to no
/// value. Looking up a variable of the last kind yields `None`, just like an
/// unbound variable.
#[derive(Clone, Default, Debug)]
pub struct MatchContext {
    bindings: FxHashMap<Symbol, Option<Symbol>>,
}

impl MatchContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to the given variable, if any.
    pub fn get(&self, variable: &Symbol) -> Option<&Symbol> {
        self.bindings.get(variable).and_then(Option::as_ref)
    }

    /// Returns true iff the variable has a binding, possibly to no value.
    pub fn contains(&self, variable: &Symbol) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Binds the variable to the given value, replacing any previous binding.
    pub fn bind(&mut self, variable: Symbol, value: Symbol) {
        debug_assert!(variable.is_variable(), "Only variables can be bound, not {variable}");
        self.bindings.insert(variable, Some(value));
    }

    /// Binds the variable explicitly to no value.
    pub fn bind_none(&mut self, variable: Symbol) {
        debug_assert!(variable.is_variable(), "Only variables can be bound, not {variable}");
        self.bindings.insert(variable, None);
    }

    /// Returns the number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true iff no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over all bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, Option<&Symbol>)> {
        self.bindings.iter().map(|(variable, value)| (variable, value.as_ref()))
    }
}

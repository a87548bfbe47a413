use std::fmt;
use std::rc::Rc;

/// A state of an automaton, identified by its name.
///
/// Two states with the same name are equal, but they are not necessarily the
/// same object. Cloning a state shares the underlying name, which can be
/// observed with [State::ptr_eq], whereas [State::deep_copy] creates a new
/// object with the same name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State(Rc<str>);

impl State {
    /// Creates a new state with the given name.
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    /// Returns the name of the state.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns a value-equal state with a fresh identity.
    pub fn deep_copy(&self) -> Self {
        Self::new(self.name())
    }

    /// Returns true iff both states are the same object.
    pub fn ptr_eq(left: &State, right: &State) -> bool {
        Rc::ptr_eq(&left.0, &right.0)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

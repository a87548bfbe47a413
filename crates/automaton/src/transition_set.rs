use std::fmt;

use rustc_hash::FxHashSet;

use crate::Transition;

/// The set of transitions of an automaton, iterated in insertion order.
///
/// Inserting a transition that is already present has no effect. Two sets are
/// equal when they contain the same transitions, regardless of the order.
#[derive(Clone, Default)]
pub struct TransitionSet {
    transitions: Vec<Transition>,

    /// Contains exactly the elements of `transitions`.
    index: FxHashSet<Transition>,
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the transition, returns true iff it was not yet present.
    pub fn insert(&mut self, transition: Transition) -> bool {
        if !self.index.insert(transition.clone()) {
            return false;
        }

        self.transitions.push(transition);
        true
    }

    /// Removes the transition, returns true iff it was present.
    pub fn remove(&mut self, transition: &Transition) -> bool {
        if !self.index.remove(transition) {
            return false;
        }

        let position = self
            .transitions
            .iter()
            .position(|t| t == transition)
            .expect("The index only contains stored transitions");
        self.transitions.remove(position);
        true
    }

    pub fn contains(&self, transition: &Transition) -> bool {
        self.index.contains(transition)
    }

    /// Keeps only the transitions satisfying the predicate.
    pub fn retain(&mut self, mut predicate: impl FnMut(&Transition) -> bool) {
        let index = &mut self.index;
        self.transitions.retain(|transition| {
            let keep = predicate(transition);
            if !keep {
                index.remove(transition);
            }
            keep
        });
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }
}

impl PartialEq for TransitionSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|transition| other.contains(transition))
    }
}

impl Eq for TransitionSet {}

impl Extend<Transition> for TransitionSet {
    fn extend<I: IntoIterator<Item = Transition>>(&mut self, iter: I) {
        for transition in iter {
            self.insert(transition);
        }
    }
}

impl FromIterator<Transition> for TransitionSet {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        let mut set = TransitionSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for TransitionSet {
    type Item = Transition;
    type IntoIter = std::vec::IntoIter<Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransitionSet {
    type Item = &'a Transition;
    type IntoIter = std::slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

impl fmt::Debug for TransitionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.transitions.iter().map(|t| t.to_string())).finish()
    }
}

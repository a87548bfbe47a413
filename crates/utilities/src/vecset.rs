use std::fmt;

use itertools::Itertools;

///
/// A set that is internally represented by a sorted vector. Mostly useful for
/// a compact representation of sets that are not changed often, and as a key
/// for sets of states since equal sets have equal representations.
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VecSet<T> {
    /// The internal storage with the invariant that the array is sorted.
    sorted_array: Vec<T>,
}

impl<T: Ord> VecSet<T> {
    pub fn new() -> Self {
        Self {
            sorted_array: Vec::new(),
        }
    }

    /// Returns a new set only containing the given element.
    pub fn singleton(element: T) -> Self {
        Self {
            sorted_array: vec![element],
        }
    }

    /// Returns true iff the set is empty.
    pub fn is_empty(&self) -> bool {
        self.sorted_array.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.sorted_array.len()
    }

    /// Returns true iff the given element is in the set.
    pub fn contains(&self, element: &T) -> bool {
        self.sorted_array.binary_search(element).is_ok()
    }

    /// Inserts the given element into the set, returns true iff the element was
    /// inserted.
    pub fn insert(&mut self, element: T) -> bool {
        // Finds the location where to insert the element to keep the array sorted.
        if let Err(position) = self.sorted_array.binary_search(&element) {
            self.sorted_array.insert(position, element);
            return true;
        }

        false
    }

    /// Returns the single element of the set, if it has exactly one.
    pub fn as_singleton(&self) -> Option<&T> {
        match self.sorted_array.as_slice() {
            [element] => Some(element),
            _ => None,
        }
    }

    /// Returns an iterator over the elements in the set, they are yielded in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.sorted_array.iter()
    }
}

impl<T: Ord> Default for VecSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for VecSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sorted_array: Vec<T> = iter.into_iter().collect();
        sorted_array.sort();
        sorted_array.dedup();
        Self { sorted_array }
    }
}

impl<'a, T> IntoIterator for &'a VecSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.sorted_array.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for VecSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:?}}}", self.sorted_array.iter().format(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_vecset_sorted_and_unique() {
        let set: VecSet<u32> = [3, 1, 2, 3, 1].into_iter().collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(set.contains(&2));
        assert!(set.as_singleton().is_none());
    }

    #[test]
    fn test_vecset_equal_regardless_of_insertion_order() {
        let mut left = VecSet::new();
        left.insert("b");
        left.insert("a");

        let mut right = VecSet::singleton("a");
        assert!(right.insert("b"));
        assert!(!right.insert("a"));

        assert_eq!(left, right);
    }
}

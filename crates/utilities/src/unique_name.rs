use rustc_hash::FxHashSet;

/// Generates fresh names of the shape `<prefix><n>` that never collide with a
/// set of names that are already in use, nor with previously generated names.
///
/// Numbering starts at one, so for the used names `{s1, s2, s3}` and prefix
/// `s` the first fresh name is `s4`.
#[derive(Clone, Debug)]
pub struct UniqueNames {
    prefix: String,
    used: FxHashSet<String>,

    /// All names `<prefix><i>` with `0 < i < next` are known to be used.
    next: usize,
}

impl UniqueNames {
    /// Creates a generator for the given prefix avoiding all the given names.
    pub fn new<I, S>(prefix: &str, used: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix: prefix.to_string(),
            used: used.into_iter().map(Into::into).collect(),
            next: 1,
        }
    }

    /// Marks the given name as used, returns true iff it was not used before.
    pub fn reserve(&mut self, name: impl Into<String>) -> bool {
        self.used.insert(name.into())
    }

    /// Returns true iff the given name is already in use.
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Returns a name that has not been used before and marks it as used.
    pub fn fresh(&mut self) -> String {
        loop {
            let name = format!("{}{}", self.prefix, self.next);
            self.next += 1;

            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }
}

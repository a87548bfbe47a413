use std::fmt;
use std::rc::Rc;

use crate::MatchContext;

/// A symbol that can be read or written by a transducer, or serve as a pattern
/// for the symbols that a transition reads.
///
/// Symbols compare by value: they are equal iff they are of the same kind and
/// have equal names (or equal parts). Cloning shares the underlying object,
/// which can be observed with [Symbol::ptr_eq].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Rc<SymbolKind>);

/// The different kinds of symbols.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum SymbolKind {
    /// A ground symbol with a name.
    Named(String),
    /// A ground symbol for a single character.
    Char(char),
    /// A pattern variable that binds to a non-variable symbol.
    Variable(String),
    /// A composite `prefix:local` symbol.
    Prefixed { prefix: Symbol, local: Symbol },
}

impl Symbol {
    /// Creates a ground symbol with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self(Rc::new(SymbolKind::Named(name.into())))
    }

    /// Creates a ground character symbol.
    pub fn char(c: char) -> Self {
        Self(Rc::new(SymbolKind::Char(c)))
    }

    /// Creates a pattern variable with the given name.
    pub fn variable(name: impl Into<String>) -> Self {
        Self(Rc::new(SymbolKind::Variable(name.into())))
    }

    /// Creates the composite symbol `prefix:local`.
    pub fn prefixed(prefix: Symbol, local: Symbol) -> Self {
        Self(Rc::new(SymbolKind::Prefixed { prefix, local }))
    }

    /// Converts a string into a sequence of character symbols.
    pub fn chars(text: &str) -> Vec<Symbol> {
        text.chars().map(Symbol::char).collect()
    }

    /// Returns the kind of this symbol.
    pub fn kind(&self) -> &SymbolKind {
        &self.0
    }

    /// Returns the name of the symbol, for composite symbols this is `prefix:local`.
    pub fn name(&self) -> String {
        match self.kind() {
            SymbolKind::Named(name) | SymbolKind::Variable(name) => name.clone(),
            SymbolKind::Char(c) => c.to_string(),
            SymbolKind::Prefixed { prefix, local } => format!("{}:{}", prefix.name(), local.name()),
        }
    }

    /// Returns true iff this symbol is a pattern variable.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind(), SymbolKind::Variable(_))
    }

    /// Returns true iff this symbol contains no pattern variables.
    pub fn is_ground(&self) -> bool {
        match self.kind() {
            SymbolKind::Named(_) | SymbolKind::Char(_) => true,
            SymbolKind::Variable(_) => false,
            SymbolKind::Prefixed { prefix, local } => prefix.is_ground() && local.is_ground(),
        }
    }

    /// Returns true iff both symbols are the same object.
    pub fn ptr_eq(left: &Symbol, right: &Symbol) -> bool {
        Rc::ptr_eq(&left.0, &right.0)
    }

    /// Returns a value-equal symbol in which every part has a fresh identity.
    pub fn deep_copy(&self) -> Symbol {
        match self.kind() {
            SymbolKind::Named(name) => Symbol::named(name.clone()),
            SymbolKind::Char(c) => Symbol::char(*c),
            SymbolKind::Variable(name) => Symbol::variable(name.clone()),
            SymbolKind::Prefixed { prefix, local } => Symbol::prefixed(prefix.deep_copy(), local.deep_copy()),
        }
    }

    /// Matches the candidate against this symbol used as a pattern.
    ///
    /// Ground patterns match equal ground candidates. A variable matches any
    /// candidate that is not itself a variable; an unbound variable becomes
    /// bound to the candidate, a bound variable only matches a candidate equal
    /// to its binding. A variable that is explicitly bound to no value matches
    /// nothing, its binding is never replaced. A composite pattern matches a
    /// composite candidate part by part in the same context.
    pub fn matches(&self, candidate: &Symbol, ctx: &mut MatchContext) -> bool {
        match (self.kind(), candidate.kind()) {
            (SymbolKind::Variable(_), _) => {
                if candidate.is_variable() {
                    return false;
                }

                if ctx.contains(self) {
                    return ctx.get(self) == Some(candidate);
                }

                ctx.bind(self.clone(), candidate.clone());
                true
            }
            (SymbolKind::Named(name), SymbolKind::Named(other)) => name == other,
            (SymbolKind::Char(c), SymbolKind::Char(other)) => c == other,
            (
                SymbolKind::Prefixed { prefix, local },
                SymbolKind::Prefixed {
                    prefix: other_prefix,
                    local: other_local,
                },
            ) => prefix.matches(other_prefix, ctx) && local.matches(other_local, ctx),
            _ => false,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            SymbolKind::Named(name) => write!(f, "{name}"),
            SymbolKind::Char(c) => write!(f, "{c}"),
            SymbolKind::Variable(name) => write!(f, "?{name}"),
            SymbolKind::Prefixed { prefix, local } => write!(f, "{prefix}:{local}"),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_ground_matching() {
        let mut ctx = MatchContext::new();

        assert!(Symbol::named("a").matches(&Symbol::named("a"), &mut ctx));
        assert!(!Symbol::named("a").matches(&Symbol::named("b"), &mut ctx));
        assert!(!Symbol::named("a").matches(&Symbol::variable("a"), &mut ctx));
        assert!(!Symbol::named("a").matches(&Symbol::char('a'), &mut ctx));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_kinds_are_distinct() {
        assert_ne!(Symbol::named("x"), Symbol::variable("x"));
        assert_ne!(Symbol::named("x"), Symbol::char('x'));
        assert_eq!(
            Symbol::prefixed(Symbol::named("p"), Symbol::named("l")),
            Symbol::prefixed(Symbol::named("p"), Symbol::named("l"))
        );
    }

    #[test]
    fn test_variable_binding() {
        let x = Symbol::variable("x");
        let a = Symbol::named("a");
        let mut ctx = MatchContext::new();

        assert!(x.matches(&a, &mut ctx));
        assert!(Symbol::ptr_eq(ctx.get(&x).unwrap(), &a));

        // A bound variable only matches its binding.
        assert!(x.matches(&Symbol::named("a"), &mut ctx));
        assert!(!x.matches(&Symbol::named("b"), &mut ctx));

        // Variables never bind to other variables.
        let mut ctx = MatchContext::new();
        assert!(!x.matches(&Symbol::variable("y"), &mut ctx));
        assert!(!ctx.contains(&x));
    }

    #[test]
    fn test_variable_bound_to_nothing() {
        let x = Symbol::variable("x");
        let mut ctx = MatchContext::new();
        ctx.bind_none(x.clone());

        assert!(!x.matches(&Symbol::named("a"), &mut ctx));
        assert!(ctx.contains(&x));
        assert_eq!(ctx.get(&x), None);
    }

    #[test]
    fn test_prefixed_matching() {
        let x = Symbol::variable("x");
        let pattern = Symbol::prefixed(Symbol::named("ns"), x.clone());
        let mut ctx = MatchContext::new();

        assert!(pattern.matches(&Symbol::prefixed(Symbol::named("ns"), Symbol::named("a")), &mut ctx));
        assert_eq!(ctx.get(&x), Some(&Symbol::named("a")));

        let mut ctx = MatchContext::new();
        assert!(!pattern.matches(&Symbol::prefixed(Symbol::named("other"), Symbol::named("a")), &mut ctx));
        assert!(!pattern.matches(&Symbol::named("ns"), &mut ctx));

        // The same variable in both parts requires equal parts.
        let twice = Symbol::prefixed(x.clone(), x);
        let mut ctx = MatchContext::new();
        assert!(twice.matches(&Symbol::prefixed(Symbol::named("a"), Symbol::named("a")), &mut ctx));
        let mut ctx = MatchContext::new();
        assert!(!twice.matches(&Symbol::prefixed(Symbol::named("a"), Symbol::named("b")), &mut ctx));
    }

    #[test]
    fn test_deep_copy() {
        let symbol = Symbol::prefixed(Symbol::named("p"), Symbol::variable("x"));
        let copy = symbol.deep_copy();

        assert_eq!(symbol, copy);
        assert!(!Symbol::ptr_eq(&symbol, &copy));
        assert!(!symbol.is_ground());
        assert_eq!(symbol.name(), "p:x");
        assert_eq!(symbol.to_string(), "p:?x");
    }
}

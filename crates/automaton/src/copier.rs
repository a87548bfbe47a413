use crate::MatchContext;
use crate::State;
use crate::Symbol;
use crate::SymbolKind;
use crate::Transition;

/// Decides which objects are shared and which are duplicated when copying
/// states, symbols, transitions and automata.
///
/// A copier may yield no symbol, in which case the symbol is dropped from
/// output sequences.
pub trait Copier {
    fn copy_state(&self, state: &State) -> State;

    fn copy_symbol(&self, symbol: &Symbol) -> Option<Symbol>;

    fn copy_symbols(&self, symbols: &[Symbol]) -> Vec<Symbol> {
        symbols.iter().filter_map(|symbol| self.copy_symbol(symbol)).collect()
    }

    fn copy_transition(&self, transition: &Transition) -> Transition
    where
        Self: Sized,
    {
        transition.copy(self)
    }
}

/// Creates new containers but shares every state, symbol and transition.
#[derive(Clone, Copy, Default, Debug)]
pub struct ShallowCopier;

impl Copier for ShallowCopier {
    fn copy_state(&self, state: &State) -> State {
        state.clone()
    }

    fn copy_symbol(&self, symbol: &Symbol) -> Option<Symbol> {
        Some(symbol.clone())
    }

    fn copy_transition(&self, transition: &Transition) -> Transition {
        transition.clone()
    }
}

/// Gives every reachable state and symbol a fresh identity. Output filters and
/// guards are functions, and remain shared.
#[derive(Clone, Copy, Default, Debug)]
pub struct DeepCopier;

impl Copier for DeepCopier {
    fn copy_state(&self, state: &State) -> State {
        state.deep_copy()
    }

    fn copy_symbol(&self, symbol: &Symbol) -> Option<Symbol> {
        Some(symbol.deep_copy())
    }
}

/// A deep copier that substitutes the variables bound in a match context.
///
/// A substituted variable is replaced by the bound symbol itself, everything
/// else is copied with a fresh identity. A variable without a value in the
/// context substitutes to nothing, and so does every composite symbol
/// containing it.
#[derive(Clone, Copy, Debug)]
pub struct VariableReplacer<'a> {
    ctx: &'a MatchContext,
}

impl<'a> VariableReplacer<'a> {
    pub fn new(ctx: &'a MatchContext) -> Self {
        Self { ctx }
    }

    /// Substitutes the bound variables in the given symbol.
    pub fn replace(&self, symbol: &Symbol) -> Option<Symbol> {
        match symbol.kind() {
            SymbolKind::Variable(_) => self.ctx.get(symbol).cloned(),
            SymbolKind::Prefixed { prefix, local } => {
                Some(Symbol::prefixed(self.replace(prefix)?, self.replace(local)?))
            }
            SymbolKind::Named(_) | SymbolKind::Char(_) => Some(symbol.deep_copy()),
        }
    }
}

impl Copier for VariableReplacer<'_> {
    fn copy_state(&self, state: &State) -> State {
        state.deep_copy()
    }

    fn copy_symbol(&self, symbol: &Symbol) -> Option<Symbol> {
        self.replace(symbol)
    }
}

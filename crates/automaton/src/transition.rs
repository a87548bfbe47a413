use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;

use itertools::Itertools;

use crate::Copier;
use crate::DeepCopier;
use crate::MatchContext;
use crate::State;
use crate::Symbol;
use crate::VariableReplacer;

/// Post-processes the substituted outputs of a transition, given the symbol
/// that was read.
#[derive(Clone)]
pub struct OutputFilter(Rc<dyn Fn(&Symbol, Vec<Symbol>) -> Vec<Symbol>>);

impl OutputFilter {
    pub fn new(filter: impl Fn(&Symbol, Vec<Symbol>) -> Vec<Symbol> + 'static) -> Self {
        Self(Rc::new(filter))
    }

    /// Applies the filter to the outputs produced for the given symbol.
    pub fn apply(&self, symbol: &Symbol, outputs: Vec<Symbol>) -> Vec<Symbol> {
        (self.0)(symbol, outputs)
    }
}

/// An additional admission condition on the symbol read by a transition.
#[derive(Clone)]
pub struct Guard(Rc<dyn Fn(&Symbol, &MatchContext) -> bool>);

impl Guard {
    pub fn new(guard: impl Fn(&Symbol, &MatchContext) -> bool + 'static) -> Self {
        Self(Rc::new(guard))
    }

    /// Returns true iff the guard admits the symbol.
    pub fn admits(&self, symbol: &Symbol, ctx: &MatchContext) -> bool {
        (self.0)(symbol, ctx)
    }
}

// Functions can only be compared by identity.
impl PartialEq for OutputFilter {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Guard {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for OutputFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputFilter({:p})", Rc::as_ptr(&self.0))
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guard({:p})", Rc::as_ptr(&self.0))
    }
}

/// The computed parts of a guarded transition.
///
/// The produced output is `prefix ++ filter(symbol, outputs) ++ suffix`, where
/// `outputs` is the substituted output template of the transition. Keeping the
/// prefix and suffix apart means that symbols prepended by epsilon folding are
/// never passed through the filter.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct TransitionHooks {
    pub filter: Option<OutputFilter>,
    pub guard: Option<Guard>,
    pub prefix: Vec<Symbol>,
    pub suffix: Vec<Symbol>,
}

impl TransitionHooks {
    pub fn new(filter: Option<OutputFilter>, guard: Option<Guard>) -> Self {
        Self {
            filter,
            guard,
            prefix: Vec::new(),
            suffix: Vec::new(),
        }
    }

    fn admits(&self, symbol: &Symbol, ctx: &MatchContext) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard.admits(symbol, ctx))
    }
}

/// The kinds of transitions, which differ in how they admit symbols and
/// compute their outputs.
#[derive(Clone, PartialEq, Debug)]
pub enum TransitionKind {
    /// Admits symbols matching the input pattern.
    Plain,
    /// Additionally checks the guard and filters the outputs.
    Filtered(TransitionHooks),
    /// Additionally requires that none of the given transitions admits the symbol.
    Complement(TransitionHooks, Vec<Transition>),
    /// Additionally requires that all of the given transitions admit the symbol.
    Intersection(TransitionHooks, Vec<Transition>),
}

/// A transition from one state to another that reads one symbol matching its
/// input pattern, or nothing for an epsilon transition, and writes the output
/// template with the bound variables substituted.
#[derive(Clone, Debug)]
pub struct Transition {
    from: State,
    to: State,

    /// The input pattern, `None` for epsilon transitions.
    input: Option<Symbol>,
    outputs: Vec<Symbol>,
    kind: TransitionKind,
}

impl Transition {
    /// Creates a plain transition without outputs.
    pub fn new(from: State, to: State, input: Symbol) -> Self {
        Self {
            from,
            to,
            input: Some(input),
            outputs: Vec::new(),
            kind: TransitionKind::Plain,
        }
    }

    /// Creates an epsilon transition without outputs.
    pub fn epsilon(from: State, to: State) -> Self {
        Self {
            from,
            to,
            input: None,
            outputs: Vec::new(),
            kind: TransitionKind::Plain,
        }
    }

    /// Creates a transition that filters its outputs and is guarded by an additional condition.
    pub fn filtered(
        from: State,
        to: State,
        input: Symbol,
        outputs: Vec<Symbol>,
        filter: Option<OutputFilter>,
        guard: Option<Guard>,
    ) -> Self {
        Self {
            from,
            to,
            input: Some(input),
            outputs,
            kind: TransitionKind::Filtered(TransitionHooks::new(filter, guard)),
        }
    }

    /// Creates a transition that admits the symbols matching `input` that none
    /// of the `excluded` transitions admit.
    pub fn complement(
        from: State,
        to: State,
        input: Symbol,
        outputs: Vec<Symbol>,
        filter: Option<OutputFilter>,
        excluded: Vec<Transition>,
    ) -> Self {
        Self {
            from,
            to,
            input: Some(input),
            outputs,
            kind: TransitionKind::Complement(TransitionHooks::new(filter, None), excluded),
        }
    }

    /// Creates a transition that admits the symbols matching `input` that all
    /// of the `required` transitions admit.
    pub fn intersection(
        from: State,
        to: State,
        input: Symbol,
        outputs: Vec<Symbol>,
        hooks: TransitionHooks,
        required: Vec<Transition>,
    ) -> Self {
        Self {
            from,
            to,
            input: Some(input),
            outputs,
            kind: TransitionKind::Intersection(hooks, required),
        }
    }

    /// Replaces the output template.
    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = Symbol>) -> Self {
        self.outputs = outputs.into_iter().collect();
        self
    }

    /// Adds a guard, turning a plain transition into a filtered one.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.hooks_mut().guard = Some(guard);
        self
    }

    /// Adds an output filter, turning a plain transition into a filtered one.
    pub fn with_filter(mut self, filter: OutputFilter) -> Self {
        self.hooks_mut().filter = Some(filter);
        self
    }

    pub fn from(&self) -> &State {
        &self.from
    }

    pub fn to(&self) -> &State {
        &self.to
    }

    /// Returns the input pattern, or `None` for an epsilon transition.
    pub fn input(&self) -> Option<&Symbol> {
        self.input.as_ref()
    }

    /// Returns the output template.
    pub fn outputs(&self) -> &[Symbol] {
        &self.outputs
    }

    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    pub fn is_epsilon(&self) -> bool {
        self.input.is_none()
    }

    /// Returns true iff the transition admits symbols by pattern matching alone.
    pub fn is_plain(&self) -> bool {
        matches!(self.kind, TransitionKind::Plain)
    }

    /// Returns true iff the transition writes any symbols.
    pub fn has_outputs(&self) -> bool {
        !self.outputs.is_empty()
            || self
                .hooks()
                .is_some_and(|hooks| !hooks.prefix.is_empty() || !hooks.suffix.is_empty() || hooks.filter.is_some())
    }

    /// Returns the hooks of a guarded or computed transition.
    pub fn hooks(&self) -> Option<&TransitionHooks> {
        match &self.kind {
            TransitionKind::Plain => None,
            TransitionKind::Filtered(hooks)
            | TransitionKind::Complement(hooks, _)
            | TransitionKind::Intersection(hooks, _) => Some(hooks),
        }
    }

    pub fn set_from(&mut self, from: State) {
        self.from = from;
    }

    pub fn set_to(&mut self, to: State) {
        self.to = to;
    }

    pub fn set_input(&mut self, input: Option<Symbol>) {
        self.input = input;
    }

    /// Adds the given symbols in front of everything this transition writes.
    pub fn prepend_outputs(&mut self, symbols: &[Symbol]) {
        match &mut self.kind {
            TransitionKind::Plain => {
                self.outputs.splice(0..0, symbols.iter().cloned());
            }
            TransitionKind::Filtered(hooks)
            | TransitionKind::Complement(hooks, _)
            | TransitionKind::Intersection(hooks, _) => {
                hooks.prefix.splice(0..0, symbols.iter().cloned());
            }
        }
    }

    /// Adds the given symbols after everything this transition writes.
    pub fn append_outputs(&mut self, symbols: &[Symbol]) {
        match &mut self.kind {
            TransitionKind::Plain => self.outputs.extend(symbols.iter().cloned()),
            TransitionKind::Filtered(hooks)
            | TransitionKind::Complement(hooks, _)
            | TransitionKind::Intersection(hooks, _) => hooks.suffix.extend(symbols.iter().cloned()),
        }
    }

    /// Returns true iff this transition reads the given symbol, binding the
    /// variables of the input pattern in `ctx`.
    ///
    /// Epsilon transitions never read a symbol.
    pub fn accept(&self, symbol: &Symbol, ctx: &mut MatchContext) -> bool {
        let Some(input) = &self.input else {
            return false;
        };

        if !input.matches(symbol, ctx) {
            return false;
        }

        match &self.kind {
            TransitionKind::Plain => true,
            TransitionKind::Filtered(hooks) => hooks.admits(symbol, ctx),
            TransitionKind::Complement(hooks, excluded) => {
                hooks.admits(symbol, ctx)
                    && !excluded
                        .iter()
                        .any(|transition| transition.accept(symbol, &mut MatchContext::new()))
            }
            TransitionKind::Intersection(hooks, required) => {
                hooks.admits(symbol, ctx)
                    && required
                        .iter()
                        .all(|transition| transition.accept(symbol, &mut MatchContext::new()))
            }
        }
    }

    /// Returns the outputs written when reading the given symbol, which must be
    /// accepted by this transition.
    pub fn transit(&self, symbol: &Symbol) -> Vec<Symbol> {
        let mut ctx = MatchContext::new();
        if let Some(input) = &self.input {
            input.matches(symbol, &mut ctx);
        }

        self.transit_with(symbol, &ctx)
    }

    /// Same as [Transition::transit], but with the bindings of an earlier call to [Transition::accept].
    pub fn transit_with(&self, symbol: &Symbol, ctx: &MatchContext) -> Vec<Symbol> {
        let replacer = VariableReplacer::new(ctx);
        let outputs = replacer.copy_symbols(&self.outputs);

        match self.hooks() {
            None => outputs,
            Some(hooks) => {
                let mut result = replacer.copy_symbols(&hooks.prefix);
                match &hooks.filter {
                    Some(filter) => result.extend(filter.apply(symbol, outputs)),
                    None => result.extend(outputs),
                }
                result.extend(replacer.copy_symbols(&hooks.suffix));
                result
            }
        }
    }

    /// Returns the outputs written when taking this transition without reading a symbol.
    pub fn transit_epsilon(&self) -> Vec<Symbol> {
        DeepCopier.copy_symbols(&self.epsilon_outputs())
    }

    /// Returns the output template including the prefix and suffix, without
    /// copying the symbols. Filters are not applied since they require a symbol.
    pub(crate) fn epsilon_outputs(&self) -> Vec<Symbol> {
        match self.hooks() {
            None => self.outputs.clone(),
            Some(hooks) => hooks
                .prefix
                .iter()
                .chain(self.outputs.iter())
                .chain(hooks.suffix.iter())
                .cloned()
                .collect(),
        }
    }

    /// Returns a copy of this transition with every part copied by the given copier.
    ///
    /// Input patterns for which the copier yields no symbol are kept as they are.
    pub fn copy(&self, copier: &impl Copier) -> Transition {
        let input = self
            .input
            .as_ref()
            .map(|input| copier.copy_symbol(input).unwrap_or_else(|| input.clone()));

        let copy_hooks = |hooks: &TransitionHooks| TransitionHooks {
            filter: hooks.filter.clone(),
            guard: hooks.guard.clone(),
            prefix: copier.copy_symbols(&hooks.prefix),
            suffix: copier.copy_symbols(&hooks.suffix),
        };

        let kind = match &self.kind {
            TransitionKind::Plain => TransitionKind::Plain,
            TransitionKind::Filtered(hooks) => TransitionKind::Filtered(copy_hooks(hooks)),
            TransitionKind::Complement(hooks, excluded) => TransitionKind::Complement(
                copy_hooks(hooks),
                excluded.iter().map(|t| copier.copy_transition(t)).collect(),
            ),
            TransitionKind::Intersection(hooks, required) => TransitionKind::Intersection(
                copy_hooks(hooks),
                required.iter().map(|t| copier.copy_transition(t)).collect(),
            ),
        };

        Transition {
            from: copier.copy_state(&self.from),
            to: copier.copy_state(&self.to),
            input,
            outputs: copier.copy_symbols(&self.outputs),
            kind,
        }
    }

    /// Returns the hooks, turning a plain transition into a filtered one first.
    fn hooks_mut(&mut self) -> &mut TransitionHooks {
        if self.is_plain() {
            self.kind = TransitionKind::Filtered(TransitionHooks::default());
        }

        match &mut self.kind {
            TransitionKind::Plain => unreachable!("Plain transitions were converted above"),
            TransitionKind::Filtered(hooks)
            | TransitionKind::Complement(hooks, _)
            | TransitionKind::Intersection(hooks, _) => hooks,
        }
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.input == other.input
            && self.outputs == other.outputs
            && self.kind == other.kind
    }
}

impl Eq for Transition {}

// Only hashes the structural parts, functions are compared by identity.
impl Hash for Transition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.input.hash(state);
        self.outputs.hash(state);
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = match &self.input {
            Some(input) => input.to_string(),
            None => "ε".to_string(),
        };

        write!(
            f,
            "{} --[{}/[{}]]-> {}",
            self.from,
            input,
            self.epsilon_outputs().iter().format(", "),
            self.to
        )
    }
}

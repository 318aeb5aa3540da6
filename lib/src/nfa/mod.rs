/*! Builds non-deterministic automata from byte pattern ASTs.

The automata are built with the Glushkov construction: every position in
the pattern (every byte, set, bitmask, etc.) gets its own state, and there
are no empty transitions. Automata for composite patterns are built by
wiring together the automata of their parts, which are represented as
fragments with a single initial state and a list of final states.

The initial state of a fragment never has incoming transitions. This is
what allows merging it with some other state just by copying its outgoing
transitions, as the merged-away state becomes unreachable.
*/

use bytepat_parser::ast::Node;
use rustc_hash::FxHashMap;

use crate::automaton::{
    Automaton, DefaultStateFactory, DefaultTransitionFactory, PatternId,
    StateFactory, StateId, TransitionFactory, MAX_STATES, MAX_TRANSITIONS,
};
use crate::byteset::ByteSet;
use crate::compiler::Error;
use crate::resolver::{resolve, Inversion};


/// A non-deterministic automaton.
///
/// A state can have multiple outgoing transitions matching the same byte.
#[derive(Debug, Clone)]
pub struct Nfa {
    automaton: Automaton,
    initial: StateId,
}

impl Nfa {
    /// Creates an NFA from an automaton and its initial state.
    ///
    /// Fails with [`Error::InvalidAutomaton`] if `initial` is not a state
    /// in `automaton`.
    pub fn new(automaton: Automaton, initial: StateId) -> Result<Self, Error> {
        if !automaton.contains(initial) {
            return Err(Error::InvalidAutomaton(format!(
                "initial state {} is out of range, the automaton has {} states",
                initial,
                automaton.state_count()
            )));
        }
        Ok(Self { automaton, initial })
    }

    /// Initial state.
    #[inline]
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// The underlying automaton.
    #[inline]
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Splits the NFA into its automaton and initial state.
    pub fn into_parts(self) -> (Automaton, StateId) {
        (self.automaton, self.initial)
    }

    /// Number of states reachable from the initial state.
    pub fn state_count(&self) -> usize {
        self.automaton.reachable(self.initial).len()
    }

    /// Associates `pattern` to every reachable final state.
    pub fn associate(&mut self, pattern: PatternId) {
        for id in self.automaton.reachable(self.initial) {
            if self.automaton.is_final(id) {
                self.automaton.associate(id, pattern);
            }
        }
    }

    /// Returns true if the NFA accepts the whole `data`.
    pub fn accepts(&self, data: &[u8]) -> bool {
        let mut active = vec![self.initial];
        for byte in data {
            active = self.step(&active, *byte);
            if active.is_empty() {
                return false;
            }
        }
        active.iter().any(|id| self.automaton.is_final(*id))
    }

    /// Returns the length of the longest prefix of `data` accepted by the
    /// NFA, together with the patterns associated to the final states
    /// reached after that prefix. Returns `None` if no prefix is accepted,
    /// not even the empty one.
    pub fn longest_match(&self, data: &[u8]) -> Option<(usize, Vec<PatternId>)> {
        let mut active = vec![self.initial];
        let mut result = self.final_patterns(&active).map(|p| (0, p));

        for (i, byte) in data.iter().enumerate() {
            active = self.step(&active, *byte);
            if active.is_empty() {
                break;
            }
            if let Some(patterns) = self.final_patterns(&active) {
                result = Some((i + 1, patterns));
            }
        }

        result
    }

    /// Merges multiple NFAs into one whose language is the union of their
    /// languages.
    ///
    /// The states of all the NFAs are moved into the same automaton, then
    /// the initial state of the first NFA absorbs the initial states of
    /// the others: every reference to them is redirected to the surviving
    /// initial state, which also receives their transitions, finality and
    /// associations.
    ///
    /// Fails with [`Error::InvalidAutomaton`] if `nfas` is empty.
    pub fn join(nfas: Vec<Nfa>) -> Result<Nfa, Error> {
        let mut nfas = nfas.into_iter();

        let Some(first) = nfas.next() else {
            return Err(Error::InvalidAutomaton(
                "can't join an empty list of automata".to_string(),
            ));
        };

        let (mut automaton, root) = first.into_parts();
        let mut initials = Vec::new();

        for nfa in nfas {
            let (other, initial) = nfa.into_parts();
            let translate = automaton.append(other);
            initials.push(translate(initial));
        }

        for old in initials {
            automaton.redirect(old, root);
            automaton.copy_transitions(old, root);
            automaton.copy_associations(old, root);
            if automaton.is_final(old) {
                automaton.set_final(root, true);
            }
        }

        Nfa::new(automaton, root)
    }

    /// Returns the states reached from `active` after reading `byte`,
    /// sorted and without duplicates.
    fn step(&self, active: &[StateId], byte: u8) -> Vec<StateId> {
        let mut next: Vec<StateId> = active
            .iter()
            .flat_map(|id| self.automaton.state(*id).targets(byte))
            .collect();
        next.sort_unstable();
        next.dedup();
        next
    }

    fn final_patterns(&self, active: &[StateId]) -> Option<Vec<PatternId>> {
        let mut finals = active
            .iter()
            .map(|id| self.automaton.state(*id))
            .filter(|state| state.is_final())
            .peekable();

        finals.peek()?;

        let mut patterns: Vec<PatternId> = finals
            .flat_map(|state| state.associations().iter().copied())
            .collect();
        patterns.sort_unstable();
        patterns.dedup();
        Some(patterns)
    }

    /// Returns the NFA in DOT format.
    pub fn to_dot(&self) -> String {
        self.automaton.to_dot(self.initial)
    }

    /// Returns the textual representation of the NFA.
    pub fn to_text(&self) -> String {
        self.automaton.to_text(self.initial)
    }
}

/// A piece of automaton under construction.
#[derive(Debug, Clone)]
struct Fragment {
    initial: StateId,
    /// Final states. The initial state is included when the fragment
    /// matches the empty string.
    finals: Vec<StateId>,
}

/// Builds an [`Nfa`] from an AST with the Glushkov construction.
///
/// # Example
///
/// ```
/// use bytepat::nfa::GlushkovBuilder;
/// use bytepat_parser::Parser;
///
/// let ast = Parser::new().parse("4d 5a? 90+").unwrap();
/// let nfa = GlushkovBuilder::new().build(&ast).unwrap();
///
/// assert!(nfa.accepts(b"\x4d\x90"));
/// assert!(nfa.accepts(b"\x4d\x5a\x90\x90"));
/// assert!(!nfa.accepts(b"\x4d\x5a"));
/// ```
pub struct GlushkovBuilder {
    state_factory: Box<dyn StateFactory>,
    transition_factory: Box<dyn TransitionFactory>,
}

impl Default for GlushkovBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GlushkovBuilder {
    /// Creates a builder that uses the default state and transition
    /// factories.
    pub fn new() -> Self {
        Self::with_factories(
            Box::new(DefaultStateFactory),
            Box::new(DefaultTransitionFactory),
        )
    }

    /// Creates a builder that creates states and transitions with the
    /// given factories.
    pub fn with_factories(
        state_factory: Box<dyn StateFactory>,
        transition_factory: Box<dyn TransitionFactory>,
    ) -> Self {
        Self { state_factory, transition_factory }
    }

    /// Builds the automaton for `node`.
    ///
    /// Fails if some node in the AST can't be resolved into a set of bytes
    /// where one is expected, or if some set doesn't match any byte. Fails
    /// with [`Error::TooLarge`] if the automaton would exceed
    /// [`MAX_STATES`] states or [`MAX_TRANSITIONS`] transitions.
    pub fn build(&self, node: &Node) -> Result<Nfa, Error> {
        let mut ctx = BuildContext {
            automaton: Automaton::new(),
            transitions: 0,
            state_factory: self.state_factory.as_ref(),
            transition_factory: self.transition_factory.as_ref(),
        };

        let fragment = ctx.node(node)?;

        #[cfg(feature = "logging")]
        log::debug!(
            "NFA built: {} states, {} transitions",
            ctx.automaton.state_count(),
            ctx.automaton.transition_count()
        );

        Nfa::new(ctx.automaton, fragment.initial)
    }
}

struct BuildContext<'a> {
    automaton: Automaton,
    /// Upper bound of the number of transitions in `automaton`.
    transitions: usize,
    state_factory: &'a dyn StateFactory,
    transition_factory: &'a dyn TransitionFactory,
}

impl<'a> BuildContext<'a> {
    fn new_state(&mut self) -> Result<StateId, Error> {
        if self.automaton.state_count() >= MAX_STATES {
            return Err(Error::TooLarge);
        }
        Ok(self.automaton.add_state(self.state_factory.create()))
    }

    /// Accounts for `n` new transitions.
    fn charge(&mut self, n: usize) -> Result<(), Error> {
        self.transitions = self.transitions.saturating_add(n);
        if self.transitions > MAX_TRANSITIONS {
            return Err(Error::TooLarge);
        }
        Ok(())
    }

    fn copy_transitions(
        &mut self,
        from: StateId,
        to: StateId,
    ) -> Result<(), Error> {
        let n = self.automaton.state(from).transitions().len();
        self.charge(n)?;
        self.automaton.copy_transitions(from, to);
        Ok(())
    }

    fn node(&mut self, node: &Node) -> Result<Fragment, Error> {
        match node {
            Node::Byte { .. }
            | Node::AllBitmask { .. }
            | Node::AnyBitmask { .. }
            | Node::Any
            | Node::Range { .. }
            | Node::Set { .. } => {
                let bytes = resolve(node, Inversion::AsDeclared)?;
                self.leaf(bytes, node.is_inverted())
            }
            Node::String(s) => {
                let bytes = s
                    .chars()
                    .map(|c| to_byte(c).map(ByteSet::single))
                    .collect::<Result<Vec<_>, _>>()?;
                self.chain(bytes)
            }
            Node::CaseInsensitiveString(s) => {
                let bytes = s
                    .chars()
                    .map(|c| {
                        to_byte(c).map(|b| {
                            ByteSet::from_iter([
                                b.to_ascii_lowercase(),
                                b.to_ascii_uppercase(),
                            ])
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.chain(bytes)
            }
            Node::Sequence(nodes) => {
                let fragments = nodes
                    .iter()
                    .map(|node| self.node(node))
                    .collect::<Result<Vec<_>, _>>()?;
                self.sequence(fragments)
            }
            Node::Alternatives(nodes) => {
                let fragments = nodes
                    .iter()
                    .map(|node| self.node(node))
                    .collect::<Result<Vec<_>, _>>()?;
                self.alternatives(fragments)
            }
            Node::ZeroToMany(node) => {
                let body = self.node(node)?;
                self.zero_to_many(body)
            }
            Node::OneToMany(node) => {
                let body = self.node(node)?;
                self.one_to_many(body)
            }
            Node::Optional(node) => {
                let body = self.node(node)?;
                Ok(self.optional(body))
            }
            Node::Repeat { count, node } => {
                if *count == 0 {
                    return self.empty();
                }
                let body = self.node(node)?;
                let copies = self.copies(body, *count as usize)?;
                self.sequence(copies)
            }
            Node::RepeatMinToMany { min, node } => {
                let body = self.node(node)?;
                if *min == 0 {
                    return self.zero_to_many(body);
                }
                let mut copies = self.copies(body, *min as usize + 1)?;
                if let Some(last) = copies.pop() {
                    let last = self.zero_to_many(last)?;
                    copies.push(last);
                }
                self.sequence(copies)
            }
            Node::RepeatMinToMax { min, max, node } => {
                if min > max {
                    return Err(Error::InvalidAutomaton(format!(
                        "lower bound ({}) is greater than upper bound ({})",
                        min, max
                    )));
                }
                if *max == 0 {
                    return self.empty();
                }
                let body = self.node(node)?;
                let copies = self
                    .copies(body, *max as usize)?
                    .into_iter()
                    .enumerate()
                    .map(|(i, copy)| {
                        if i < *min as usize {
                            copy
                        } else {
                            self.optional(copy)
                        }
                    })
                    .collect();
                self.sequence(copies)
            }
        }
    }

    /// Returns a fragment with a single state that is both initial and
    /// final.
    fn empty(&mut self) -> Result<Fragment, Error> {
        let initial = self.new_state()?;
        self.automaton.set_final(initial, true);
        Ok(Fragment { initial, finals: vec![initial] })
    }

    /// Returns a fragment with two states and a transition between them.
    fn leaf(&mut self, bytes: ByteSet, inverted: bool) -> Result<Fragment, Error> {
        let initial = self.new_state()?;
        let last = self.new_state()?;
        self.charge(1)?;
        let transition =
            self.transition_factory.create(bytes, inverted, last)?;
        self.automaton.add_transition(initial, transition);
        self.automaton.set_final(last, true);
        Ok(Fragment { initial, finals: vec![last] })
    }

    /// Returns a fragment that matches one byte from each of the sets, in
    /// order.
    fn chain(&mut self, sets: Vec<ByteSet>) -> Result<Fragment, Error> {
        let initial = self.new_state()?;
        let mut last = initial;
        for bytes in sets {
            let next = self.new_state()?;
            self.charge(1)?;
            let transition =
                self.transition_factory.create(bytes, false, next)?;
            self.automaton.add_transition(last, transition);
            last = next;
        }
        self.automaton.set_final(last, true);
        Ok(Fragment { initial, finals: vec![last] })
    }

    fn sequence(&mut self, fragments: Vec<Fragment>) -> Result<Fragment, Error> {
        let mut fragments = fragments.into_iter();

        let Some(mut result) = fragments.next() else {
            return Err(Error::InvalidAutomaton(
                "sequence without items".to_string(),
            ));
        };

        for right in fragments {
            let right_is_optional = self.automaton.is_final(right.initial);

            // Every final state of the left side behaves as the initial
            // state of the right side. They remain final only if the right
            // side matches the empty string.
            for f in &result.finals {
                self.copy_transitions(right.initial, *f)?;
                self.automaton.set_final(*f, right_is_optional);
            }

            let mut finals: Vec<StateId> = right
                .finals
                .into_iter()
                .filter(|f| *f != right.initial)
                .collect();

            if right_is_optional {
                finals.append(&mut result.finals);
            }

            result.finals = finals;
        }

        Ok(result)
    }

    fn alternatives(
        &mut self,
        fragments: Vec<Fragment>,
    ) -> Result<Fragment, Error> {
        let mut fragments = fragments.into_iter();

        let Some(mut result) = fragments.next() else {
            return Err(Error::InvalidAutomaton(
                "alternatives without items".to_string(),
            ));
        };

        for other in fragments {
            self.copy_transitions(other.initial, result.initial)?;
            for f in other.finals {
                if f == other.initial {
                    self.automaton.set_final(result.initial, true);
                    if !result.finals.contains(&result.initial) {
                        result.finals.push(result.initial);
                    }
                } else {
                    result.finals.push(f);
                }
            }
        }

        Ok(result)
    }

    fn zero_to_many(&mut self, body: Fragment) -> Result<Fragment, Error> {
        let mut body = self.one_to_many(body)?;
        self.automaton.set_final(body.initial, true);
        if !body.finals.contains(&body.initial) {
            body.finals.push(body.initial);
        }
        Ok(body)
    }

    fn one_to_many(&mut self, body: Fragment) -> Result<Fragment, Error> {
        for f in &body.finals {
            self.copy_transitions(body.initial, *f)?;
        }
        Ok(body)
    }

    fn optional(&mut self, mut body: Fragment) -> Fragment {
        self.automaton.set_final(body.initial, true);
        if !body.finals.contains(&body.initial) {
            body.finals.push(body.initial);
        }
        body
    }

    /// Returns `n` fragments equivalent to `body`. The first one is `body`
    /// itself, the rest are deep copies of it. All the copies are made
    /// before any of them is wired to something else.
    ///
    /// The size of the copies is checked against the budget before making
    /// any of them.
    fn copies(
        &mut self,
        body: Fragment,
        n: usize,
    ) -> Result<Vec<Fragment>, Error> {
        let reachable = self.automaton.reachable(body.initial);
        let transitions: usize = reachable
            .iter()
            .map(|id| self.automaton.state(*id).transitions().len())
            .sum();

        let extra = n.saturating_sub(1);
        let states = reachable.len().saturating_mul(extra);

        if self.automaton.state_count().saturating_add(states) > MAX_STATES {
            return Err(Error::TooLarge);
        }

        self.charge(transitions.saturating_mul(extra))?;

        let mut copies = Vec::with_capacity(n);
        for _ in 0..extra {
            let (initial, map) = self.automaton.deep_copy(body.initial);
            let finals = body
                .finals
                .iter()
                .map(|f| translate(&map, *f))
                .collect::<Result<Vec<_>, _>>()?;
            copies.push(Fragment { initial, finals });
        }
        copies.insert(0, body);
        Ok(copies)
    }
}

fn translate(
    map: &FxHashMap<StateId, StateId>,
    id: StateId,
) -> Result<StateId, Error> {
    map.get(&id).copied().ok_or_else(|| {
        Error::InvalidAutomaton(format!(
            "final state {} is not reachable from the initial state",
            id
        ))
    })
}

fn to_byte(c: char) -> Result<u8, Error> {
    u8::try_from(c).map_err(|_| {
        Error::InvalidAutomaton(format!(
            "character {:?} can't be represented as a single byte",
            c
        ))
    })
}

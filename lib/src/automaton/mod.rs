/*! Data model shared by non-deterministic and deterministic automata.

An [`Automaton`] is an arena of [`State`]s, each state is identified by a
[`StateId`] that is simply its index in the arena. Transitions refer to
their target state by its [`StateId`], so many transitions can point to
the same state, and loops are expressed without shared ownership.
Replacing every reference to some state with another one amounts to
rewriting the handles stored in transitions.

States are never removed from the arena. Operations that merge states,
like the sequencing of two automata, leave the merged-away state without
incoming transitions, which makes it unreachable. Functions that walk the
automaton, like [`Automaton::reachable`], only visit the states that can be
reached from some initial state.
*/

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use bitvec::vec::BitVec;
use rustc_hash::FxHashMap;

use crate::byteset::ByteSet;
use crate::compiler::Error;

mod dot;

#[cfg(test)]
mod tests;

/// Identifies a state within an [`Automaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// Index of the state within the automaton's arena.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for StateId {
    fn from(value: usize) -> Self {
        Self(value as u32)
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Identifies a pattern when multiple patterns are compiled into the same
/// automaton. Final states carry the identifiers of the patterns they
/// complete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternId(pub u32);

impl From<usize> for PatternId {
    fn from(value: usize) -> Self {
        Self(value as u32)
    }
}

impl Display for PatternId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An edge in the automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    bytes: ByteSet,
    target: StateId,
}

impl Transition {
    /// Creates a transition to `target` matching the bytes in `bytes`.
    ///
    /// Transitions are usually created with a [`TransitionFactory`], which
    /// makes sure that `bytes` is not empty.
    pub fn new(bytes: ByteSet, target: StateId) -> Self {
        Self { bytes, target }
    }

    /// Bytes that this transition matches.
    #[inline]
    pub fn bytes(&self) -> &ByteSet {
        &self.bytes
    }

    /// State reached after matching one of the bytes.
    #[inline]
    pub fn target(&self) -> StateId {
        self.target
    }
}

/// A node in the automaton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    is_final: bool,
    transitions: Vec<Transition>,
    associations: Vec<PatternId>,
}

impl State {
    /// True if reaching this state means that a match has been found.
    #[inline]
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Outgoing transitions, in the order they were added.
    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        self.transitions.as_slice()
    }

    /// Patterns associated to this state, sorted and without duplicates.
    #[inline]
    pub fn associations(&self) -> &[PatternId] {
        self.associations.as_slice()
    }

    /// Returns the targets of the transitions that match `byte`.
    pub fn targets(&self, byte: u8) -> impl Iterator<Item = StateId> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.bytes.contains(byte))
            .map(|t| t.target)
    }

    fn associate(&mut self, pattern: PatternId) {
        if let Err(pos) = self.associations.binary_search(&pattern) {
            self.associations.insert(pos, pattern);
        }
    }
}

/// Creates the states used while building automata.
pub trait StateFactory {
    /// Returns a new non-final state without transitions.
    fn create(&self) -> State;
}

/// Creates the transitions used while building automata.
pub trait TransitionFactory {
    /// Returns a transition to `target` matching the bytes in `bytes`, or
    /// the bytes not in `bytes` if `inverted` is true.
    ///
    /// Fails with [`Error::EmptyTransition`] if the resulting transition
    /// doesn't match any byte.
    fn create(
        &self,
        bytes: ByteSet,
        inverted: bool,
        target: StateId,
    ) -> Result<Transition, Error>;
}

/// The [`StateFactory`] used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultStateFactory;

impl StateFactory for DefaultStateFactory {
    fn create(&self) -> State {
        State::default()
    }
}

/// The [`TransitionFactory`] used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTransitionFactory;

impl TransitionFactory for DefaultTransitionFactory {
    fn create(
        &self,
        bytes: ByteSet,
        inverted: bool,
        target: StateId,
    ) -> Result<Transition, Error> {
        let bytes = if inverted { bytes.complement() } else { bytes };
        if bytes.is_empty() {
            return Err(Error::EmptyTransition);
        }
        Ok(Transition::new(bytes, target))
    }
}

/// Maximum number of states in an automaton built from patterns.
pub const MAX_STATES: usize = 100_000;

/// Maximum number of transitions in an automaton built from patterns.
pub const MAX_TRANSITIONS: usize = 1_000_000;

/// An arena of states.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    states: Vec<State>,
}

impl Automaton {
    /// Creates an empty automaton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state to the automaton and returns its identifier.
    pub fn add_state(&mut self, state: State) -> StateId {
        let id = StateId::from(self.states.len());
        self.states.push(state);
        id
    }

    /// Returns the state identified by `id`.
    ///
    /// # Panics
    ///
    /// If `id` doesn't belong to this automaton.
    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    /// Returns true if `id` identifies a state in this automaton.
    #[inline]
    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    /// Number of states in the arena, including unreachable ones.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of transitions in the arena.
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    #[inline]
    pub fn is_final(&self, id: StateId) -> bool {
        self.states[id.index()].is_final
    }

    pub fn set_final(&mut self, id: StateId, yes: bool) {
        self.states[id.index()].is_final = yes;
    }

    /// Adds a transition to the state `from`. A transition identical to an
    /// existing one is ignored.
    pub fn add_transition(&mut self, from: StateId, transition: Transition) {
        let transitions = &mut self.states[from.index()].transitions;
        if !transitions.contains(&transition) {
            transitions.push(transition);
        }
    }

    /// Copies every outgoing transition of `from` into `to`.
    pub fn copy_transitions(&mut self, from: StateId, to: StateId) {
        if from == to {
            return;
        }
        for transition in self.states[from.index()].transitions.clone() {
            self.add_transition(to, transition);
        }
    }

    /// Associates `pattern` to the state `id`.
    pub fn associate(&mut self, id: StateId, pattern: PatternId) {
        self.states[id.index()].associate(pattern);
    }

    /// Copies the associations of `from` into `to`.
    pub fn copy_associations(&mut self, from: StateId, to: StateId) {
        for pattern in self.states[from.index()].associations.clone() {
            self.associate(to, pattern);
        }
    }

    /// Returns the states reachable from `initial`, including `initial`
    /// itself, in breadth-first order.
    pub fn reachable(&self, initial: StateId) -> Vec<StateId> {
        let mut visited = BitVec::<usize>::repeat(false, self.states.len());
        let mut queue = VecDeque::from([initial]);
        let mut result = Vec::new();

        visited.set(initial.index(), true);

        while let Some(id) = queue.pop_front() {
            result.push(id);
            for transition in &self.states[id.index()].transitions {
                let target = transition.target.index();
                if !visited[target] {
                    visited.set(target, true);
                    queue.push_back(transition.target);
                }
            }
        }

        result
    }

    /// Copies the sub-automaton reachable from `initial`.
    ///
    /// Returns the copy of `initial` together with a map from every
    /// original state to its copy. The map is populated before any
    /// transition is copied, so transitions that point to states within
    /// the copied sub-automaton, including loops, point to the copies.
    pub fn deep_copy(
        &mut self,
        initial: StateId,
    ) -> (StateId, FxHashMap<StateId, StateId>) {
        let reachable = self.reachable(initial);
        let mut map = FxHashMap::default();

        for id in &reachable {
            let original = &self.states[id.index()];
            let copy = State {
                is_final: original.is_final,
                transitions: Vec::with_capacity(original.transitions.len()),
                associations: original.associations.clone(),
            };
            map.insert(*id, self.add_state(copy));
        }

        for id in &reachable {
            let transitions = self.states[id.index()]
                .transitions
                .iter()
                .map(|t| Transition::new(t.bytes, map[&t.target]))
                .collect();
            self.states[map[id].index()].transitions = transitions;
        }

        (map[&initial], map)
    }

    /// Makes every transition that targets `old` target `new` instead.
    ///
    /// Every state in the arena is visited, not only the ones reachable
    /// from some initial state.
    pub fn redirect(&mut self, old: StateId, new: StateId) {
        for state in self.states.iter_mut() {
            let mut changed = false;
            for transition in state.transitions.iter_mut() {
                if transition.target == old {
                    transition.target = new;
                    changed = true;
                }
            }
            if changed {
                let mut unique: Vec<Transition> =
                    Vec::with_capacity(state.transitions.len());
                for transition in state.transitions.drain(..) {
                    if !unique.contains(&transition) {
                        unique.push(transition);
                    }
                }
                state.transitions = unique;
            }
        }
    }

    /// Moves every state in `other` into this automaton.
    ///
    /// Returns the function that translates the identifiers of states in
    /// `other` to their identifiers in this automaton.
    pub fn append(&mut self, other: Automaton) -> impl Fn(StateId) -> StateId {
        let offset = self.states.len() as u32;
        self.states.extend(other.states.into_iter().map(|mut state| {
            for transition in state.transitions.iter_mut() {
                transition.target = StateId(transition.target.0 + offset);
            }
            state
        }));
        move |id: StateId| StateId(id.0 + offset)
    }

    /// Returns a textual description of the states reachable from
    /// `initial`. Each line describes one state, its transitions and,
    /// in the case of final states, the patterns associated to it.
    ///
    /// ```text
    /// s0 -> 4d:s1
    /// s1 -> [5a 7a]:s2
    /// s2 (final) #0
    /// ```
    pub fn to_text(&self, initial: StateId) -> String {
        let mut lines = Vec::new();
        for id in self.reachable(initial) {
            let state = self.state(id);
            let mut line = id.to_string();
            if state.is_final {
                line.push_str(" (final)");
                for pattern in &state.associations {
                    line.push_str(&format!(" {}", pattern));
                }
            }
            if !state.transitions.is_empty() {
                line.push_str(" -> ");
                let transitions: Vec<String> = state
                    .transitions
                    .iter()
                    .map(|t| format!("{}:{}", t.bytes, t.target))
                    .collect();
                line.push_str(&transitions.join(" "));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

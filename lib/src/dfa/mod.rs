/*! Converts non-deterministic automata into deterministic ones.

The conversion is the classic subset construction: each state in the DFA
corresponds to a set of NFA states that can be active at the same time.
Sets of NFA states are represented as sorted vectors of [`StateId`], which
are used as keys in a hash map that links every set to the DFA state
already created for it.

For every set, the bytes that lead somewhere are grouped by the set of NFA
states they lead to. Each group becomes a single transition in the DFA,
labelled with all the bytes in the group. As two different groups never
share a byte, the resulting automaton has at most one transition for each
byte in every state.
*/

use std::collections::VecDeque;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::automaton::{
    Automaton, PatternId, State, StateId, Transition, MAX_STATES,
    MAX_TRANSITIONS,
};
use crate::byteset::ByteSet;
use crate::compiler::Error;
use crate::nfa::Nfa;


/// A deterministic automaton.
///
/// Every state has at most one transition matching each byte. Once built,
/// the automaton can't be modified.
#[derive(Debug, Clone)]
pub struct Dfa {
    automaton: Automaton,
    initial: StateId,
}

impl Dfa {
    /// Initial state.
    #[inline]
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Returns the state identified by `id`.
    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        self.automaton.state(id)
    }

    /// Returns the state reached from `id` after reading `byte`, if any.
    pub fn next(&self, id: StateId, byte: u8) -> Option<StateId> {
        self.automaton.state(id).targets(byte).next()
    }

    #[inline]
    pub fn is_final(&self, id: StateId) -> bool {
        self.automaton.is_final(id)
    }

    /// Patterns associated to the state `id`.
    #[inline]
    pub fn associations(&self, id: StateId) -> &[PatternId] {
        self.automaton.state(id).associations()
    }

    /// Number of states. Every state in a DFA is reachable from the initial
    /// one.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.automaton.state_count()
    }

    #[inline]
    pub fn transition_count(&self) -> usize {
        self.automaton.transition_count()
    }

    /// Returns true if the DFA accepts the whole `data`.
    pub fn accepts(&self, data: &[u8]) -> bool {
        let mut current = self.initial;
        for byte in data {
            match self.next(current, *byte) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_final(current)
    }

    /// Returns the length of the longest prefix of `data` accepted by the
    /// DFA, together with the patterns associated to the final state
    /// reached after that prefix.
    pub fn longest_match(&self, data: &[u8]) -> Option<(usize, Vec<PatternId>)> {
        let mut current = self.initial;
        let mut result = self.match_at(current, 0);

        for (i, byte) in data.iter().enumerate() {
            match self.next(current, *byte) {
                Some(next) => current = next,
                None => break,
            }
            if let Some(m) = self.match_at(current, i + 1) {
                result = Some(m);
            }
        }

        result
    }

    fn match_at(
        &self,
        id: StateId,
        len: usize,
    ) -> Option<(usize, Vec<PatternId>)> {
        if self.is_final(id) {
            Some((len, self.associations(id).to_vec()))
        } else {
            None
        }
    }

    /// Returns the DFA in DOT format.
    pub fn to_dot(&self) -> String {
        self.automaton.to_dot(self.initial)
    }

    /// Returns the textual representation of the DFA.
    pub fn to_text(&self) -> String {
        self.automaton.to_text(self.initial)
    }
}

/// Builds the DFA equivalent to `nfa`.
///
/// # Example
///
/// ```
/// use bytepat::{dfa, nfa::GlushkovBuilder};
/// use bytepat_parser::Parser;
///
/// let ast = Parser::new().parse("(01|01 02)+").unwrap();
/// let nfa = GlushkovBuilder::new().build(&ast).unwrap();
/// let dfa = dfa::compile(&nfa).unwrap();
///
/// assert!(dfa.accepts(&[0x01, 0x01, 0x02]));
/// assert!(!dfa.accepts(&[0x02]));
/// ```
///
/// The number of states in the DFA can grow exponentially with the number
/// of states in the NFA. Fails with [`Error::TooLarge`] if the DFA would
/// exceed [`MAX_STATES`] states or [`MAX_TRANSITIONS`] transitions.
pub fn compile(nfa: &Nfa) -> Result<Dfa, Error> {
    SubsetCompiler::new(nfa.automaton()).compile(nfa.initial())
}

/// Builds a single DFA that recognizes the union of the languages of all
/// the NFAs.
///
/// The NFAs are joined into one with [`Nfa::join`] before the subset
/// construction. Use [`Nfa::associate`] beforehand for telling which
/// pattern matched when a final state is reached.
///
/// Fails with [`Error::InvalidAutomaton`] if `nfas` is empty.
pub fn compile_many(nfas: Vec<Nfa>) -> Result<Dfa, Error> {
    compile(&Nfa::join(nfas)?)
}

/// Performs the subset construction over some NFA.
struct SubsetCompiler<'a> {
    nfa: &'a Automaton,
    dfa: Automaton,
    transitions: usize,
    /// Maps each set of NFA states to its state in the DFA.
    states: FxHashMap<Vec<StateId>, StateId>,
    /// DFA states whose transitions haven't been computed yet.
    pending: VecDeque<(Vec<StateId>, StateId)>,
}

impl<'a> SubsetCompiler<'a> {
    fn new(nfa: &'a Automaton) -> Self {
        Self {
            nfa,
            dfa: Automaton::new(),
            transitions: 0,
            states: FxHashMap::default(),
            pending: VecDeque::new(),
        }
    }

    fn compile(mut self, initial: StateId) -> Result<Dfa, Error> {
        if !self.nfa.contains(initial) {
            return Err(Error::InvalidAutomaton(format!(
                "initial state {} is out of range, the automaton has {} states",
                initial,
                self.nfa.state_count()
            )));
        }

        let initial = self.dfa_state(vec![initial])?;

        while let Some((set, id)) = self.pending.pop_front() {
            for (targets, bytes) in self.groups(&set) {
                let target = self.dfa_state(targets)?;
                self.transitions += 1;
                if self.transitions > MAX_TRANSITIONS {
                    return Err(Error::TooLarge);
                }
                self.dfa.add_transition(id, Transition::new(bytes, target));
            }
        }

        #[cfg(feature = "logging")]
        log::debug!(
            "DFA built: {} states, {} transitions (NFA had {} states)",
            self.dfa.state_count(),
            self.dfa.transition_count(),
            self.nfa.state_count()
        );

        Ok(Dfa { automaton: self.dfa, initial })
    }

    /// Returns the DFA state for a set of NFA states, creating it if it
    /// doesn't exist yet. The set must be sorted and without duplicates.
    fn dfa_state(&mut self, set: Vec<StateId>) -> Result<StateId, Error> {
        if let Some(id) = self.states.get(&set) {
            return Ok(*id);
        }

        if self.dfa.state_count() >= MAX_STATES {
            return Err(Error::TooLarge);
        }

        let id = self.dfa.add_state(State::default());

        for nfa_state in &set {
            if self.nfa.is_final(*nfa_state) {
                self.dfa.set_final(id, true);
            }
            for pattern in self.nfa.state(*nfa_state).associations() {
                self.dfa.associate(id, *pattern);
            }
        }

        #[cfg(feature = "logging")]
        log::trace!("DFA state {} <- {:?}", id, set);

        self.states.insert(set.clone(), id);
        self.pending.push_back((set, id));

        Ok(id)
    }

    /// Groups the bytes that have some transition from `set` by the set of
    /// NFA states they lead to.
    fn groups(&self, set: &[StateId]) -> IndexMap<Vec<StateId>, ByteSet> {
        let mut candidates = ByteSet::empty();
        for id in set {
            for transition in self.nfa.state(*id).transitions() {
                candidates = candidates.union(transition.bytes());
            }
        }

        let mut groups: IndexMap<Vec<StateId>, ByteSet> = IndexMap::new();

        for byte in candidates.iter() {
            let mut targets: Vec<StateId> = set
                .iter()
                .flat_map(|id| self.nfa.state(*id).targets(byte))
                .collect();
            targets.sort_unstable();
            targets.dedup();
            groups.entry(targets).or_default().insert(byte);
        }

        groups
    }
}

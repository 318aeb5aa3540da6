/*! Matches compiled patterns against data.

A [`Matcher`] wraps the automaton produced by the [`crate::Compiler`],
which can be either deterministic or not. Matching always returns the
longest match starting at a given position.
*/

use std::ops::Range;

use crate::automaton::PatternId;
use crate::dfa::Dfa;
use crate::nfa::Nfa;

/// A match found in some data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Range within the data where the match was found.
    pub range: Range<usize>,
    /// Patterns that matched, sorted by [`PatternId`].
    pub patterns: Vec<PatternId>,
}

#[derive(Debug, Clone)]
enum Engine {
    Dfa(Dfa),
    Nfa(Nfa),
}

/// A compiled pattern, or set of patterns, ready for matching.
///
/// # Example
///
/// ```
/// let matcher = bytepat::compile("'ab'+").unwrap();
/// let matches: Vec<_> = matcher.find_iter(b"xabab ab").map(|m| m.range).collect();
///
/// assert_eq!(matches, vec![1..5, 6..8]);
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    engine: Engine,
}

impl From<Dfa> for Matcher {
    fn from(dfa: Dfa) -> Self {
        Self { engine: Engine::Dfa(dfa) }
    }
}

impl From<Nfa> for Matcher {
    fn from(nfa: Nfa) -> Self {
        Self { engine: Engine::Nfa(nfa) }
    }
}

impl Matcher {
    /// True if the matcher is backed by a DFA.
    pub fn is_deterministic(&self) -> bool {
        matches!(self.engine, Engine::Dfa(_))
    }

    /// The DFA backing this matcher, if any.
    pub fn dfa(&self) -> Option<&Dfa> {
        match &self.engine {
            Engine::Dfa(dfa) => Some(dfa),
            Engine::Nfa(_) => None,
        }
    }

    /// The NFA backing this matcher, if any.
    pub fn nfa(&self) -> Option<&Nfa> {
        match &self.engine {
            Engine::Dfa(_) => None,
            Engine::Nfa(nfa) => Some(nfa),
        }
    }

    /// Number of states in the automaton.
    pub fn state_count(&self) -> usize {
        match &self.engine {
            Engine::Dfa(dfa) => dfa.state_count(),
            Engine::Nfa(nfa) => nfa.state_count(),
        }
    }

    /// Returns true if the whole `data` matches.
    pub fn accepts(&self, data: &[u8]) -> bool {
        match &self.engine {
            Engine::Dfa(dfa) => dfa.accepts(data),
            Engine::Nfa(nfa) => nfa.accepts(data),
        }
    }

    /// Returns the length of the longest match starting at `pos`.
    pub fn match_len_at(&self, data: &[u8], pos: usize) -> Option<usize> {
        self.longest_match(data, pos).map(|(len, _)| len)
    }

    /// Returns the longest match starting at `pos`.
    pub fn matches_at(&self, data: &[u8], pos: usize) -> Option<Match> {
        self.longest_match(data, pos)
            .map(|(len, patterns)| Match { range: pos..pos + len, patterns })
    }

    /// Returns the first match in `data`.
    pub fn find(&self, data: &[u8]) -> Option<Match> {
        self.find_iter(data).next()
    }

    /// Returns an iterator over the non-overlapping matches in `data`.
    ///
    /// The data is scanned from left to right. After a match, scanning
    /// resumes at the end of the match, or one byte later if the match
    /// was empty.
    pub fn find_iter<'a>(&'a self, data: &'a [u8]) -> Matches<'a> {
        Matches { matcher: self, data, pos: 0 }
    }

    /// Returns the automaton in DOT format.
    pub fn to_dot(&self) -> String {
        match &self.engine {
            Engine::Dfa(dfa) => dfa.to_dot(),
            Engine::Nfa(nfa) => nfa.to_dot(),
        }
    }

    /// Returns the textual representation of the automaton.
    pub fn to_text(&self) -> String {
        match &self.engine {
            Engine::Dfa(dfa) => dfa.to_text(),
            Engine::Nfa(nfa) => nfa.to_text(),
        }
    }

    fn longest_match(
        &self,
        data: &[u8],
        pos: usize,
    ) -> Option<(usize, Vec<PatternId>)> {
        let data = data.get(pos..)?;
        match &self.engine {
            Engine::Dfa(dfa) => dfa.longest_match(data),
            Engine::Nfa(nfa) => nfa.longest_match(data),
        }
    }
}

/// Iterator returned by [`Matcher::find_iter`].
pub struct Matches<'a> {
    matcher: &'a Matcher,
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Matches<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.data.len() {
            let pos = self.pos;
            match self.matcher.matches_at(self.data, pos) {
                Some(m) => {
                    self.pos = m.range.end.max(pos + 1);
                    return Some(m);
                }
                None => self.pos += 1,
            }
        }
        None
    }
}
